//! # Photo Decoding and Scaling
//!
//! Photos arrive as whatever the phone camera or file picker produced:
//! multi-megapixel JPEGs, PNG screenshots, the odd WebP. Before they go into
//! the report each one is decoded, shrunk to at most 1200 px wide and
//! re-encoded as a JPEG at quality 72. The PDF then embeds those bytes as-is
//! (DCTDecode), which keeps a month of meal photos at a sane file size.
//!
//! Placement math lives in [`scale_to_fit`], a pure function, so the layout
//! engine can be tested without touching a real decoder.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageEncoder, RgbImage};

use crate::model::Photo;

/// A photo ready for PDF embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    /// Baseline JPEG bytes, embedded directly with DCTDecode.
    pub jpeg: Vec<u8>,
    /// Natural size in pixels. Only the ratio matters for layout.
    pub width_px: u32,
    pub height_px: u32,
}

/// Turns a stored photo into an embeddable image.
///
/// Errors are plain strings; the layout engine attaches the photo index
/// and aborts the export.
pub trait PhotoDecoder {
    fn decode(&self, photo: &Photo) -> Result<LoadedImage, String>;
}

/// Decode, downscale and re-encode to JPEG with the `image` crate.
#[derive(Debug, Clone)]
pub struct JpegRescaler {
    pub max_width_px: u32,
    pub quality: u8,
}

impl Default for JpegRescaler {
    fn default() -> Self {
        Self {
            max_width_px: 1200,
            quality: 72,
        }
    }
}

impl PhotoDecoder for JpegRescaler {
    fn decode(&self, photo: &Photo) -> Result<LoadedImage, String> {
        if !photo.mime_type.is_empty() && !photo.mime_type.starts_with("image/") {
            log::warn!(
                "photo declared as '{}', decoding by content instead",
                photo.mime_type
            );
        }
        let img = decode_image_bytes(&photo.data)?;
        self.rescale(img)
    }
}

impl JpegRescaler {
    fn rescale(&self, img: DynamicImage) -> Result<LoadedImage, String> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err("Image has zero size".to_string());
        }

        let scale = (self.max_width_px as f64 / width as f64).min(1.0);
        let target_w = ((width as f64 * scale).round() as u32).max(1);
        let target_h = ((height as f64 * scale).round() as u32).max(1);

        let img = if target_w != width || target_h != height {
            log::debug!("downscaling photo {}x{} -> {}x{}", width, height, target_w, target_h);
            img.resize_exact(target_w, target_h, FilterType::Triangle)
        } else {
            img
        };

        let rgb = flatten_onto_white(&img);
        let mut buf = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.quality);
        encoder
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), image::ColorType::Rgb8)
            .map_err(|e| format!("Failed to encode JPEG: {}", e))?;

        Ok(LoadedImage {
            jpeg: buf,
            width_px: rgb.width(),
            height_px: rgb.height(),
        })
    }
}

/// Uniform scale that fits `natural` inside `max_w` × `max_h`.
///
/// Returns the placed (width, height). The aspect ratio is preserved; the
/// result may be larger than the natural size when both bounds allow it.
pub fn scale_to_fit(natural_w: f64, natural_h: f64, max_w: f64, max_h: f64) -> (f64, f64) {
    if natural_w <= 0.0 || natural_h <= 0.0 || max_w <= 0.0 || max_h <= 0.0 {
        return (0.0, 0.0);
    }
    let ratio = (max_w / natural_w).min(max_h / natural_h);
    (natural_w * ratio, natural_h * ratio)
}

/// Detect the image format from magic bytes and decode.
fn decode_image_bytes(data: &[u8]) -> Result<DynamicImage, String> {
    if data.len() < 4 {
        return Err("Image data too short".to_string());
    }

    let format = if is_jpeg(data) {
        image::ImageFormat::Jpeg
    } else if is_png(data) {
        image::ImageFormat::Png
    } else if is_webp(data) {
        image::ImageFormat::WebP
    } else {
        return Err("Unsupported image format (expected JPEG, PNG or WebP)".to_string());
    };

    image::io::Reader::with_format(Cursor::new(data), format)
        .decode()
        .map_err(|e| format!("Failed to decode {:?}: {}", format, e))
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.len() >= 4 && data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47
}

fn is_webp(data: &[u8]) -> bool {
    data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP"
}

/// JPEG has no alpha. Transparent pixels are blended onto white paper.
fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let p = rgba.get_pixel(x, y);
        let a = p[3] as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        image::Rgb([blend(p[0]), blend(p[1]), blend(p[2])])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(img: &image::RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        encoder
            .write_image(img.as_raw(), img.width(), img.height(), image::ColorType::Rgba8)
            .unwrap();
        buf
    }

    fn photo(data: Vec<u8>) -> Photo {
        Photo {
            mime_type: "image/png".to_string(),
            data,
        }
    }

    #[test]
    fn test_magic_bytes() {
        assert!(is_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(!is_jpeg(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(is_png(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(!is_png(&[0x89, 0x50]));
        assert!(is_webp(b"RIFF\x00\x00\x00\x00WEBPVP8 "));
        assert!(!is_webp(b"RIFF\x00\x00\x00\x00AVI "));
    }

    #[test]
    fn test_too_short_data() {
        let err = JpegRescaler::default().decode(&photo(vec![0x00, 0x01])).unwrap_err();
        assert!(err.contains("too short"));
    }

    #[test]
    fn test_unsupported_format() {
        let err = JpegRescaler::default()
            .decode(&photo(vec![0x00, 0x01, 0x02, 0x03, 0x04]))
            .unwrap_err();
        assert!(err.contains("Unsupported"));
    }

    #[test]
    fn test_truncated_png_fails() {
        let bytes = png_bytes(&image::RgbaImage::new(4, 4));
        let err = JpegRescaler::default()
            .decode(&photo(bytes[..bytes.len() / 2].to_vec()))
            .unwrap_err();
        assert!(err.starts_with("Failed to decode"));
    }

    #[test]
    fn test_wide_photo_is_downscaled_to_jpeg() {
        let img = image::RgbaImage::from_pixel(2400, 1200, image::Rgba([200, 100, 50, 255]));
        let loaded = JpegRescaler::default().decode(&photo(png_bytes(&img))).unwrap();
        assert_eq!(loaded.width_px, 1200);
        assert_eq!(loaded.height_px, 600);
        assert!(loaded.jpeg.starts_with(&[0xFF, 0xD8]));
    }

    #[test]
    fn test_small_photo_keeps_size() {
        let img = image::RgbaImage::from_pixel(30, 20, image::Rgba([0, 0, 0, 255]));
        let loaded = JpegRescaler::default().decode(&photo(png_bytes(&img))).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (30, 20));
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 0]));
        let flat = flatten_onto_white(&DynamicImage::ImageRgba8(img));
        assert_eq!(flat.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
    }

    #[test]
    fn test_jpeg_input_is_accepted() {
        let img = image::RgbImage::from_fn(2, 2, |_, _| image::Rgb([0, 128, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
        encoder
            .write_image(img.as_raw(), 2, 2, image::ColorType::Rgb8)
            .unwrap();
        let loaded = JpegRescaler::default().decode(&photo(buf)).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (2, 2));
    }

    #[test]
    fn test_scale_to_fit_width_bound() {
        let (w, h) = scale_to_fit(1200.0, 800.0, 30.0, 35.0);
        assert!((w - 30.0).abs() < 1e-9);
        assert!((h - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_to_fit_height_bound() {
        let (w, h) = scale_to_fit(600.0, 1200.0, 50.0, 35.0);
        assert!((h - 35.0).abs() < 1e-9);
        assert!((w - 17.5).abs() < 1e-9);
    }

    #[test]
    fn test_scale_to_fit_preserves_ratio() {
        for &(nw, nh) in &[(4032.0, 3024.0), (1080.0, 1920.0), (1.0, 1.0), (3.0, 7.0)] {
            let (w, h) = scale_to_fit(nw, nh, 41.3, 35.0);
            assert!((w / h - nw / nh).abs() < 1e-9);
            assert!(w <= 41.3 + 1e-9 && h <= 35.0 + 1e-9);
        }
    }

    #[test]
    fn test_scale_to_fit_degenerate() {
        assert_eq!(scale_to_fit(0.0, 10.0, 30.0, 30.0), (0.0, 0.0));
        assert_eq!(scale_to_fit(10.0, 10.0, 0.0, 30.0), (0.0, 0.0));
    }
}
