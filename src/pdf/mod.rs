//! # PDF Serializer
//!
//! Takes the pages recorded by the canvas and writes a PDF file.
//!
//! A from-scratch PDF 1.7 writer. The report only needs the standard
//! Helvetica faces, JPEG photos, gray rules and a day-by-day outline, so
//! the subset of the format involved is small.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Layout coordinates are millimetres from the top-left corner; PDF user
//! space is points from the bottom-left. Every coordinate goes through
//! [`PT_PER_MM`] and a y flip on the way out.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::canvas::{Bookmark, DrawCommand, LayoutElement, LayoutPage};
use crate::font::{StandardFont, PT_PER_MM};
use crate::image_loader::LoadedImage;

/// Stroke width for rules, in points.
const RULE_WIDTH_PT: f64 = 0.57;

/// Document information dictionary entries.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}

#[derive(Debug, Default)]
pub struct PdfWriter;

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    font_objects: Vec<(StandardFont, usize)>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfBuilder {
    fn push(&mut self, data: Vec<u8>) -> usize {
        let id = self.objects.len();
        self.objects.push(PdfObject { data });
        id
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write recorded pages to a PDF byte vector.
    pub fn write(&self, pages: &[LayoutPage], bookmarks: &[Bookmark], metadata: &Metadata) -> Vec<u8> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            font_objects: Vec::new(),
        };

        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, then per page: images, content stream, page object
        builder.push(vec![]);
        builder.push(vec![]);
        builder.push(vec![]);

        self.register_fonts(&mut builder, pages);

        let mut page_obj_ids: Vec<usize> = Vec::new();

        for page in pages {
            let image_ids: Vec<usize> = page
                .elements
                .iter()
                .filter_map(|element| match &element.draw {
                    DrawCommand::Image { image } => Some(Self::write_image_xobject(&mut builder, image)),
                    _ => None,
                })
                .collect();

            let content = self.build_content_stream(page, &builder.font_objects);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            let content_obj_id = builder.push(content_data);

            let mut resources = format!(
                "/Font << {} >>",
                self.build_font_resource_dict(&builder.font_objects)
            );
            if !image_ids.is_empty() {
                let xobjects = image_ids
                    .iter()
                    .enumerate()
                    .map(|(i, id)| format!("/Im{} {} 0 R", i, id))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = write!(resources, " /XObject << {} >>", xobjects);
            }

            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                page.width * PT_PER_MM,
                page.height * PT_PER_MM,
                content_obj_id,
                resources
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        let outline_root = self.write_outlines(&mut builder, pages, bookmarks, &page_obj_ids);

        builder.objects[1].data = match outline_root {
            Some(root) => format!(
                "<< /Type /Catalog /Pages 2 0 R /Outlines {} 0 R /PageMode /UseOutlines >>",
                root
            )
            .into_bytes(),
            None => b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        };

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = self.write_info(&mut builder, metadata);

        self.serialize(&builder, info_obj_id)
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(&self, page: &LayoutPage, font_objects: &[(StandardFont, usize)]) -> String {
        let mut stream = String::from("0 g\n");
        let mut image_index = 0;

        for element in &page.elements {
            self.write_element(&mut stream, element, page.height, font_objects, &mut image_index);
        }

        stream
    }

    fn write_element(
        &self,
        stream: &mut String,
        element: &LayoutElement,
        page_height: f64,
        font_objects: &[(StandardFont, usize)],
        image_index: &mut usize,
    ) {
        match &element.draw {
            DrawCommand::Text {
                lines,
                baseline,
                font,
                line_height,
            } => {
                let idx = Self::font_index(font.font(), font_objects);
                let x = element.bounds.x * PT_PER_MM;
                for (i, line) in lines.iter().enumerate() {
                    if line.is_empty() {
                        continue;
                    }
                    let y = (page_height - (baseline + i as f64 * line_height)) * PT_PER_MM;
                    let _ = writeln!(
                        stream,
                        "BT /F{} {:.1} Tf 1 0 0 1 {:.2} {:.2} Tm ({}) Tj ET",
                        idx,
                        font.size,
                        x,
                        y,
                        Self::encode_pdf_text(line)
                    );
                }
            }
            DrawCommand::Image { .. } => {
                let b = &element.bounds;
                let _ = writeln!(
                    stream,
                    "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /Im{} Do Q",
                    b.width * PT_PER_MM,
                    b.height * PT_PER_MM,
                    b.x * PT_PER_MM,
                    (page_height - b.bottom()) * PT_PER_MM,
                    image_index
                );
                *image_index += 1;
            }
            DrawCommand::Line { from, to, gray } => {
                let _ = writeln!(
                    stream,
                    "q {:.3} G {:.2} w {:.2} {:.2} m {:.2} {:.2} l S Q",
                    gray,
                    RULE_WIDTH_PT,
                    from.0 * PT_PER_MM,
                    (page_height - from.1) * PT_PER_MM,
                    to.0 * PT_PER_MM,
                    (page_height - to.1) * PT_PER_MM
                );
            }
        }
    }

    /// Photos are already baseline JPEG, so the bytes pass straight through.
    fn write_image_xobject(builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        let mut obj_data: Vec<u8> = Vec::new();
        let _ = write!(
            obj_data,
            "<< /Type /XObject /Subtype /Image \
             /Width {} /Height {} \
             /ColorSpace /DeviceRGB \
             /BitsPerComponent 8 \
             /Filter /DCTDecode \
             /Length {} >>\nstream\n",
            image.width_px,
            image.height_px,
            image.jpeg.len()
        );
        obj_data.extend_from_slice(&image.jpeg);
        obj_data.extend_from_slice(b"\nendstream");
        builder.push(obj_data)
    }

    /// Register the standard fonts actually used across all pages.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[LayoutPage]) {
        let mut fonts: Vec<StandardFont> = pages
            .iter()
            .flat_map(|page| page.elements.iter())
            .filter_map(|element| match &element.draw {
                DrawCommand::Text { font, .. } => Some(font.font()),
                _ => None,
            })
            .collect();

        // Sort for deterministic ordering, then dedup
        fonts.sort();
        fonts.dedup();

        if fonts.is_empty() {
            fonts.push(StandardFont::Helvetica);
        }

        for font in fonts {
            let font_dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                 /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            let obj_id = builder.push(font_dict.into_bytes());
            builder.font_objects.push((font, obj_id));
        }
    }

    fn build_font_resource_dict(&self, font_objects: &[(StandardFont, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Resource index (/F0, /F1, ...) of a registered font.
    fn font_index(font: StandardFont, font_objects: &[(StandardFont, usize)]) -> usize {
        font_objects
            .iter()
            .position(|(registered, _)| *registered == font)
            .unwrap_or(0)
    }

    /// One outline item per bookmark, in document order, under a single
    /// root. Returns the root object id, or `None` with no bookmarks.
    fn write_outlines(
        &self,
        builder: &mut PdfBuilder,
        pages: &[LayoutPage],
        bookmarks: &[Bookmark],
        page_obj_ids: &[usize],
    ) -> Option<usize> {
        let bookmarks: Vec<&Bookmark> = bookmarks
            .iter()
            .filter(|b| b.page_index < page_obj_ids.len())
            .collect();
        if bookmarks.is_empty() {
            return None;
        }

        let root_id = builder.objects.len();
        let first_item = root_id + 1;
        let last_item = root_id + bookmarks.len();

        builder.push(
            format!(
                "<< /Type /Outlines /First {} 0 R /Last {} 0 R /Count {} >>",
                first_item,
                last_item,
                bookmarks.len()
            )
            .into_bytes(),
        );

        for (i, bookmark) in bookmarks.iter().enumerate() {
            let id = first_item + i;
            let page_height = pages[bookmark.page_index].height;
            let mut item = format!(
                "<< /Title ({}) /Parent {} 0 R /Dest [{} 0 R /XYZ 0 {:.2} null]",
                Self::encode_pdf_text(&bookmark.title),
                root_id,
                page_obj_ids[bookmark.page_index],
                (page_height - bookmark.y) * PT_PER_MM
            );
            if id > first_item {
                let _ = write!(item, " /Prev {} 0 R", id - 1);
            }
            if id < last_item {
                let _ = write!(item, " /Next {} 0 R", id + 1);
            }
            item.push_str(" >>");
            builder.push(item.into_bytes());
        }

        Some(root_id)
    }

    fn write_info(&self, builder: &mut PdfBuilder, metadata: &Metadata) -> Option<usize> {
        let entries = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Creator", &metadata.creator),
        ];
        if entries.iter().all(|(_, value)| value.is_none()) {
            return None;
        }

        let mut info = String::from("<< ");
        for (key, value) in entries {
            if let Some(value) = value {
                let _ = write!(info, "/{} ({}) ", key, Self::encode_pdf_text(value));
            }
        }
        let _ = write!(info, "/Producer (food-diary {}) >>", env!("CARGO_PKG_VERSION"));
        Some(builder.push(info.into_bytes()))
    }

    /// Escape a string for a PDF literal and map it to WinAnsiEncoding.
    /// Bytes above 0x7F are written as octal escapes; characters with no
    /// WinAnsi code become `?`.
    fn encode_pdf_text(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for ch in s.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '(' => out.push_str("\\("),
                ')' => out.push_str("\\)"),
                _ => match Self::unicode_to_winansi(ch) {
                    Some(b) if b < 0x80 => out.push(b as char),
                    Some(b) => {
                        let _ = write!(out, "\\{:03o}", b);
                    }
                    None => out.push('?'),
                },
            }
        }
        out
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is based on Windows-1252. Most codepoints in
    /// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
    /// holds smart quotes, bullets, dashes and the like.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82), // Single low-9 quotation mark
            0x0192 => Some(0x83), // Latin small letter f with hook
            0x201E => Some(0x84), // Double low-9 quotation mark
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86), // Dagger
            0x2021 => Some(0x87), // Double dagger
            0x02C6 => Some(0x88), // Modifier letter circumflex accent
            0x2030 => Some(0x89), // Per mille sign
            0x0160 => Some(0x8A), // Latin capital letter S with caron
            0x2039 => Some(0x8B), // Single left-pointing angle quotation
            0x0152 => Some(0x8C), // Latin capital ligature OE
            0x017D => Some(0x8E), // Latin capital letter Z with caron
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98), // Small tilde
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A), // Latin small letter s with caron
            0x203A => Some(0x9B), // Single right-pointing angle quotation
            0x0153 => Some(0x9C), // Latin small ligature oe
            0x017E => Some(0x9E), // Latin small letter z with caron
            0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: Option<usize>) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(output, "trailer\n<< /Size {} /Root 1 0 R", builder.objects.len());
        if let Some(info_id) = info_obj_id {
            let _ = write!(output, " /Info {} 0 R", info_id);
        }
        let _ = write!(output, " >>\nstartxref\n{}\n%%EOF\n", xref_offset);

        output
    }
}
