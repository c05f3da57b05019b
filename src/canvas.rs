//! # Page Canvas
//!
//! The drawing surface the layout engine writes into. The engine only ever
//! talks to the [`Canvas`] trait; [`PageCanvas`] is the implementation that
//! records every draw call into pages, which the PDF writer later
//! serializes and tests inspect directly.
//!
//! Coordinates are millimetres from the top-left corner of the page. Text is
//! positioned by the baseline of its first line.

use crate::error::ReportError;
use crate::font::FontSpec;
use crate::image_loader::LoadedImage;

/// An axis-aligned box on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// What to draw for an element.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Lines of text. The first baseline sits at `baseline`; each following
    /// line is `line_height` further down.
    Text {
        lines: Vec<String>,
        baseline: f64,
        font: FontSpec,
        line_height: f64,
    },
    /// A photo scaled into the element box.
    Image { image: LoadedImage },
    /// A straight stroke. `gray` is 0.0 (black) to 1.0 (white).
    Line {
        from: (f64, f64),
        to: (f64, f64),
        gray: f64,
    },
}

/// A positioned element on a page, with its bounding box.
#[derive(Debug, Clone)]
pub struct LayoutElement {
    pub bounds: Rect,
    pub draw: DrawCommand,
}

impl LayoutElement {
    /// The text lines of a text element, joined with newlines.
    pub fn text(&self) -> Option<String> {
        match &self.draw {
            DrawCommand::Text { lines, .. } => Some(lines.join("\n")),
            _ => None,
        }
    }
}

/// A fully drawn page.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<LayoutElement>,
}

/// A document outline entry pointing at a spot on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub title: String,
    pub page_index: usize,
    pub y: f64,
}

/// The page-drawing primitive the layout engine needs.
///
/// Draw calls go to the current page. `add_page` appends a page and makes
/// it current; `set_page` revisits an existing one.
pub trait Canvas {
    /// Page (width, height) in millimetres.
    fn page_size(&self) -> (f64, f64);
    fn page_count(&self) -> usize;
    fn current_page(&self) -> usize;
    fn add_page(&mut self);
    fn set_page(&mut self, index: usize);

    fn text(
        &mut self,
        lines: &[String],
        x: f64,
        baseline: f64,
        font: FontSpec,
        line_height: f64,
    ) -> Result<(), ReportError>;
    fn image(&mut self, image: LoadedImage, rect: Rect) -> Result<(), ReportError>;
    fn line(&mut self, from: (f64, f64), to: (f64, f64), gray: f64) -> Result<(), ReportError>;
    fn bookmark(&mut self, title: &str, y: f64);
}

/// Records draw calls into [`LayoutPage`]s.
///
/// Every element's bounding box is checked against the printable area (the
/// page inset by its margin); a box that leaves it is a layout bug and fails
/// with `CanvasOverflow`.
#[derive(Debug)]
pub struct PageCanvas {
    width: f64,
    height: f64,
    margin: f64,
    pages: Vec<LayoutPage>,
    current: usize,
    bookmarks: Vec<Bookmark>,
}

/// Slack for floating point error at the page edges.
const EDGE_TOLERANCE: f64 = 1e-6;

impl PageCanvas {
    /// A canvas with one blank page and a uniform margin.
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
            pages: vec![LayoutPage {
                width,
                height,
                elements: Vec::new(),
            }],
            current: 0,
            bookmarks: Vec::new(),
        }
    }

    pub fn pages(&self) -> &[LayoutPage] {
        &self.pages
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Hand over the recorded pages and outline.
    pub fn finish(self) -> (Vec<LayoutPage>, Vec<Bookmark>) {
        (self.pages, self.bookmarks)
    }

    fn push(&mut self, element: LayoutElement) -> Result<(), ReportError> {
        let b = element.bounds;
        let m = self.margin;
        if b.x < m - EDGE_TOLERANCE
            || b.y < m - EDGE_TOLERANCE
            || b.right() > self.width - m + EDGE_TOLERANCE
            || b.bottom() > self.height - m + EDGE_TOLERANCE
        {
            return Err(ReportError::CanvasOverflow {
                page: self.current + 1,
                detail: format!(
                    "box ({:.1}, {:.1}, {:.1} x {:.1}) leaves the printable area of the {:.1} x {:.1} page (margin {:.1})",
                    b.x, b.y, b.width, b.height, self.width, self.height, m
                ),
            });
        }
        self.pages[self.current].elements.push(element);
        Ok(())
    }
}

impl Canvas for PageCanvas {
    fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn add_page(&mut self) {
        self.pages.push(LayoutPage {
            width: self.width,
            height: self.height,
            elements: Vec::new(),
        });
        self.current = self.pages.len() - 1;
    }

    fn set_page(&mut self, index: usize) {
        self.current = index.min(self.pages.len() - 1);
    }

    fn text(
        &mut self,
        lines: &[String],
        x: f64,
        baseline: f64,
        font: FontSpec,
        line_height: f64,
    ) -> Result<(), ReportError> {
        if lines.is_empty() {
            return Ok(());
        }
        let width = lines
            .iter()
            .map(|line| font.measure_mm(line))
            .fold(0.0f64, f64::max);
        let top = baseline - font.ascent_mm();
        let bottom = baseline + (lines.len() - 1) as f64 * line_height + font.descent_mm();
        self.push(LayoutElement {
            bounds: Rect::new(x, top, width, bottom - top),
            draw: DrawCommand::Text {
                lines: lines.to_vec(),
                baseline,
                font,
                line_height,
            },
        })
    }

    fn image(&mut self, image: LoadedImage, rect: Rect) -> Result<(), ReportError> {
        self.push(LayoutElement {
            bounds: rect,
            draw: DrawCommand::Image { image },
        })
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), gray: f64) -> Result<(), ReportError> {
        let x = from.0.min(to.0);
        let y = from.1.min(to.1);
        self.push(LayoutElement {
            bounds: Rect::new(x, y, (from.0 - to.0).abs(), (from.1 - to.1).abs()),
            draw: DrawCommand::Line { from, to, gray },
        })
    }

    fn bookmark(&mut self, title: &str, y: f64) {
        self.bookmarks.push(Bookmark {
            title: title.to_string(),
            page_index: self.current,
            y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_page() {
        let canvas = PageCanvas::new(215.9, 279.4, 8.0);
        assert_eq!(canvas.page_count(), 1);
        assert_eq!(canvas.current_page(), 0);
    }

    #[test]
    fn set_page_revisits_earlier_page() {
        let mut canvas = PageCanvas::new(215.9, 279.4, 8.0);
        canvas.add_page();
        canvas.add_page();
        assert_eq!(canvas.current_page(), 2);
        canvas.set_page(0);
        canvas
            .text(&["back on page one".to_string()], 10.0, 20.0, FontSpec::normal(8.0), 3.0)
            .unwrap();
        assert_eq!(canvas.pages()[0].elements.len(), 1);
        assert!(canvas.pages()[2].elements.is_empty());
    }

    #[test]
    fn text_bounds_cover_all_lines() {
        let mut canvas = PageCanvas::new(215.9, 279.4, 8.0);
        let lines = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        canvas.text(&lines, 10.0, 50.0, FontSpec::normal(8.0), 3.0).unwrap();
        let b = canvas.pages()[0].elements[0].bounds;
        assert!(b.y < 50.0);
        assert!(b.bottom() > 56.0);
    }

    #[test]
    fn image_off_page_is_rejected() {
        let mut canvas = PageCanvas::new(100.0, 100.0, 8.0);
        let image = LoadedImage {
            jpeg: vec![0xFF, 0xD8],
            width_px: 10,
            height_px: 10,
        };
        let err = canvas.image(image, Rect::new(80.0, 80.0, 30.0, 30.0)).unwrap_err();
        assert!(matches!(err, ReportError::CanvasOverflow { page: 1, .. }));
    }

    #[test]
    fn text_rising_into_top_margin_is_rejected() {
        let mut canvas = PageCanvas::new(215.9, 279.4, 8.0);
        // Baseline on the margin line: the ascent pokes above it.
        let err = canvas
            .text(&["Food Diary Export".to_string()], 8.0, 8.0, FontSpec::bold(14.0), 3.0)
            .unwrap_err();
        assert!(matches!(err, ReportError::CanvasOverflow { page: 1, .. }));
    }

    #[test]
    fn line_into_side_margin_is_rejected() {
        let mut canvas = PageCanvas::new(215.9, 279.4, 8.0);
        assert!(canvas.line((8.0, 30.0), (207.9, 30.0), 0.3).is_ok());
        assert!(canvas.line((2.0, 40.0), (207.9, 40.0), 0.3).is_err());
    }

    #[test]
    fn bookmark_records_current_page() {
        let mut canvas = PageCanvas::new(100.0, 100.0, 8.0);
        canvas.add_page();
        canvas.bookmark("Monday, October 19th, 2026", 12.0);
        assert_eq!(canvas.bookmarks()[0].page_index, 1);
    }
}
