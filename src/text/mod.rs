//! # Text Layout
//!
//! Measuring and wrapping the free-text fields of an entry.
//!
//! Wrapping is greedy: break opportunities come from UAX#14 (so hyphens,
//! slashes and spaces all count), hard line breaks in the input always start
//! a new line, and a word wider than the whole column is cut between
//! characters rather than allowed to run off the page.

use crate::font::FontSpec;
use unicode_linebreak::linebreaks;

/// Text measurement as the layout engine sees it.
///
/// Widths are in millimetres. Implementations must return lines that each
/// measure no wider than `max_width`, except for a single character that is
/// itself wider than the column.
pub trait TextMeasure {
    fn width(&self, text: &str, font: FontSpec) -> f64;
    fn wrap(&self, text: &str, max_width: f64, font: FontSpec) -> Vec<String>;
}

/// Wrapping against the standard Helvetica metrics.
pub struct TextLayout;

impl Default for TextLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Wrap one paragraph (no hard breaks) into `lines`.
    fn wrap_paragraph(&self, paragraph: &str, max_width: f64, font: FontSpec, lines: &mut Vec<String>) {
        let mut current = String::new();
        let mut segment_start = 0;

        for (offset, _) in linebreaks(paragraph) {
            // Each segment keeps its trailing whitespace; it is trimmed when
            // measured so spaces never push a line over the edge.
            let segment = &paragraph[segment_start..offset];
            segment_start = offset;

            let candidate_width = font.measure_mm(format!("{}{}", current, segment).trim_end());
            if candidate_width <= max_width {
                current.push_str(segment);
                continue;
            }

            if !current.trim_end().is_empty() {
                lines.push(current.trim_end().to_string());
            }
            current.clear();

            if font.measure_mm(segment.trim_end()) <= max_width {
                current.push_str(segment);
            } else {
                current = self.split_long_word(segment, max_width, font, lines);
            }
        }

        lines.push(current.trim_end().to_string());
    }

    /// Cut a word wider than the column into column-sized pieces. Full pieces
    /// go straight into `lines`; the tail is returned so the next segment
    /// can continue on the same line.
    fn split_long_word(&self, word: &str, max_width: f64, font: FontSpec, lines: &mut Vec<String>) -> String {
        let mut chunk = String::new();
        let mut chunk_width = 0.0;
        for ch in word.chars() {
            let w = font.char_width_mm(ch);
            if chunk_width + w > max_width && !chunk.is_empty() && !ch.is_whitespace() {
                lines.push(std::mem::take(&mut chunk));
                chunk_width = 0.0;
            }
            chunk.push(ch);
            chunk_width += w;
        }
        chunk
    }
}

impl TextMeasure for TextLayout {
    fn width(&self, text: &str, font: FontSpec) -> f64 {
        font.measure_mm(text)
    }

    fn wrap(&self, text: &str, max_width: f64, font: FontSpec) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let paragraph = paragraph.trim_end_matches('\r');
            if paragraph.trim().is_empty() {
                lines.push(String::new());
                continue;
            }
            self.wrap_paragraph(paragraph, max_width, font, &mut lines);
        }
        lines
    }
}
