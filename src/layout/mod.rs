//! # Report Layout Engine
//!
//! The heart of the crate. Takes day groups of diary entries and draws them
//! onto fixed-size pages.
//!
//! ## Page model
//!
//! There is no infinite canvas that gets sliced afterwards. A [`PageWriter`]
//! holds a [`Cursor`] (page index + vertical offset) and every block asks
//! before it draws: "does this fit above the break line?" If not, the block
//! moves to, or continues on, the next page.
//!
//! ## Entry layout
//!
//! ```text
//!  Mon Oct 19                                   <- day header
//!        Lunch @ 12:30 PM                       <- entry header
//!        Dish & Components:   ┌──────┐ ┌──────┐
//!        Salmon, rice, greens │photo │ │photo │
//!        Place:               └──────┘ └──────┘
//!        Kitchen table
//!        <─── text column ──> <── photo column ─>
//! ```
//!
//! The text column and the photo column both start right under the entry
//! header, on the same page. The text column may run onto later pages; the
//! photo column is drawn afterwards by jumping back to the header's page.
//! The next entry starts below whichever column reached further.
//!
//! Two row styles exist, selected by [`ReportLayoutMode`]:
//! - **Stacked**: label on its own line, value below at full column width,
//!   fullness scores in a two-cell strip under the rows, 35 mm photos. A row
//!   that spills onto a new page repeats the day and entry headers there.
//! - **Inline**: label and value share a baseline, fullness scores are plain
//!   rows, 45 mm photos placed one at a time.

pub mod page_break;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Rect};
use crate::error::ReportError;
use crate::font::FontSpec;
use crate::format;
use crate::image_loader::{scale_to_fit, LoadedImage, PhotoDecoder};
use crate::model::{DayGroup, DiaryEntry, Photo};
use crate::text::TextMeasure;
use page_break::{decide_break, past_break_line, BreakDecision};

pub const REPORT_TITLE: &str = "Food Diary Export";

// ── Geometry (millimetres) ──────────────────────────────────────

pub const TEXT_COLUMN_WIDTH: f64 = 70.0;
pub const COLUMN_GUTTER: f64 = 3.0;
pub const ENTRY_INDENT: f64 = 6.0;
pub const PHOTO_GAP: f64 = 2.0;
pub const LINE_HEIGHT: f64 = 3.0;
const LABEL_HEIGHT: f64 = 3.0;
const INLINE_LABEL_GAP: f64 = 1.5;
const INLINE_ROW_GAP: f64 = 1.0;
const MIN_INLINE_VALUE_WIDTH: f64 = 15.0;
const FULLNESS_CELL_WIDTH: f64 = TEXT_COLUMN_WIDTH / 2.0;
const FULLNESS_STRIP_HEIGHT: f64 = 9.0;
const ENTRY_GAP: f64 = 3.0;

/// Room a header needs below the cursor before it moves to a new page.
const HEADER_FOOTPRINT: f64 = 10.0;
/// Distance from the bottom margin to the break line for text rows.
const ROW_FOOTPRINT: f64 = 6.0;
const SEPARATOR_FOOTPRINT: f64 = 6.0;

const TITLE_ADVANCE: f64 = 7.0;
const GENERATED_ADVANCE: f64 = 6.0;
const HEADER_RULE_ADVANCE: f64 = 6.0;
const DAY_HEADER_ADVANCE: f64 = 4.0;
const DAY_HEADER_REPEAT_ADVANCE: f64 = 5.0;
const ENTRY_HEADER_ADVANCE: f64 = 4.0;
const ENTRY_HEADER_REPEAT_ADVANCE: f64 = 5.0;
const SEPARATOR_ADVANCE: f64 = 4.0;

const HEADER_RULE_GRAY: f64 = 80.0 / 255.0;
const SEPARATOR_GRAY: f64 = 60.0 / 255.0;

// ── Type ────────────────────────────────────────────────────────

const TITLE_FONT: FontSpec = FontSpec::bold(14.0);
const GENERATED_FONT: FontSpec = FontSpec::normal(10.0);
const DAY_HEADER_FONT: FontSpec = FontSpec::bold(11.0);
const DAY_HEADER_REPEAT_FONT: FontSpec = FontSpec::bold(12.0);
const ENTRY_HEADER_FONT: FontSpec = FontSpec::bold(10.0);
const ENTRY_HEADER_REPEAT_FONT: FontSpec = FontSpec::bold(11.0);
const LABEL_FONT: FontSpec = FontSpec::bold(8.0);
const VALUE_FONT: FontSpec = FontSpec::normal(8.0);

/// Narrowest photo worth placing. More photos than fit at this width are
/// skipped.
const MIN_PHOTO_WIDTH: f64 = 5.0;

/// Slack for floating point error when comparing against page bounds.
const BOUND_TOLERANCE: f64 = 1e-6;

/// How the rows of an entry are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLayoutMode {
    /// Label above value; fullness strip; 35 mm photos.
    #[default]
    Stacked,
    /// Label beside value; fullness as rows; 45 mm photos.
    Inline,
}

impl ReportLayoutMode {
    pub fn photo_max_height(&self) -> f64 {
        match self {
            ReportLayoutMode::Stacked => 35.0,
            ReportLayoutMode::Inline => 45.0,
        }
    }
}

/// A position in the document: page index, then distance from the top edge.
///
/// Cursors order by page first, so "further down the document" is simply
/// the greater cursor.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Cursor {
    pub page: usize,
    pub y: f64,
}

impl Cursor {
    /// Whichever of the two cursors is further down the document.
    pub fn later(self, other: Cursor) -> Cursor {
        if other > self {
            other
        } else {
            self
        }
    }
}

/// Owns the cursor and routes draw calls to the canvas at that cursor.
pub struct PageWriter<'c> {
    canvas: &'c mut dyn Canvas,
    cursor: Cursor,
    page_width: f64,
    page_height: f64,
    margin: f64,
    /// First baseline on a page: the top margin plus room for the tallest
    /// ascent drawn there.
    top: f64,
}

impl<'c> PageWriter<'c> {
    pub fn new(canvas: &'c mut dyn Canvas, margin: f64, top_inset: f64) -> Self {
        let (page_width, page_height) = canvas.page_size();
        let page = canvas.current_page();
        let top = margin + top_inset;
        Self {
            canvas,
            cursor: Cursor { page, y: top },
            page_width,
            page_height,
            margin,
            top,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn y(&self) -> f64 {
        self.cursor.y
    }

    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    pub fn advance(&mut self, dy: f64) {
        self.cursor.y += dy;
    }

    /// True when a block needing `footprint` below the cursor must start on
    /// a new page.
    pub fn past_break_line(&self, footprint: f64) -> bool {
        past_break_line(self.cursor.y, self.page_height, self.margin, footprint)
    }

    /// Space between the cursor and the break line for a given footprint.
    pub fn space_above_break(&self, footprint: f64) -> f64 {
        self.page_height - self.margin - footprint - self.cursor.y
    }

    /// Continue at the top of the next page, creating it if the
    /// cursor is on the last page.
    pub fn break_page(&mut self) {
        let next = self.cursor.page + 1;
        if next < self.canvas.page_count() {
            self.canvas.set_page(next);
        } else {
            self.canvas.add_page();
        }
        log::debug!(
            "page break at y={:.1}mm, continuing on page {}",
            self.cursor.y,
            next + 1
        );
        self.cursor = Cursor {
            page: next,
            y: self.top,
        };
    }

    /// Jump to an earlier (or later) position.
    pub fn goto(&mut self, cursor: Cursor) {
        self.canvas.set_page(cursor.page);
        self.cursor = cursor;
    }

    /// One line of text with its baseline at the cursor.
    fn text_line(&mut self, text: &str, x: f64, font: FontSpec) -> Result<(), ReportError> {
        self.text_at(&[text.to_string()], x, self.cursor.y, font)
    }

    /// Several lines, the first baseline at the cursor.
    fn text_lines(&mut self, lines: &[String], x: f64, font: FontSpec) -> Result<(), ReportError> {
        self.text_at(lines, x, self.cursor.y, font)
    }

    fn text_at(&mut self, lines: &[String], x: f64, baseline: f64, font: FontSpec) -> Result<(), ReportError> {
        self.canvas.text(lines, x, baseline, font, LINE_HEIGHT)
    }

    fn image(&mut self, image: LoadedImage, rect: Rect) -> Result<(), ReportError> {
        self.canvas.image(image, rect)
    }

    /// A horizontal rule across the content width at the cursor.
    fn rule(&mut self, gray: f64) -> Result<(), ReportError> {
        let y = self.cursor.y;
        self.canvas
            .line((self.margin, y), (self.page_width - self.margin, y), gray)
    }

    fn bookmark(&mut self, title: &str, y: f64) {
        self.canvas.bookmark(title, y);
    }
}

/// How many photos fit side by side in a column at the minimum width.
fn photo_capacity(column_width: f64) -> usize {
    let fit = ((column_width + PHOTO_GAP) / (MIN_PHOTO_WIDTH + PHOTO_GAP)).floor();
    if fit.is_finite() && fit >= 1.0 {
        fit as usize
    } else {
        1
    }
}

/// The headers an entry needs to re-emit after a page break.
struct EntryContext<'a> {
    day_label: &'a str,
    /// "Lunch @ 12:30 PM", as reported in errors.
    header: String,
    /// The header as drawn, shortened to fit the page.
    header_line: String,
    x: f64,
}

/// One label/value row, already wrapped.
struct RowBlock {
    label: String,
    label_above: bool,
    value_x: f64,
    lines: Vec<String>,
}

impl RowBlock {
    /// Height of each line. The first line carries the label.
    fn line_heights(&self) -> Vec<f64> {
        (0..self.lines.len())
            .map(|i| {
                if i == 0 && self.label_above {
                    LABEL_HEIGHT + LINE_HEIGHT
                } else {
                    LINE_HEIGHT
                }
            })
            .collect()
    }
}

/// Lays out day groups onto a canvas.
pub struct LayoutEngine<'a> {
    measure: &'a dyn TextMeasure,
    decoder: &'a dyn PhotoDecoder,
    mode: ReportLayoutMode,
    margin: f64,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(
        measure: &'a dyn TextMeasure,
        decoder: &'a dyn PhotoDecoder,
        mode: ReportLayoutMode,
        margin: f64,
    ) -> Self {
        Self {
            measure,
            decoder,
            mode,
            margin,
        }
    }

    /// Draw the whole report. Times are shown in `generated_at`'s zone.
    pub fn layout<Tz: TimeZone>(
        &self,
        groups: &[DayGroup<'_>],
        generated_at: &DateTime<Tz>,
        canvas: &mut dyn Canvas,
    ) -> Result<(), ReportError> {
        let tz = generated_at.timezone();
        let mut w = PageWriter::new(canvas, self.margin, TITLE_FONT.ascent_mm());

        self.document_header(&mut w, &format::pretty_timestamp(generated_at.naive_local()))?;

        for (i, group) in groups.iter().enumerate() {
            if w.past_break_line(HEADER_FOOTPRINT) {
                w.break_page();
            }

            let day_label = format::day_short(group.day);
            let top = w.y() - DAY_HEADER_FONT.ascent_mm();
            w.bookmark(&format::day_long(group.day), top);
            w.text_line(&day_label, self.margin, DAY_HEADER_FONT)?;
            w.advance(DAY_HEADER_ADVANCE);

            for entry in &group.entries {
                let local = entry.captured_at.with_timezone(&tz);
                let header = format!("{} @ {}", entry.display_name(), format::time_12h(local.naive_local().time()));
                let x = self.margin + ENTRY_INDENT;
                let header_line = self.fit_line(&header, w.page_width() - self.margin - x, ENTRY_HEADER_REPEAT_FONT);
                let ctx = EntryContext {
                    day_label: &day_label,
                    header,
                    header_line,
                    x,
                };
                self.layout_entry(&mut w, &ctx, entry)?;
            }

            // Separator between days, not after the last one.
            if i + 1 < groups.len() {
                if w.past_break_line(SEPARATOR_FOOTPRINT) {
                    w.break_page();
                }
                w.rule(SEPARATOR_GRAY)?;
                w.advance(SEPARATOR_ADVANCE);
            }
        }

        Ok(())
    }

    fn document_header(&self, w: &mut PageWriter<'_>, generated: &str) -> Result<(), ReportError> {
        w.text_line(REPORT_TITLE, self.margin, TITLE_FONT)?;
        w.advance(TITLE_ADVANCE);
        w.text_line(&format!("Generated: {}", generated), self.margin, GENERATED_FONT)?;
        w.advance(GENERATED_ADVANCE);
        w.rule(HEADER_RULE_GRAY)?;
        w.advance(HEADER_RULE_ADVANCE);
        Ok(())
    }

    fn layout_entry(
        &self,
        w: &mut PageWriter<'_>,
        ctx: &EntryContext<'_>,
        entry: &DiaryEntry,
    ) -> Result<(), ReportError> {
        if w.past_break_line(HEADER_FOOTPRINT) {
            w.break_page();
            w.text_line(ctx.day_label, self.margin, DAY_HEADER_REPEAT_FONT)?;
            w.advance(DAY_HEADER_REPEAT_ADVANCE);
        }
        w.text_line(&ctx.header_line, ctx.x, ENTRY_HEADER_FONT)?;
        w.advance(ENTRY_HEADER_ADVANCE);

        let start = w.cursor();
        let text_end = self.text_column(w, ctx, entry)?;
        let end = match self.photo_column(w, ctx, start, text_end, &entry.photos)? {
            Some(photo_end) => text_end.later(photo_end),
            None => text_end,
        };

        w.goto(Cursor {
            page: end.page,
            y: end.y + ENTRY_GAP,
        });
        if w.past_break_line(HEADER_FOOTPRINT) {
            w.break_page();
        }
        Ok(())
    }

    /// Draw the label/value rows (and the fullness strip in stacked mode).
    /// Returns where the column ended.
    fn text_column(
        &self,
        w: &mut PageWriter<'_>,
        ctx: &EntryContext<'_>,
        entry: &DiaryEntry,
    ) -> Result<Cursor, ReportError> {
        let mut rows: Vec<(&str, String)> = entry
            .text_rows()
            .into_iter()
            .map(|(label, value)| (label, value.to_string()))
            .collect();
        let fullness = entry.fullness_rows();
        if self.mode == ReportLayoutMode::Inline {
            rows.extend(fullness.iter().cloned());
        }

        for (label, value) in &rows {
            let block = self.row_block(ctx, label, value);
            self.flow_row(w, ctx, &block)?;
            if self.mode == ReportLayoutMode::Inline {
                w.advance(INLINE_ROW_GAP);
            }
        }

        if self.mode == ReportLayoutMode::Stacked && !fullness.is_empty() {
            self.fullness_strip(w, ctx, &fullness)?;
        }

        Ok(w.cursor())
    }

    /// Shorten a single line with a trailing "..." until it fits `max_width`.
    fn fit_line(&self, text: &str, max_width: f64, font: FontSpec) -> String {
        if self.measure.width(text, font) <= max_width {
            return text.to_string();
        }
        let mut chars: Vec<char> = text.chars().collect();
        while !chars.is_empty() {
            chars.pop();
            let candidate = format!("{}...", chars.iter().collect::<String>().trim_end());
            if self.measure.width(&candidate, font) <= max_width {
                return candidate;
            }
        }
        String::new()
    }

    fn row_block(&self, ctx: &EntryContext<'_>, label: &str, value: &str) -> RowBlock {
        let label = format!("{}:", label);
        let (label_above, value_x, value_width) = match self.mode {
            ReportLayoutMode::Stacked => (true, ctx.x, TEXT_COLUMN_WIDTH),
            ReportLayoutMode::Inline => {
                let label_width = self.measure.width(&label, LABEL_FONT);
                let value_width =
                    (TEXT_COLUMN_WIDTH - label_width - INLINE_LABEL_GAP).max(MIN_INLINE_VALUE_WIDTH);
                (false, ctx.x + TEXT_COLUMN_WIDTH - value_width, value_width)
            }
        };

        let mut lines = self.measure.wrap(value, value_width, VALUE_FONT);
        if lines.is_empty() {
            lines.push(String::new());
        }

        RowBlock {
            label,
            label_above,
            value_x,
            lines,
        }
    }

    /// Place a row at the cursor, continuing it across page breaks line by
    /// line when it does not fit.
    fn flow_row(
        &self,
        w: &mut PageWriter<'_>,
        ctx: &EntryContext<'_>,
        block: &RowBlock,
    ) -> Result<(), ReportError> {
        let heights = block.line_heights();
        let mut placed = 0;
        let mut fresh_page = false;

        while placed < heights.len() {
            let room = w.space_above_break(ROW_FOOTPRINT);
            match decide_break(room, &heights[placed..]) {
                BreakDecision::Place => {
                    self.draw_row_lines(w, ctx, block, placed, heights.len())?;
                    return Ok(());
                }
                BreakDecision::Split {
                    items_on_current_page,
                } => {
                    let end = placed + items_on_current_page;
                    self.draw_row_lines(w, ctx, block, placed, end)?;
                    placed = end;
                }
                BreakDecision::MoveToNextPage if fresh_page => {
                    return Err(ReportError::CanvasOverflow {
                        page: w.cursor().page + 1,
                        detail: format!("'{}' row has no room even on a new page", block.label),
                    });
                }
                BreakDecision::MoveToNextPage => {}
            }
            self.continue_on_next_page(w, ctx)?;
            fresh_page = true;
        }
        Ok(())
    }

    fn draw_row_lines(
        &self,
        w: &mut PageWriter<'_>,
        ctx: &EntryContext<'_>,
        block: &RowBlock,
        from: usize,
        to: usize,
    ) -> Result<(), ReportError> {
        if from == 0 {
            w.text_line(&block.label, ctx.x, LABEL_FONT)?;
            if block.label_above {
                w.advance(LABEL_HEIGHT);
            }
        }
        w.text_lines(&block.lines[from..to], block.value_x, VALUE_FONT)?;
        w.advance((to - from) as f64 * LINE_HEIGHT);
        Ok(())
    }

    /// Break the page mid-entry. Stacked mode re-emits the day and entry
    /// headers so the continuation is never orphaned.
    fn continue_on_next_page(
        &self,
        w: &mut PageWriter<'_>,
        ctx: &EntryContext<'_>,
    ) -> Result<(), ReportError> {
        w.break_page();
        if self.mode == ReportLayoutMode::Stacked {
            w.text_line(ctx.day_label, self.margin, DAY_HEADER_REPEAT_FONT)?;
            w.advance(DAY_HEADER_REPEAT_ADVANCE);
            w.text_line(&ctx.header_line, ctx.x, ENTRY_HEADER_REPEAT_FONT)?;
            w.advance(ENTRY_HEADER_REPEAT_ADVANCE);
        }
        Ok(())
    }

    /// Fullness before/after as two side-by-side cells.
    fn fullness_strip(
        &self,
        w: &mut PageWriter<'_>,
        ctx: &EntryContext<'_>,
        rows: &[(&str, String)],
    ) -> Result<(), ReportError> {
        if w.space_above_break(ROW_FOOTPRINT) < FULLNESS_STRIP_HEIGHT {
            self.continue_on_next_page(w, ctx)?;
        }

        let baseline = w.y();
        let mut x = ctx.x;
        for (label, value) in rows {
            w.text_at(&[format!("{}:", label)], x, baseline, LABEL_FONT)?;
            w.text_at(&[value.clone()], x, baseline + LINE_HEIGHT, VALUE_FONT)?;
            x += FULLNESS_CELL_WIDTH;
        }
        w.advance(FULLNESS_STRIP_HEIGHT);
        Ok(())
    }

    /// Draw the photos of an entry in one horizontal row to the right of the
    /// text column, starting at `start`. `text_end` is where the text column
    /// finished. Returns the lowest point reached.
    fn photo_column(
        &self,
        w: &mut PageWriter<'_>,
        ctx: &EntryContext<'_>,
        start: Cursor,
        text_end: Cursor,
        photos: &[Photo],
    ) -> Result<Option<Cursor>, ReportError> {
        if photos.is_empty() {
            return Ok(None);
        }

        let column_x = ctx.x + TEXT_COLUMN_WIDTH + COLUMN_GUTTER;
        let column_width = w.page_width() - column_x - self.margin;
        let capacity = photo_capacity(column_width);
        let photos = if photos.len() > capacity {
            log::warn!(
                "'{}' has {} photos; only {} fit across the photo column, the rest are skipped",
                ctx.header,
                photos.len(),
                capacity
            );
            &photos[..capacity]
        } else {
            photos
        };
        let count = photos.len() as f64;
        let per_photo_width = (column_width - (count - 1.0) * PHOTO_GAP) / count;
        let max_height = self.mode.photo_max_height();
        let right = w.page_width() - self.margin;
        let bottom = w.page_height() - self.margin;

        w.goto(start);

        match self.mode {
            ReportLayoutMode::Stacked => {
                // The whole row moves together, so every photo is sized first.
                let mut sized = Vec::with_capacity(photos.len());
                for (index, photo) in photos.iter().enumerate() {
                    let image = self.decode(ctx, index, photo)?;
                    let (width, height) = scale_to_fit(
                        image.width_px as f64,
                        image.height_px as f64,
                        per_photo_width,
                        max_height,
                    );
                    sized.push((image, width, height));
                }
                let row_height = sized.iter().map(|(_, _, h)| *h).fold(0.0f64, f64::max);

                if start.y + row_height > bottom + BOUND_TOLERANCE {
                    log::debug!("photo row of '{}' moves to the next page", ctx.header);
                    w.break_page();
                    if w.cursor().page <= text_end.page {
                        // The text column continued here and repeated the
                        // day and entry headers at the top.
                        w.advance(DAY_HEADER_REPEAT_ADVANCE + ENTRY_HEADER_REPEAT_ADVANCE);
                    }
                }

                let top = w.cursor();
                let mut x = column_x;
                for (image, width, height) in sized {
                    w.image(image, Rect::new(x, top.y, width, height))?;
                    x += width + PHOTO_GAP;
                }
                Ok(Some(Cursor {
                    page: top.page,
                    y: top.y + row_height,
                }))
            }
            ReportLayoutMode::Inline => {
                let mut row_top = start;
                let mut x = column_x;
                let mut end = start;

                for (index, photo) in photos.iter().enumerate() {
                    let image = self.decode(ctx, index, photo)?;
                    let (width, height) = scale_to_fit(
                        image.width_px as f64,
                        image.height_px as f64,
                        per_photo_width,
                        max_height,
                    );

                    let overflows = x + width > right + BOUND_TOLERANCE
                        || row_top.y + height > bottom + BOUND_TOLERANCE;
                    if overflows {
                        // Photos already placed stay on the exhausted page.
                        w.goto(row_top);
                        w.break_page();
                        row_top = w.cursor();
                        x = column_x;
                        log::debug!(
                            "photo {} of '{}' restarts the row on page {}",
                            index,
                            ctx.header,
                            row_top.page + 1
                        );
                    }

                    w.image(image, Rect::new(x, row_top.y, width, height))?;
                    x += width + PHOTO_GAP;
                    end = end.later(Cursor {
                        page: row_top.page,
                        y: row_top.y + height,
                    });
                }
                Ok(Some(end))
            }
        }
    }

    fn decode(&self, ctx: &EntryContext<'_>, index: usize, photo: &Photo) -> Result<LoadedImage, ReportError> {
        self.decoder
            .decode(photo)
            .map_err(|reason| ReportError::ImageDecode {
                entry: ctx.header.clone(),
                index,
                reason,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, PageCanvas};
    use crate::text::TextLayout;
    use chrono::{NaiveDate, Utc};

    /// Reports every photo as 400x300 without decoding anything.
    struct FixedSizeDecoder;

    impl PhotoDecoder for FixedSizeDecoder {
        fn decode(&self, _photo: &Photo) -> Result<LoadedImage, String> {
            Ok(LoadedImage {
                jpeg: vec![0xFF, 0xD8],
                width_px: 400,
                height_px: 300,
            })
        }
    }

    fn page_writer_canvas() -> PageCanvas {
        PageCanvas::new(215.9, 279.4, 8.0)
    }

    #[test]
    fn cursor_orders_by_page_then_y() {
        let a = Cursor { page: 0, y: 200.0 };
        let b = Cursor { page: 1, y: 10.0 };
        assert_eq!(a.later(b), b);
        assert_eq!(b.later(a), b);
        let c = Cursor { page: 1, y: 50.0 };
        assert_eq!(b.later(c), c);
    }

    #[test]
    fn break_page_reuses_existing_pages() {
        let mut canvas = page_writer_canvas();
        canvas.add_page();
        canvas.set_page(0);
        let mut w = PageWriter::new(&mut canvas, 8.0, 0.0);
        w.advance(100.0);
        w.break_page();
        assert_eq!(w.cursor(), Cursor { page: 1, y: 8.0 });
        w.break_page();
        assert_eq!(w.cursor().page, 2);
        drop(w);
        assert_eq!(canvas.page_count(), 3);
    }

    #[test]
    fn break_page_lands_on_first_baseline() {
        let mut canvas = page_writer_canvas();
        let mut w = PageWriter::new(&mut canvas, 8.0, 3.5);
        assert_eq!(w.y(), 11.5);
        w.advance(200.0);
        w.break_page();
        assert_eq!(w.cursor(), Cursor { page: 1, y: 11.5 });
    }

    #[test]
    fn photo_capacity_on_letter() {
        // 215.9 - 8 - 6 - 70 - 3 - 8
        let column = 120.9;
        assert_eq!(photo_capacity(column), 17);
        assert_eq!(photo_capacity(1.0), 1);
        let per_photo = (column - 16.0 * PHOTO_GAP) / 17.0;
        assert!(per_photo >= MIN_PHOTO_WIDTH);
    }

    #[test]
    fn photo_max_heights() {
        assert_eq!(ReportLayoutMode::Stacked.photo_max_height(), 35.0);
        assert_eq!(ReportLayoutMode::Inline.photo_max_height(), 45.0);
    }

    #[test]
    fn header_only_entry_draws_header_and_nothing_else() {
        let measure = TextLayout::new();
        let engine = LayoutEngine::new(&measure, &FixedSizeDecoder, ReportLayoutMode::Stacked, 8.0);
        let now = Utc::now();
        let mut entry = DiaryEntry::new(now);
        entry.meal_name = "Snack".to_string();
        let groups = vec![DayGroup {
            day: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            entries: vec![&entry],
        }];
        let mut canvas = page_writer_canvas();
        engine.layout(&groups, &now, &mut canvas).unwrap();

        let texts: Vec<String> = canvas.pages()[0]
            .elements
            .iter()
            .filter_map(|e| e.text())
            .collect();
        // title, generated line, day header, entry header
        assert_eq!(texts.len(), 4);
        assert!(texts[3].starts_with("Snack @ "));
        assert!(!canvas.pages()[0]
            .elements
            .iter()
            .any(|e| matches!(e.draw, DrawCommand::Image { .. })));
    }

    #[test]
    fn long_header_is_shortened() {
        let measure = TextLayout::new();
        let engine = LayoutEngine::new(&measure, &FixedSizeDecoder, ReportLayoutMode::Stacked, 8.0);
        let font = FontSpec::bold(11.0);
        assert_eq!(engine.fit_line("Lunch @ 1:00 PM", 100.0, font), "Lunch @ 1:00 PM");
        let long = "Leftover birthday cake shared with the whole team ".repeat(4);
        let fitted = engine.fit_line(&long, 100.0, font);
        assert!(fitted.ends_with("..."));
        assert!(measure.width(&fitted, font) <= 100.0);
    }

    #[test]
    fn inline_label_shares_baseline_with_value() {
        let measure = TextLayout::new();
        let engine = LayoutEngine::new(&measure, &FixedSizeDecoder, ReportLayoutMode::Inline, 8.0);
        let now = Utc::now();
        let mut entry = DiaryEntry::new(now);
        entry.place = "Office".to_string();
        let groups = vec![DayGroup {
            day: now.date_naive(),
            entries: vec![&entry],
        }];
        let mut canvas = page_writer_canvas();
        engine.layout(&groups, &now, &mut canvas).unwrap();

        let baselines: Vec<(String, f64)> = canvas.pages()[0]
            .elements
            .iter()
            .filter_map(|e| match &e.draw {
                DrawCommand::Text { lines, baseline, .. } => Some((lines.join(" "), *baseline)),
                _ => None,
            })
            .collect();
        let label = baselines.iter().find(|(t, _)| t == "Place:").unwrap();
        let value = baselines.iter().find(|(t, _)| t == "Office").unwrap();
        assert_eq!(label.1, value.1);
    }
}
