//! # Food Diary
//!
//! Turns a list of food-diary entries into a paginated PDF report: the last
//! N days of meals, grouped by day, each meal with its notes on the left and
//! its photos on the right.
//!
//! Pages are laid out one at a time with the page boundary as a hard
//! constraint. Every block checks the space left before it draws; when a
//! block does not fit it moves or splits onto the next page, repeating the
//! day and meal headers so nothing is left orphaned.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON / API)
//!       ↓
//!   [model]  : DiaryEntry, Photo, DayGroup
//!       ↓
//!   [report] : Window filter, group by local day, ordering
//!       ↓
//!   [layout] : Page-aware report layout (text via [text], photos via [image_loader])
//!       ↓
//!   [canvas] : Records draw calls per page, enforces page bounds
//!       ↓
//!   [pdf]    : Serialize to PDF bytes
//!       ↓
//!   [sink]   : Save under food-diary-<N>-days.pdf
//! ```

pub mod canvas;
pub mod config;
pub mod error;
pub mod font;
pub mod format;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod report;
pub mod sink;
pub mod text;

use chrono::{DateTime, Local, TimeZone};

use canvas::{Canvas, PageCanvas};
use config::ReportConfig;
use error::ReportError;
use image_loader::{JpegRescaler, PhotoDecoder};
use layout::{LayoutEngine, REPORT_TITLE};
use model::DiaryEntry;
use pdf::{Metadata, PdfWriter};
use sink::ReportSink;
use text::{TextLayout, TextMeasure};

/// A finished report, ready to be saved.
#[derive(Debug, Clone)]
pub struct Report {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Build the report for `entries` as of `now`.
///
/// Times are shown, and days are cut, in `now`'s time zone.
pub fn build_report<Tz: TimeZone>(
    entries: &[DiaryEntry],
    config: &ReportConfig,
    now: DateTime<Tz>,
) -> Result<Report, ReportError> {
    build_report_with(entries, config, now, &TextLayout::new(), &JpegRescaler::default())
}

/// [`build_report`] with explicit text measurement and photo decoding.
pub fn build_report_with<Tz: TimeZone>(
    entries: &[DiaryEntry],
    config: &ReportConfig,
    now: DateTime<Tz>,
    measure: &dyn TextMeasure,
    decoder: &dyn PhotoDecoder,
) -> Result<Report, ReportError> {
    config.validate()?;

    let in_window = report::filter_window(entries, config.window_days, &now);
    if in_window.is_empty() {
        return Err(ReportError::EmptyRange {
            window_days: config.window_days,
        });
    }
    let groups = report::group_by_day(in_window, &now.timezone(), config.entry_order);

    let (width, height) = config.page_size.dimensions();
    let mut canvas = PageCanvas::new(width, height, config.margin);
    let engine = LayoutEngine::new(measure, decoder, config.mode, config.margin);
    engine.layout(&groups, &now, &mut canvas)?;

    let page_count = canvas.page_count();
    let (pages, bookmarks) = canvas.finish();
    let metadata = Metadata {
        title: Some(REPORT_TITLE.to_string()),
        ..Default::default()
    };
    let bytes = PdfWriter::new().write(&pages, &bookmarks, &metadata);

    let entry_count: usize = groups.iter().map(|g| g.entries.len()).sum();
    log::info!(
        "laid out {} entries over {} days on {} pages ({} bytes)",
        entry_count,
        groups.len(),
        page_count,
        bytes.len()
    );

    Ok(Report {
        filename: report::report_filename(config.window_days),
        bytes,
        page_count,
    })
}

/// Build the report as of the local current time and save it through
/// `sink`. Nothing is saved when the build fails.
pub fn export_report(
    entries: &[DiaryEntry],
    config: &ReportConfig,
    sink: &mut dyn ReportSink,
) -> Result<Report, ReportError> {
    let report = build_report(entries, config, Local::now())?;
    sink.save(&report.filename, &report.bytes)?;
    Ok(report)
}

/// Parse a JSON array of diary entries and build the report as of now.
pub fn render_entries_json(json: &str, config: &ReportConfig) -> Result<Report, ReportError> {
    let entries: Vec<DiaryEntry> = serde_json::from_str(json)?;
    build_report(&entries, config, Local::now())
}
