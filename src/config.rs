//! # Report Configuration
//!
//! Everything a caller can choose about a report. Every field has a
//! default, so an empty JSON object is a valid config and the CLI only has
//! to override what the user passed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::layout::{ReportLayoutMode, TEXT_COLUMN_WIDTH};
use crate::model::{EntryOrder, PageSize};

/// Options for one export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    /// Trailing window in days.
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    #[serde(default)]
    pub mode: ReportLayoutMode,

    #[serde(default)]
    pub entry_order: EntryOrder,

    #[serde(default)]
    pub page_size: PageSize,

    /// Uniform page margin in millimetres.
    #[serde(default = "default_margin")]
    pub margin: f64,
}

fn default_window_days() -> u32 {
    7
}

fn default_margin() -> f64 {
    8.0
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            mode: ReportLayoutMode::default(),
            entry_order: EntryOrder::default(),
            page_size: PageSize::default(),
            margin: default_margin(),
        }
    }
}

/// Narrowest margin accepted; most printers cannot reach closer to the edge.
const MIN_MARGIN: f64 = 5.0;
/// Smallest photo column worth laying out, in millimetres.
const MIN_PHOTO_COLUMN: f64 = 20.0;
/// Vertical room a fresh page needs: repeated headers, one text row and the
/// tallest photo row.
const MIN_CONTENT_HEIGHT: f64 = 60.0;

impl ReportConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ReportError> {
        let raw = std::fs::read_to_string(path)?;
        let config: ReportConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Reject page geometry the layout cannot work with.
    pub fn validate(&self) -> Result<(), ReportError> {
        if !self.margin.is_finite() || self.margin < MIN_MARGIN {
            return Err(ReportError::Config(format!(
                "margin must be at least {} mm, got {}",
                MIN_MARGIN, self.margin
            )));
        }

        let (width, height) = self.page_size.dimensions();
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ReportError::Config(format!(
                "page size must be positive, got {} x {} mm",
                width, height
            )));
        }

        let needed_width = 2.0 * self.margin + TEXT_COLUMN_WIDTH + 9.0 + MIN_PHOTO_COLUMN;
        if width < needed_width {
            return Err(ReportError::Config(format!(
                "page is {:.1} mm wide but margins of {:.1} mm need at least {:.1} mm",
                width, self.margin, needed_width
            )));
        }

        let needed_height = 2.0 * self.margin + MIN_CONTENT_HEIGHT;
        if height < needed_height {
            return Err(ReportError::Config(format!(
                "page is {:.1} mm tall but margins of {:.1} mm need at least {:.1} mm",
                height, self.margin, needed_height
            )));
        }

        Ok(())
    }
}
