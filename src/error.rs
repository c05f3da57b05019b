//! Structured error types for the report engine.
//!
//! Three variants come straight from the export itself (empty window, a
//! photo that will not decode, a draw outside the page). The rest cover the
//! edges around it: parsing input, reading config, writing the file.

use thiserror::Error;

/// The unified error type returned by all public report functions.
#[derive(Debug, Error)]
pub enum ReportError {
    /// No entry falls inside the requested window. Nothing is drawn or saved.
    #[error("No entries in that range (last {window_days} days)")]
    EmptyRange { window_days: u32 },

    /// A photo's bytes could not be decoded or re-encoded.
    #[error("Photo {index} of '{entry}' could not be decoded: {reason}")]
    ImageDecode {
        entry: String,
        index: usize,
        reason: String,
    },

    /// A draw command would leave the printable area of the page.
    #[error("Content does not fit on page {page}: {detail}")]
    CanvasOverflow { page: usize, detail: String },

    /// JSON input failed to parse as diary entries or report config.
    #[error("Failed to parse input: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A configuration value is out of range.
    #[error("Invalid config: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the diary entry schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ReportError::Parse { source: e, hint }
    }
}
