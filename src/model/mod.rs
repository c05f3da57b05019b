//! # Diary Model
//!
//! The input representation for the report engine. An entry is one recorded
//! meal: a capture time, a handful of free-text fields, two optional fullness
//! scores and up to three photos. Entries are read-only as far as the engine
//! is concerned; layout borrows them and never writes back.
//!
//! The JSON shape matches what the diary app stores: camelCase keys, every
//! text field optional, photos as `{ "type": "image/jpeg", "data": "<base64>" }`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Label used in the entry header when the meal has no name.
pub const DEFAULT_MEAL_NAME: &str = "Meal";

/// One recorded meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    /// Store key. Carried through for callers, unused by layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    pub captured_at: DateTime<Utc>,

    #[serde(default)]
    pub meal_name: String,
    #[serde(default)]
    pub dish_components: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub ed_behaviors: String,
    #[serde(default)]
    pub feelings: String,
    #[serde(default)]
    pub comments: String,

    /// Fullness on a small scale. `0` means "not recorded".
    #[serde(default)]
    pub fullness_before: Option<u8>,
    #[serde(default)]
    pub fullness_after: Option<u8>,

    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl DiaryEntry {
    /// A bare entry with only a capture time. Handy for tests and builders.
    pub fn new(captured_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            captured_at,
            meal_name: String::new(),
            dish_components: String::new(),
            place: String::new(),
            ed_behaviors: String::new(),
            feelings: String::new(),
            comments: String::new(),
            fullness_before: None,
            fullness_after: None,
            photos: Vec::new(),
        }
    }

    /// The meal name without surrounding whitespace, or the placeholder when
    /// nothing is left.
    pub fn display_name(&self) -> &str {
        let name = self.meal_name.trim();
        if name.is_empty() {
            DEFAULT_MEAL_NAME
        } else {
            name
        }
    }

    /// Non-empty text fields as (label, value) rows, in report order.
    pub fn text_rows(&self) -> Vec<(&'static str, &str)> {
        [
            ("Dish & Components", self.dish_components.as_str()),
            ("Place", self.place.as_str()),
            ("Eating Disorder Behaviors", self.ed_behaviors.as_str()),
            ("Feelings or Emotions", self.feelings.as_str()),
            ("Comments", self.comments.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .collect()
    }

    /// Recorded fullness values as (label, value) pairs. Zero counts as absent.
    pub fn fullness_rows(&self) -> Vec<(&'static str, String)> {
        [
            ("Fullness Before", self.fullness_before),
            ("Fullness After", self.fullness_after),
        ]
        .into_iter()
        .filter_map(|(label, value)| match value {
            Some(v) if v > 0 => Some((label, v.to_string())),
            _ => None,
        })
        .collect()
    }
}

/// An attached photo: encoded bytes plus the MIME type it was stored with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    #[serde(rename = "type", default)]
    pub mime_type: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Entries captured on one local calendar day.
#[derive(Debug, Clone)]
pub struct DayGroup<'a> {
    pub day: NaiveDate,
    pub entries: Vec<&'a DiaryEntry>,
}

/// Order of entries inside a day group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryOrder {
    /// Most recent meal first. The on-screen list and primary report.
    #[default]
    NewestFirst,
    /// Earliest meal first.
    OldestFirst,
}

/// Standard page sizes in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    Letter,
    A4,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in millimetres.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::Letter => (215.9, 279.4),
            PageSize::A4 => (210.0, 297.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Photo bytes travel as base64 in JSON. Data URIs are accepted on input.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // data:image/jpeg;base64,/9j/4AAQ...
        let payload = if raw.starts_with("data:") {
            let comma = raw
                .find(',')
                .ok_or_else(|| serde::de::Error::custom("invalid data URI: missing comma"))?;
            &raw[comma + 1..]
        } else {
            raw.as_str()
        };
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| serde::de::Error::custom(format!("base64 decode error: {}", e)))
    }
}
