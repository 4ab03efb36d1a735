//! Entry model representing records fetched from Nightscout

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The three record kinds that are transferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Glucose,
    Food,
    Insulin,
}

impl EntryKind {
    /// All kinds, in transfer order
    pub const ALL: [EntryKind; 3] = [EntryKind::Glucose, EntryKind::Food, EntryKind::Insulin];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Glucose => "glucose",
            EntryKind::Food => "food",
            EntryKind::Insulin => "insulin",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single record as returned by the source
///
/// The sync engine never looks inside an entry; only the LibreView
/// converter reads fields from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry(pub Value);

impl Entry {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Look up a top-level field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Read a numeric field, accepting numbers encoded as strings
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// When the record happened
    ///
    /// Glucose entries carry `date` (epoch millis) and `dateString`;
    /// treatments carry `created_at`. The first usable one wins.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        if let Some(millis) = self.get("date").and_then(Value::as_i64) {
            if let Some(ts) = Utc.timestamp_millis_opt(millis).single() {
                return Some(ts);
            }
        }

        ["created_at", "dateString"].iter().find_map(|field| {
            let raw = self.get(field)?.as_str()?;
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Number of entries per kind in one batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchCounts {
    pub glucose: usize,
    pub food: usize,
    pub insulin: usize,
}

impl BatchCounts {
    pub fn total(&self) -> usize {
        self.glucose + self.food + self.insulin
    }
}

impl fmt::Display for BatchCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} glucose, {} food, {} insulin",
            self.glucose, self.food, self.insulin
        )
    }
}

/// The three sequences fetched in one run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EntryBatch {
    pub glucose: Vec<Entry>,
    pub food: Vec<Entry>,
    pub insulin: Vec<Entry>,
}

impl EntryBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: EntryKind) -> &[Entry] {
        match kind {
            EntryKind::Glucose => &self.glucose,
            EntryKind::Food => &self.food,
            EntryKind::Insulin => &self.insulin,
        }
    }

    pub fn set(&mut self, kind: EntryKind, entries: Vec<Entry>) {
        match kind {
            EntryKind::Glucose => self.glucose = entries,
            EntryKind::Food => self.food = entries,
            EntryKind::Insulin => self.insulin = entries,
        }
    }

    /// True when no kind has any entry
    pub fn is_empty(&self) -> bool {
        self.glucose.is_empty() && self.food.is_empty() && self.insulin.is_empty()
    }

    pub fn counts(&self) -> BatchCounts {
        BatchCounts {
            glucose: self.glucose.len(),
            food: self.food.len(),
            insulin: self.insulin.len(),
        }
    }
}
