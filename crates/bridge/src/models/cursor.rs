//! Sync cursor tracking for incremental transfers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entry, EntryBatch};
use crate::sync::timing::{iso_millis, start_of_utc_day};

/// Persisted progress of automatic runs
///
/// `last` is the inclusive lower bound of the next automatic window. The
/// entry lists are copies of the most recently transferred batch, kept for
/// operator inspection only; nothing reads them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncCursor {
    #[serde(with = "iso_millis")]
    pub last: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glucose_entries: Option<Vec<Entry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_entries: Option<Vec<Entry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insulin_entries: Option<Vec<Entry>>,
}

impl SyncCursor {
    /// Create a cursor with no diagnostic batches
    pub fn starting_at(last: DateTime<Utc>) -> Self {
        Self {
            last,
            glucose_entries: None,
            food_entries: None,
            insulin_entries: None,
        }
    }

    /// The cursor used on the very first run: midnight UTC of `now`'s day
    pub fn first_run(now: DateTime<Utc>) -> Self {
        Self::starting_at(start_of_utc_day(now))
    }

    /// Record a transferred batch for inspection, keeping `last`
    pub fn with_batch(mut self, batch: &EntryBatch) -> Self {
        self.glucose_entries = Some(batch.glucose.clone());
        self.food_entries = Some(batch.food.clone());
        self.insulin_entries = Some(batch.insulin.clone());
        self
    }

    /// Move the lower bound to `to` and record the batch that got us there
    pub fn advanced(mut self, to: DateTime<Utc>, batch: &EntryBatch) -> Self {
        self.last = to;
        self.with_batch(batch)
    }
}
