//! Nightscout record conversion
//!
//! Converts Nightscout entries and treatments into LibreView measurements.

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::models::{Entry, EntryKind};
use crate::sync::timing::to_iso;

/// Readings the sensor reports as out of range
const GLUCOSE_LOW: f64 = 40.0;
const GLUCOSE_HIGH: f64 = 400.0;

/// Record number for an entry of `kind` at `ts`
///
/// Derived from the entry time only, so a retried upload reuses the
/// numbers of the first attempt.
pub(super) fn record_number(kind: EntryKind, ts: DateTime<Utc>) -> i64 {
    let code = match kind {
        EntryKind::Glucose => 1,
        EntryKind::Food => 2,
        EntryKind::Insulin => 3,
    };
    ts.timestamp() * 10 + code
}

/// Read the value and time an entry needs, or warn and skip it
fn usable(entry: &Entry, kind: EntryKind, field: &str) -> Option<(f64, DateTime<Utc>)> {
    let value = entry.number(field).filter(|v| v.is_finite() && *v > 0.0);
    let ts = entry.timestamp();
    match (value, ts) {
        (Some(value), Some(ts)) => Some((value, ts)),
        _ => {
            log::warn!(
                "Skipping {} entry without usable {} or time: {}",
                kind,
                field,
                entry.as_value()
            );
            None
        }
    }
}

/// Convert sensor glucose values
pub fn glucose_entries(entries: &[Entry]) -> Vec<Value> {
    entries
        .iter()
        .filter_map(|entry| {
            let (sgv, ts) = usable(entry, EntryKind::Glucose, "sgv")?;
            let iso = to_iso(ts);
            Some(json!({
                "extendedProperties": {
                    "highOutOfRange": if sgv > GLUCOSE_HIGH { "true" } else { "false" },
                    "lowOutOfRange": if sgv < GLUCOSE_LOW { "true" } else { "false" },
                    "isFirstAfterTimeChange": false,
                    "CanMerge": "true"
                },
                "recordNumber": record_number(EntryKind::Glucose, ts),
                "timestamp": iso,
                "factoryTimestamp": iso,
                "valueInMgPerDl": sgv.round() as i64
            }))
        })
        .collect()
}

/// Convert carb treatments
pub fn food_entries(entries: &[Entry]) -> Vec<Value> {
    entries
        .iter()
        .filter_map(|entry| {
            let (carbs, ts) = usable(entry, EntryKind::Food, "carbs")?;
            let iso = to_iso(ts);
            Some(json!({
                "extendedProperties": { "factoryTimestamp": iso },
                "recordNumber": record_number(EntryKind::Food, ts),
                "timestamp": iso,
                "gramsCarbs": carbs,
                "foodType": "Unknown"
            }))
        })
        .collect()
}

/// Convert insulin treatments
pub fn insulin_entries(entries: &[Entry]) -> Vec<Value> {
    entries
        .iter()
        .filter_map(|entry| {
            let (units, ts) = usable(entry, EntryKind::Insulin, "insulin")?;
            let iso = to_iso(ts);
            Some(json!({
                "extendedProperties": { "factoryTimestamp": iso },
                "recordNumber": record_number(EntryKind::Insulin, ts),
                "timestamp": iso,
                "units": units,
                "insulinType": "RapidActing"
            }))
        })
        .collect()
}
