//! Time helpers for window planning and cursor persistence
//!
//! Pure functions that can be tested without a real clock.

use chrono::{DateTime, Datelike, SecondsFormat, TimeZone, Utc};

/// Source of the current instant
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Midnight UTC of the day containing `now`
pub fn start_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), now.day(), 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// First instant of a month, with `month0` counted from 0 (January)
///
/// Month 12 is accepted and means January of the following year, so callers
/// can ask for "the month after December" directly.
pub fn month_start(year: i32, month0: u32) -> Option<DateTime<Utc>> {
    let (year, month0) = if month0 == 12 {
        (year.checked_add(1)?, 0)
    } else {
        (year, month0)
    };
    if month0 > 11 {
        return None;
    }
    Utc.with_ymd_and_hms(year, month0 + 1, 1, 0, 0, 0).single()
}

/// ISO-8601 with millisecond precision and a `Z` suffix
pub fn to_iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter writing timestamps with [`to_iso`]
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_iso(*ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
