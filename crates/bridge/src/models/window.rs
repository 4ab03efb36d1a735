//! Time window and run mode models

use chrono::{DateTime, Utc};
use std::fmt;

use crate::sync::timing::to_iso;

/// Half-open interval `[from, to)` of record times to transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Whether `ts` falls inside the window
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from <= ts && ts < self.to
    }

    pub fn from_iso(&self) -> String {
        to_iso(self.from)
    }

    pub fn to_iso(&self) -> String {
        to_iso(self.to)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.from_iso(), self.to_iso())
    }
}

/// How the window of a run is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Everything since the persisted cursor, up to now
    Automatic,
    /// One calendar month; `month` counts from 0 (January) to 11 (December)
    Manual { year: i32, month: u32 },
}

impl RunMode {
    pub fn is_automatic(&self) -> bool {
        matches!(self, RunMode::Automatic)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Automatic => f.write_str("Auto"),
            RunMode::Manual { .. } => f.write_str("Manual"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_is_half_open() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let window = TimeWindow::new(from, to);

        assert!(window.contains(from));
        assert!(window.contains(Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap()));
        assert!(!window.contains(to));
    }

    #[test]
    fn test_window_display() {
        let window = TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
        );
        assert_eq!(
            window.to_string(),
            "2024-03-01T00:00:00.000Z - 2024-04-01T00:00:00.000Z"
        );
    }
}
