//! Window planning
//!
//! Automatic runs chain: each committed run ends where the next one starts,
//! because the cursor is only saved on success and always saved as the
//! previous window's upper bound.

use chrono::{DateTime, Utc};

use super::timing::month_start;
use crate::error::ConfigError;
use crate::models::{RunMode, SyncCursor, TimeWindow};

/// Compute the window to fetch for this run
///
/// No clamping is done against future dates.
pub fn plan(mode: RunMode, cursor: &SyncCursor, now: DateTime<Utc>) -> Result<TimeWindow, ConfigError> {
    match mode {
        RunMode::Automatic => Ok(TimeWindow::new(cursor.last, now)),
        RunMode::Manual { year, month } => month_window(year, month),
    }
}

/// The whole calendar month `month` (0 = January) of `year`
pub fn month_window(year: i32, month: u32) -> Result<TimeWindow, ConfigError> {
    if month > 11 {
        return Err(ConfigError::MonthOutOfRange(month));
    }
    let from = month_start(year, month).ok_or(ConfigError::YearOutOfRange(year))?;
    let to = month_start(year, month + 1).ok_or(ConfigError::YearOutOfRange(year))?;
    Ok(TimeWindow::new(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_automatic_window_starts_at_cursor() {
        let cursor = SyncCursor::starting_at(utc(2024, 1, 1));
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 6, 15, 0).unwrap();

        let window = plan(RunMode::Automatic, &cursor, now).unwrap();
        assert_eq!(window, TimeWindow::new(utc(2024, 1, 1), now));
    }

    #[test]
    fn test_manual_window_covers_month() {
        let cursor = SyncCursor::starting_at(utc(2024, 6, 1));
        let window = plan(
            RunMode::Manual { year: 2024, month: 2 },
            &cursor,
            utc(2024, 6, 15),
        )
        .unwrap();

        assert_eq!(window.from_iso(), "2024-03-01T00:00:00.000Z");
        assert_eq!(window.to_iso(), "2024-04-01T00:00:00.000Z");
    }

    #[test]
    fn test_december_rolls_over() {
        let window = month_window(2023, 11).unwrap();
        assert_eq!(window, TimeWindow::new(utc(2023, 12, 1), utc(2024, 1, 1)));
    }

    #[test]
    fn test_month_out_of_range() {
        assert!(matches!(month_window(2024, 12), Err(ConfigError::MonthOutOfRange(12))));
    }

    #[test]
    fn test_year_out_of_range() {
        assert!(matches!(
            month_window(i32::MAX, 0),
            Err(ConfigError::YearOutOfRange(_))
        ));
    }

    #[test]
    fn test_future_month_is_not_clamped() {
        let window = month_window(2999, 0).unwrap();
        assert_eq!(window.from, utc(2999, 1, 1));
    }
}
