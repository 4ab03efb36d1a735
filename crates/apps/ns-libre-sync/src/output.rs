//! Operator-facing console output

use bridge::{EffectiveConfig, SyncError, SyncOutcome, SyncReport};
use console::{Emoji, style};
use std::path::Path;

static CHECK: Emoji = Emoji("✓ ", "* ");
static CROSS: Emoji = Emoji("✗ ", "x ");
static INFO: Emoji = Emoji("ℹ ", "i ");

const MASK: &str = "********";

/// Drop styling on stdout and stderr, for output that ends up in a log file
pub fn disable_colors() {
    console::set_colors_enabled(false);
    console::set_colors_enabled_stderr(false);
}

/// The configuration about to be used, with secrets masked
pub fn config_summary(config: &EffectiveConfig) -> String {
    let yes_no = |on: bool| if on { style("yes").green() } else { style("no").red() };
    [
        format!("  Nightscout url:     {}", style(&config.source_url).cyan()),
        format!(
            "  Nightscout token:   {}",
            if config.source_token.is_some() { MASK } else { "(none)" }
        ),
        format!("  LibreView user:     {}", style(&config.source_username).cyan()),
        format!("  LibreView password: {MASK}"),
        format!("  LibreView device:   {}", style(&config.sink_device_id).dim()),
        format!("  Transfer glucose:   {}", yes_no(config.transfer_glucose)),
        format!("  Transfer food:      {}", yes_no(config.transfer_food)),
        format!("  Transfer insulin:   {}", yes_no(config.transfer_insulin)),
    ]
    .join("\n")
}

/// What to do after automatic mode was switched on
pub fn deferred_instructions(config_dir: &Path) -> String {
    format!(
        "{}Automatic mode is now enabled and saved in {}\n  \
         Run {} again (for example from cron) to transfer everything since the last run.\n  \
         To change settings, set {} to false in config.json.",
        INFO,
        style(config_dir.display()).dim(),
        style("ns-libre-sync").cyan(),
        style("\"auto\"").yellow()
    )
}

/// One line describing how a run ended
pub fn report_line(report: &SyncReport) -> String {
    match &report.outcome {
        SyncOutcome::NothingToTransfer => format!(
            "{}Nothing to transfer for {} ({} mode)",
            INFO, report.window, report.mode
        ),
        SyncOutcome::Committed { counts, .. } => format!(
            "{}Transferred {} for {} in {}ms",
            CHECK,
            style(counts).green(),
            report.window,
            report.duration_ms
        ),
    }
}

/// Failure line, styled for stderr
pub fn error_line(error: &SyncError) -> String {
    format!("{}{}", CROSS, style(error).for_stderr().red())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge::models::keys;
    use bridge::{BatchCounts, RawConfig, RunMode, SyncCursor, TimeWindow};
    use chrono::{TimeZone, Utc};

    fn config() -> EffectiveConfig {
        let mut raw = RawConfig::new();
        raw.set(keys::NIGHTSCOUT_URL, "https://ns.example.com");
        raw.set(keys::NIGHTSCOUT_TOKEN, "reader-abc");
        raw.set(keys::LIBRE_USERNAME, "user@example.com");
        raw.set(keys::LIBRE_PASSWORD, "hunter2");
        raw.set(keys::LIBRE_DEVICE, "DEVICE-1");
        raw.set(keys::FOOD, false);
        EffectiveConfig::from_raw(&raw).unwrap()
    }

    #[test]
    fn test_config_summary_masks_secrets() {
        console::set_colors_enabled(false);
        let summary = config_summary(&config());
        assert!(summary.contains("https://ns.example.com"));
        assert!(summary.contains("Transfer food:      no"));
        assert!(!summary.contains("hunter2"));
        assert!(!summary.contains("reader-abc"));
    }

    #[test]
    fn test_disable_colors_covers_stderr() {
        disable_colors();
        assert!(!console::colors_enabled());
        assert!(!console::colors_enabled_stderr());

        let err = SyncError::Auth("credentials were rejected".into());
        let line = error_line(&err);
        assert!(!line.contains('\u{1b}'));
        assert!(line.contains("credentials were rejected"));
    }

    #[test]
    fn test_report_line() {
        console::set_colors_enabled(false);
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let report = SyncReport {
            mode: RunMode::Automatic,
            window: TimeWindow::new(from, to),
            outcome: SyncOutcome::Committed {
                cursor: SyncCursor::starting_at(to),
                counts: BatchCounts {
                    glucose: 3,
                    food: 0,
                    insulin: 0,
                },
            },
            duration_ms: 12,
        };
        assert!(report_line(&report).contains("3 glucose, 0 food, 0 insulin"));

        let report = SyncReport {
            outcome: SyncOutcome::NothingToTransfer,
            ..report
        };
        assert!(report_line(&report).contains("Nothing to transfer"));
    }
}
