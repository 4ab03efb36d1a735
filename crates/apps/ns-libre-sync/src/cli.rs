//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "ns-libre-sync")]
#[command(version, about = "Transfer Nightscout glucose, food and insulin data to LibreView")]
pub struct Cli {
    /// Directory holding config.json and last.json
    #[arg(long, value_name = "DIR", env = config::CONFIG_DIR_ENV)]
    pub config_dir: Option<PathBuf>,

    /// Seconds to wait before an automatic run starts (0 to start at once)
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub delay: u64,
}

impl Cli {
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.delay)
    }
}
