//! ns-libre-sync - Transfers Nightscout data to LibreView
//!
//! Interactive runs backfill one month; automatic runs transfer everything
//! since the previous run and are meant to be started by a scheduler.

use bridge::models::keys;
use bridge::{
    ConfigError, FileConfigStore, FileCursorStore, LibreViewClient, NightscoutClient, ProcessEnv,
    Resolver, SyncError, SyncJob, SystemClock, run_job,
};
use clap::Parser;
use config::ConfigDir;
use log::info;
use std::process::ExitCode;

mod cli;
mod output;
mod prompt;

use cli::Cli;
use prompt::TerminalPrompter;

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("{}", output::error_line(&e));
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), SyncError> {
    let dir = ConfigDir::init(cli.config_dir.clone()).map_err(ConfigError::Persist)?;
    info!("Using config directory {}", dir.root().display());

    let clock = SystemClock;
    let store = FileConfigStore::new(dir.clone());
    let resolution =
        Resolver::new(&store, &ProcessEnv, &clock).resolve(&mut TerminalPrompter::default())?;

    let Some(job) = SyncJob::from_resolution(&resolution) else {
        println!("{}", output::deferred_instructions(dir.root()));
        return Ok(());
    };

    if job.mode.is_automatic() {
        output::disable_colors();
        println!("Using configuration:\n{}", output::config_summary(&job.config));
        let grace = cli.grace_period();
        if !grace.is_zero() {
            println!("Starting in {}s, press Ctrl+C to cancel", grace.as_secs());
            std::thread::sleep(grace);
        }
    }

    let source = NightscoutClient::new(&job.config.source_url, job.config.source_token.clone())
        .map_err(|e| ConfigError::Invalid {
            key: keys::NIGHTSCOUT_URL,
            reason: format!("{e:#}"),
        })?;
    let sink = LibreViewClient::new().map_err(SyncError::Transfer)?;
    let cursors = FileCursorStore::new(dir, clock);

    let report = run_job(&job, &source, &sink, &cursors, &clock)?;
    println!("{}", output::report_line(&report));
    Ok(())
}
