//! Sync engine for moving entries from Nightscout to LibreView
//!
//! Runs are safe to repeat: nothing is checkpointed unless the sink
//! accepted the whole batch.

mod orchestrator;
pub mod planner;
pub mod timing;
mod traits;

pub use orchestrator::{Orchestrator, RunState, SyncOutcome};
pub use planner::{month_window, plan};
pub use timing::{Clock, FixedClock, SystemClock};
pub use traits::{AuthSession, Credentials, EntrySink, EntrySource};

use crate::error::SyncError;
use crate::models::{EffectiveConfig, RunMode, TimeWindow};
use crate::resolve::Resolution;
use crate::storage::{CursorStore, load_or_default};

/// One unit of work: what to transfer and how
#[derive(Debug, Clone, PartialEq)]
pub struct SyncJob {
    pub config: EffectiveConfig,
    pub mode: RunMode,
    pub reset_device: bool,
}

impl SyncJob {
    /// The job a resolution asks for, or `None` when the run was deferred
    pub fn from_resolution(resolution: &Resolution) -> Option<Self> {
        let mode = resolution.mode()?;
        let reset_device = match resolution {
            Resolution::Manual { reset_device, .. } => *reset_device,
            _ => false,
        };
        Some(Self {
            config: resolution.config().clone(),
            mode,
            reset_device,
        })
    }
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub mode: RunMode,
    pub window: TimeWindow,
    pub outcome: SyncOutcome,
    /// Duration of the run
    pub duration_ms: u64,
}

/// Load the cursor, plan the window and run the orchestrator
pub fn run_job(
    job: &SyncJob,
    source: &dyn EntrySource,
    sink: &dyn EntrySink,
    cursors: &dyn CursorStore,
    clock: &dyn Clock,
) -> Result<SyncReport, SyncError> {
    let start = std::time::Instant::now();

    let cursor = load_or_default(cursors, clock);
    let window = plan(job.mode, &cursor, clock.now())?;
    log::info!("Mode: {}", job.mode);
    log::info!("Transfer time period: {}", window);

    let outcome = Orchestrator::new(source, sink, cursors).run(
        &job.config,
        &cursor,
        &window,
        job.mode,
        job.reset_device,
    )?;

    match &outcome {
        SyncOutcome::NothingToTransfer => log::info!("Nothing to transfer"),
        SyncOutcome::Committed { cursor, counts } => {
            log::info!("Transferred {}; next run starts at {}", counts, cursor.last)
        }
    }

    Ok(SyncReport {
        mode: job.mode,
        window,
        outcome,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
