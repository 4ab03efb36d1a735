//! Fetch, authenticate, transfer, checkpoint
//!
//! The cursor is written only after the sink confirms the transfer. Every
//! other way out of a run leaves it exactly as it was, so the next run
//! retries the same window.

use std::fmt;

use super::traits::{Credentials, EntrySink, EntrySource};
use crate::error::SyncError;
use crate::models::{BatchCounts, EffectiveConfig, EntryBatch, EntryKind, RunMode, SyncCursor, TimeWindow};
use crate::storage::CursorStore;

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Fetching,
    NothingToTransfer,
    Authenticating,
    AuthFailed,
    Transferring,
    TransferFailed,
    Committed,
}

impl RunState {
    /// Whether the run can't leave this state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::NothingToTransfer
                | RunState::AuthFailed
                | RunState::TransferFailed
                | RunState::Committed
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Fetching => "fetching",
            RunState::NothingToTransfer => "nothing-to-transfer",
            RunState::Authenticating => "authenticating",
            RunState::AuthFailed => "auth-failed",
            RunState::Transferring => "transferring",
            RunState::TransferFailed => "transfer-failed",
            RunState::Committed => "committed",
        };
        f.write_str(name)
    }
}

/// How a run that didn't fail ended
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// All three fetches came back empty; nothing was sent or saved
    NothingToTransfer,
    /// The sink accepted the batch and the cursor was saved
    Committed { cursor: SyncCursor, counts: BatchCounts },
}

/// Runs one transfer against a source, a sink and a cursor store
pub struct Orchestrator<'a> {
    source: &'a dyn EntrySource,
    sink: &'a dyn EntrySink,
    cursors: &'a dyn CursorStore,
}

impl<'a> Orchestrator<'a> {
    pub fn new(source: &'a dyn EntrySource, sink: &'a dyn EntrySink, cursors: &'a dyn CursorStore) -> Self {
        Self {
            source,
            sink,
            cursors,
        }
    }

    /// Transfer everything in `window`
    ///
    /// `cursor` is the value loaded at the start of the run. Automatic runs
    /// move its lower bound to `window.to`; manual backfills keep it and
    /// only refresh the recorded batch, so they never disturb the automatic
    /// chain.
    pub fn run(
        &self,
        config: &EffectiveConfig,
        cursor: &SyncCursor,
        window: &TimeWindow,
        mode: RunMode,
        reset_device: bool,
    ) -> Result<SyncOutcome, SyncError> {
        let mut state = RunState::Idle;

        advance(&mut state, RunState::Fetching);
        let batch = self.fetch_all(config, window)?;

        if batch.is_empty() {
            advance(&mut state, RunState::NothingToTransfer);
            log::info!("No glucose, food or insulin entries found for {}", window);
            return Ok(SyncOutcome::NothingToTransfer);
        }

        advance(&mut state, RunState::Authenticating);
        let credentials = Credentials {
            username: config.source_username.clone(),
            password: config.source_password.clone(),
            device_id: config.sink_device_id.clone(),
            reset_device,
        };
        let session = match self.sink.authenticate(&credentials) {
            Ok(Some(session)) if !session.token().is_empty() => session,
            Ok(_) => {
                advance(&mut state, RunState::AuthFailed);
                return Err(SyncError::Auth("credentials were rejected".into()));
            }
            Err(e) => {
                advance(&mut state, RunState::AuthFailed);
                return Err(SyncError::Auth(format!("{e:#}")));
            }
        };

        advance(&mut state, RunState::Transferring);
        let counts = batch.counts();
        log::info!("Transferring {}", counts);
        if let Err(e) = self.sink.transfer(&config.sink_device_id, &session, &batch) {
            advance(&mut state, RunState::TransferFailed);
            return Err(SyncError::Transfer(e));
        }

        let next = match mode {
            RunMode::Automatic => cursor.clone().advanced(window.to, &batch),
            RunMode::Manual { .. } => cursor.clone().with_batch(&batch),
        };
        self.cursors.save(&next).map_err(SyncError::Checkpoint)?;
        advance(&mut state, RunState::Committed);

        Ok(SyncOutcome::Committed {
            cursor: next,
            counts,
        })
    }

    /// Fetch every enabled kind; disabled kinds stay empty without a request
    fn fetch_all(&self, config: &EffectiveConfig, window: &TimeWindow) -> Result<EntryBatch, SyncError> {
        let mut batch = EntryBatch::new();
        for kind in EntryKind::ALL {
            if !config.transfers(kind) {
                log::debug!("Skipping {} entries (disabled)", kind);
                continue;
            }
            let entries = self
                .source
                .fetch(kind, window)
                .map_err(|error| SyncError::Fetch { kind, error })?;
            log::debug!("Fetched {} {} entries", entries.len(), kind);
            batch.set(kind, entries);
        }
        Ok(batch)
    }
}

fn advance(state: &mut RunState, next: RunState) {
    log::debug!("Sync run {} -> {}", state, next);
    *state = next;
}
