//! Error types for configuration and sync runs

use crate::models::EntryKind;

/// Problems with the operator configuration
///
/// All of these are raised before any network activity.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required setting `{0}` is missing")]
    Missing(&'static str),

    #[error("setting `{key}` is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("month {0} is out of range (expected 0-11, 0 = January)")]
    MonthOutOfRange(u32),

    #[error("year {0} is out of range")]
    YearOutOfRange(i32),

    #[error("persisted configuration is unreadable: {0:#}")]
    Malformed(anyhow::Error),

    #[error("failed to persist configuration: {0:#}")]
    Persist(anyhow::Error),

    #[error("interactive input failed: {0:#}")]
    Prompt(anyhow::Error),
}

/// Problems reading the persisted cursor
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    #[error("cursor file is malformed: {0:#}")]
    Malformed(anyhow::Error),

    #[error("cursor file could not be accessed: {0:#}")]
    Io(anyhow::Error),
}

/// Why a sync run stopped without committing
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to fetch {kind} entries from Nightscout: {error:#}")]
    Fetch { kind: EntryKind, error: anyhow::Error },

    #[error("LibreView authentication failed: {0}")]
    Auth(String),

    #[error("transfer to LibreView failed: {0:#}")]
    Transfer(anyhow::Error),

    #[error("transfer succeeded but the cursor could not be saved: {0:#}")]
    Checkpoint(anyhow::Error),
}

impl SyncError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            SyncError::Config(_) => 1,
            SyncError::Auth(_) => 2,
            SyncError::Transfer(_) => 3,
            SyncError::Fetch { .. } => 4,
            SyncError::Checkpoint(_) => 5,
        }
    }
}
