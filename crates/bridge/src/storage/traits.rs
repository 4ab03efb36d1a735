//! Storage trait definitions

use anyhow::Result;

use crate::error::{ConfigError, CursorError};
use crate::models::{RawConfig, SyncCursor};

/// Persistence for the sync cursor
///
/// Implementations are only written to by the orchestrator, and only after a
/// confirmed transfer.
pub trait CursorStore {
    /// Load the cursor, creating and persisting the first-run default if none exists
    fn load(&self) -> Result<SyncCursor, CursorError>;

    /// Overwrite the persisted cursor
    fn save(&self, cursor: &SyncCursor) -> Result<()>;
}

/// Persistence for the operator configuration
pub trait ConfigStore {
    /// Load the configuration, creating an empty one if none exists
    fn load(&self) -> Result<RawConfig, ConfigError>;

    /// Overwrite the persisted configuration
    fn save(&self, config: &RawConfig) -> Result<(), ConfigError>;
}
