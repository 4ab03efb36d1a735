//! In-memory storage implementation
//!
//! Used for testing and for embedding the engine without touching disk.

use anyhow::Result;
use std::sync::RwLock;

use super::{ConfigStore, CursorStore};
use crate::error::{ConfigError, CursorError};
use crate::models::{RawConfig, SyncCursor};

/// In-memory implementation of CursorStore
///
/// Counts saves so tests can assert that a run did not checkpoint.
pub struct InMemoryCursorStore {
    cursor: RwLock<SyncCursor>,
    saves: RwLock<usize>,
}

impl InMemoryCursorStore {
    pub fn new(cursor: SyncCursor) -> Self {
        Self {
            cursor: RwLock::new(cursor),
            saves: RwLock::new(0),
        }
    }

    /// The cursor as currently stored
    pub fn current(&self) -> SyncCursor {
        self.cursor.read().unwrap().clone()
    }

    /// How many times `save` has been called
    pub fn save_count(&self) -> usize {
        *self.saves.read().unwrap()
    }
}

impl CursorStore for InMemoryCursorStore {
    fn load(&self) -> Result<SyncCursor, CursorError> {
        Ok(self.current())
    }

    fn save(&self, cursor: &SyncCursor) -> Result<()> {
        *self.cursor.write().unwrap() = cursor.clone();
        *self.saves.write().unwrap() += 1;
        Ok(())
    }
}

/// In-memory implementation of ConfigStore
#[derive(Default)]
pub struct InMemoryConfigStore {
    config: RwLock<RawConfig>,
}

impl InMemoryConfigStore {
    pub fn new(config: RawConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// The configuration as currently stored
    pub fn current(&self) -> RawConfig {
        self.config.read().unwrap().clone()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load(&self) -> Result<RawConfig, ConfigError> {
        Ok(self.current())
    }

    fn save(&self, config: &RawConfig) -> Result<(), ConfigError> {
        *self.config.write().unwrap() = config.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_cursor_store_counts_saves() {
        let start = SyncCursor::starting_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let store = InMemoryCursorStore::new(start.clone());
        assert_eq!(store.load().unwrap(), start);
        assert_eq!(store.save_count(), 0);

        let next = SyncCursor::starting_at(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        store.save(&next).unwrap();
        assert_eq!(store.current(), next);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_config_store() {
        let store = InMemoryConfigStore::default();
        assert!(store.load().unwrap().0.is_empty());

        let mut raw = RawConfig::new();
        raw.set("auto", true);
        store.save(&raw).unwrap();
        assert!(store.current().is_auto());
    }
}
