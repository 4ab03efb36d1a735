//! JSON file storage in the config directory
//!
//! `config.json` holds the operator configuration and `last.json` the sync
//! cursor, both as plain JSON so they can be inspected and edited by hand.

use anyhow::{Context, Result};
use config::ConfigDir;

use super::{ConfigStore, CursorStore};
use crate::error::{ConfigError, CursorError};
use crate::models::{RawConfig, SyncCursor};
use crate::sync::timing::Clock;

/// Configuration filename in the config directory
pub const CONFIG_FILE: &str = "config.json";

/// Cursor filename in the config directory
pub const CURSOR_FILE: &str = "last.json";

/// Suffix of the copy made before replacing an unreadable cursor file
const CORRUPT_SUFFIX: &str = "corrupt";

/// Cursor stored in `last.json`
pub struct FileCursorStore<C: Clock> {
    dir: ConfigDir,
    clock: C,
}

impl<C: Clock> FileCursorStore<C> {
    pub fn new(dir: ConfigDir, clock: C) -> Self {
        Self { dir, clock }
    }

    fn parse(&self) -> Result<SyncCursor, CursorError> {
        let content = self
            .dir
            .read_to_string(CURSOR_FILE)
            .map_err(CursorError::Io)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.dir.path(CURSOR_FILE).display()))
            .map_err(CursorError::Malformed)
    }
}

impl<C: Clock> CursorStore for FileCursorStore<C> {
    fn load(&self) -> Result<SyncCursor, CursorError> {
        if self.dir.exists(CURSOR_FILE) {
            let cursor = self.parse()?;
            log::info!("Retrieved existing cursor, last synced up to {}", cursor.last);
            return Ok(cursor);
        }

        let cursor = SyncCursor::first_run(self.clock.now());
        self.dir
            .save_json(CURSOR_FILE, &cursor)
            .map_err(CursorError::Io)?;
        log::info!(
            "Created new cursor at {} starting from {}",
            self.dir.path(CURSOR_FILE).display(),
            cursor.last
        );
        Ok(cursor)
    }

    fn save(&self, cursor: &SyncCursor) -> Result<()> {
        if self.dir.exists(CURSOR_FILE) && matches!(self.parse(), Err(CursorError::Malformed(_))) {
            let copy = self.dir.copy_aside(CURSOR_FILE, CORRUPT_SUFFIX)?;
            log::warn!("Kept unreadable cursor file as {}", copy.display());
        }
        self.dir.save_json(CURSOR_FILE, cursor)
    }
}

/// Configuration stored in `config.json`
pub struct FileConfigStore {
    dir: ConfigDir,
}

impl FileConfigStore {
    pub fn new(dir: ConfigDir) -> Self {
        Self { dir }
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<RawConfig, ConfigError> {
        if !self.dir.exists(CONFIG_FILE) {
            let empty = RawConfig::new();
            self.save(&empty)?;
            log::info!("Created config file at {}", self.dir.path(CONFIG_FILE).display());
            return Ok(empty);
        }
        self.dir.load_json(CONFIG_FILE).map_err(ConfigError::Malformed)
    }

    fn save(&self, config: &RawConfig) -> Result<(), ConfigError> {
        self.dir
            .save_json(CONFIG_FILE, config)
            .map_err(ConfigError::Persist)
    }
}
