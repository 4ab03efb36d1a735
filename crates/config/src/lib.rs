//! Configuration directory handling for ns-libre-sync
//!
//! All persisted state (operator configuration and the sync cursor) lives as
//! JSON files in a single directory, by default `~/.config/ns-libre-sync/`.
//!
//! Call [`ConfigDir::init`] at application startup to bootstrap the directory.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Application directory name under the platform config dir
const APP_DIR: &str = "ns-libre-sync";

/// Environment variable that overrides the default directory location
pub const CONFIG_DIR_ENV: &str = "NS_LIBRE_SYNC_CONFIG_DIR";

/// Get the default config directory (~/.config/ns-libre-sync/)
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

/// A directory holding the JSON state files of one install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDir {
    root: PathBuf,
}

impl ConfigDir {
    /// Use an explicit directory
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the directory: explicit path, then [`CONFIG_DIR_ENV`], then the platform default
    pub fn locate(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = explicit {
            return Ok(Self::at(root));
        }
        if let Some(root) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::at(PathBuf::from(root)));
        }
        default_config_dir()
            .map(Self::at)
            .context("Could not determine config directory")
    }

    /// Locate the directory and create it if it doesn't exist.
    pub fn init(explicit: Option<PathBuf>) -> Result<Self> {
        let dir = Self::locate(explicit)?;
        dir.ensure()?;
        Ok(dir)
    }

    /// Root path of the directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to a file within the directory
    pub fn path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Check if a file exists in the directory
    pub fn exists(&self, filename: &str) -> bool {
        self.path(filename).exists()
    }

    /// Ensure the directory exists
    pub fn ensure(&self) -> Result<()> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).with_context(|| {
                format!("Failed to create config directory: {}", self.root.display())
            })?;
            log::info!("Created config directory at {}", self.root.display());
        }
        Ok(())
    }

    /// Read a file's raw text
    pub fn read_to_string(&self, filename: &str) -> Result<String> {
        let path = self.path(filename);
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))
    }

    /// Load and parse a JSON file from the directory
    pub fn load_json<T: DeserializeOwned>(&self, filename: &str) -> Result<T> {
        load_json_file(&self.path(filename))
    }

    /// Save a value as pretty-printed JSON
    ///
    /// The file is written next to its destination and renamed into place, so
    /// readers never observe a half-written file.
    pub fn save_json<T: Serialize>(&self, filename: &str, value: &T) -> Result<()> {
        self.ensure()?;
        let content = serde_json::to_string_pretty(value)?;
        let path = self.path(filename);
        let tmp = self.path(&format!("{filename}.tmp"));
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write config file: {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace config file: {}", path.display()))?;
        Ok(())
    }

    /// Copy a file aside under a new name, leaving the original in place
    pub fn copy_aside(&self, filename: &str, suffix: &str) -> Result<PathBuf> {
        let from = self.path(filename);
        let to = self.path(&format!("{filename}.{suffix}"));
        std::fs::copy(&from, &to)
            .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
        Ok(to)
    }
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_default_config_dir() {
        let dir = default_config_dir();
        assert!(dir.is_some());
        assert!(dir.unwrap().ends_with("ns-libre-sync"));
    }

    #[test]
    fn test_explicit_dir_wins() {
        let dir = ConfigDir::locate(Some(PathBuf::from("/tmp/elsewhere"))).unwrap();
        assert_eq!(dir.root(), Path::new("/tmp/elsewhere"));
        assert!(dir.path("config.json").ends_with("elsewhere/config.json"));
    }

    #[test]
    fn test_save_and_load_json() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ConfigDir::at(tmp.path().join("nested"));

        dir.save_json("state.json", &json!({ "last": "2024-01-01T00:00:00.000Z" }))
            .unwrap();
        assert!(dir.exists("state.json"));
        assert!(!dir.exists("state.json.tmp"));

        let loaded: Value = dir.load_json("state.json").unwrap();
        assert_eq!(loaded["last"], "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_load_malformed_json_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ConfigDir::at(tmp.path());
        std::fs::write(dir.path("broken.json"), "{ not json").unwrap();

        let result: Result<Value> = dir.load_json("broken.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_copy_aside_keeps_original() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ConfigDir::at(tmp.path());
        std::fs::write(dir.path("last.json"), "garbage").unwrap();

        let copy = dir.copy_aside("last.json", "corrupt").unwrap();
        assert!(copy.ends_with("last.json.corrupt"));
        assert_eq!(dir.read_to_string("last.json").unwrap(), "garbage");
        assert_eq!(std::fs::read_to_string(copy).unwrap(), "garbage");
    }
}
