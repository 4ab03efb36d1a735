//! Operator configuration models
//!
//! [`RawConfig`] is the JSON object persisted in `config.json`, kept loose so
//! unknown keys and environment overrides survive a round trip.
//! [`EffectiveConfig`] is the validated, run-ready view of it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::EntryKind;
use crate::error::ConfigError;

/// Keys used in `config.json` and as environment variable names
pub mod keys {
    pub const NIGHTSCOUT_URL: &str = "nightscoutUrl";
    pub const NIGHTSCOUT_TOKEN: &str = "nightscoutToken";
    pub const LIBRE_USERNAME: &str = "libreUsername";
    pub const LIBRE_PASSWORD: &str = "librePassword";
    pub const LIBRE_DEVICE: &str = "libreDevice";
    pub const GLUCOSE: &str = "glucose";
    pub const FOOD: &str = "food";
    pub const INSULIN: &str = "insulin";
    pub const AUTO: &str = "auto";
}

/// The persisted configuration object
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawConfig(pub Map<String, Value>);

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// A string value, if present and textual
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// A boolean value, if present and boolean
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn is_auto(&self) -> bool {
        self.get_bool(keys::AUTO) == Some(true)
    }

    fn text(&self, key: &'static str) -> Result<Option<String>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(_)) => Err(ConfigError::Invalid {
                key,
                reason: "expected text but found a boolean".into(),
            }),
            Some(other) => Err(ConfigError::Invalid {
                key,
                reason: format!("expected text, found {other}"),
            }),
        }
    }

    fn required_text(&self, key: &'static str) -> Result<String, ConfigError> {
        self.text(key)?.ok_or(ConfigError::Missing(key))
    }

    fn flag(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(ConfigError::Invalid {
                key,
                reason: format!("expected true/false or 1/0, found {other}"),
            }),
        }
    }
}

/// Validated configuration for one run
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    #[serde(rename = "nightscoutUrl")]
    pub source_url: String,
    #[serde(rename = "nightscoutToken", default, skip_serializing_if = "Option::is_none")]
    pub source_token: Option<String>,
    #[serde(rename = "libreUsername")]
    pub source_username: String,
    #[serde(rename = "librePassword")]
    pub source_password: String,
    #[serde(rename = "libreDevice")]
    pub sink_device_id: String,
    #[serde(rename = "glucose")]
    pub transfer_glucose: bool,
    #[serde(rename = "food")]
    pub transfer_food: bool,
    #[serde(rename = "insulin")]
    pub transfer_insulin: bool,
    #[serde(rename = "auto")]
    pub auto_mode: bool,
}

impl EffectiveConfig {
    /// Validate a persisted configuration
    ///
    /// Transfer toggles default to enabled and `auto` to disabled when absent.
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            source_url: raw.required_text(keys::NIGHTSCOUT_URL)?,
            source_token: raw.text(keys::NIGHTSCOUT_TOKEN)?,
            source_username: raw.required_text(keys::LIBRE_USERNAME)?,
            source_password: raw.required_text(keys::LIBRE_PASSWORD)?,
            sink_device_id: raw.required_text(keys::LIBRE_DEVICE)?,
            transfer_glucose: raw.flag(keys::GLUCOSE, true)?,
            transfer_food: raw.flag(keys::FOOD, true)?,
            transfer_insulin: raw.flag(keys::INSULIN, true)?,
            auto_mode: raw.flag(keys::AUTO, false)?,
        })
    }

    /// Whether entries of `kind` should be fetched and transferred
    pub fn transfers(&self, kind: EntryKind) -> bool {
        match kind {
            EntryKind::Glucose => self.transfer_glucose,
            EntryKind::Food => self.transfer_food,
            EntryKind::Insulin => self.transfer_insulin,
        }
    }
}

/// Secrets are masked so the configuration can be printed and logged
impl fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveConfig")
            .field("source_url", &self.source_url)
            .field("source_token", &self.source_token.as_ref().map(|_| "********"))
            .field("source_username", &self.source_username)
            .field("source_password", &"********")
            .field("sink_device_id", &self.sink_device_id)
            .field("transfer_glucose", &self.transfer_glucose)
            .field("transfer_food", &self.transfer_food)
            .field("transfer_insulin", &self.transfer_insulin)
            .field("auto_mode", &self.auto_mode)
            .finish()
    }
}
