//! Environment overrides for unattended runs

use serde_json::Value;
use std::collections::HashMap;

use crate::models::{RawConfig, keys};

/// Every key that must come from the environment for a run to be unattended
pub const REQUIRED_KEYS: [&str; 8] = [
    keys::NIGHTSCOUT_URL,
    keys::NIGHTSCOUT_TOKEN,
    keys::LIBRE_USERNAME,
    keys::LIBRE_PASSWORD,
    keys::GLUCOSE,
    keys::FOOD,
    keys::INSULIN,
    keys::LIBRE_DEVICE,
];

/// Keys whose environment values are read as booleans
pub const TOGGLE_KEYS: [&str; 3] = [keys::GLUCOSE, keys::FOOD, keys::INSULIN];

/// A provider of environment variables
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed set of variables
#[derive(Debug, Default, Clone)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// Interpret an environment value: `true`/`1` and `false`/`0` become booleans
pub fn coerce(value: &str) -> Value {
    match value {
        "true" | "1" => Value::Bool(true),
        "false" | "0" => Value::Bool(false),
        other => Value::String(other.to_string()),
    }
}

/// Overlay every required key found in `env` onto `raw`
///
/// Only the transfer toggles are coerced; credentials such as a password of
/// `"1"` stay text. Returns true when all keys were present.
pub fn apply_overrides(raw: &mut RawConfig, env: &dyn EnvSource) -> bool {
    let mut all_present = true;
    for key in REQUIRED_KEYS {
        match env.var(key) {
            Some(value) if TOGGLE_KEYS.contains(&key) => raw.set(key, coerce(&value)),
            Some(value) => raw.set(key, value),
            None => {
                log::info!("Environment variable {} is missing", key);
                all_present = false;
            }
        }
    }
    all_present
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_env() -> MapEnv {
        MapEnv::new()
            .with(keys::NIGHTSCOUT_URL, "https://ns.example.com")
            .with(keys::NIGHTSCOUT_TOKEN, "reader-abc")
            .with(keys::LIBRE_USERNAME, "user@example.com")
            .with(keys::LIBRE_PASSWORD, "hunter2")
            .with(keys::GLUCOSE, "true")
            .with(keys::FOOD, "0")
            .with(keys::INSULIN, "1")
            .with(keys::LIBRE_DEVICE, "DEVICE-1")
    }

    #[test]
    fn test_coerce_booleans() {
        assert_eq!(coerce("true"), Value::Bool(true));
        assert_eq!(coerce("1"), Value::Bool(true));
        assert_eq!(coerce("false"), Value::Bool(false));
        assert_eq!(coerce("0"), Value::Bool(false));
    }

    #[test]
    fn test_coerce_passes_other_strings_through() {
        assert_eq!(coerce("yes"), Value::String("yes".into()));
        assert_eq!(coerce("TRUE"), Value::String("TRUE".into()));
        assert_eq!(coerce(""), Value::String(String::new()));
        assert_eq!(coerce("https://ns.example.com"), Value::String("https://ns.example.com".into()));
    }

    #[test]
    fn test_apply_overrides_complete() {
        let mut raw = RawConfig::new();
        raw.set(keys::NIGHTSCOUT_URL, "https://old.example.com");

        assert!(apply_overrides(&mut raw, &complete_env()));
        assert_eq!(raw.get_str(keys::NIGHTSCOUT_URL), Some("https://ns.example.com"));
        assert_eq!(raw.get_bool(keys::FOOD), Some(false));
        assert_eq!(raw.get_bool(keys::INSULIN), Some(true));
    }

    #[test]
    fn test_apply_overrides_partial() {
        let env = MapEnv::new().with(keys::LIBRE_USERNAME, "someone");
        let mut raw = RawConfig::new();
        raw.set(keys::LIBRE_PASSWORD, "kept");

        assert!(!apply_overrides(&mut raw, &env));
        assert_eq!(raw.get_str(keys::LIBRE_USERNAME), Some("someone"));
        assert_eq!(raw.get_str(keys::LIBRE_PASSWORD), Some("kept"));
    }

    #[test]
    fn test_boolean_looking_credentials_stay_text() {
        let env = complete_env()
            .with(keys::LIBRE_PASSWORD, "1")
            .with(keys::NIGHTSCOUT_TOKEN, "false");
        let mut raw = RawConfig::new();

        assert!(apply_overrides(&mut raw, &env));
        assert_eq!(raw.get_str(keys::LIBRE_PASSWORD), Some("1"));
        assert_eq!(raw.get_str(keys::NIGHTSCOUT_TOKEN), Some("false"));
        assert_eq!(raw.get_bool(keys::FOOD), Some(false));

        let config = crate::models::EffectiveConfig::from_raw(&raw).unwrap();
        assert_eq!(config.source_password, "1");
        assert_eq!(config.source_token.as_deref(), Some("false"));
    }

    #[test]
    fn test_map_env_from_iter() {
        let env: MapEnv = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(env.var("a").as_deref(), Some("1"));
        assert!(env.var("c").is_none());
    }
}
