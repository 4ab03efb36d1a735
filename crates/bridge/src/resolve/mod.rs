//! Configuration resolution
//!
//! Merges, in order of priority:
//! 1. Environment overrides (all required keys present means an unattended run)
//! 2. The persisted `config.json`
//! 3. Interactive answers, using the persisted values as defaults
//!
//! The merged result is persisted before any sync work starts, so an
//! interrupted run keeps the operator's choices.

mod env;
mod prompt;

pub use env::{EnvSource, MapEnv, ProcessEnv, REQUIRED_KEYS, TOGGLE_KEYS, apply_overrides, coerce};
pub use prompt::{Answer, Prompter, Question, ScriptedPrompter};

use chrono::Datelike;
use uuid::Uuid;

use crate::error::ConfigError;
use crate::models::{EffectiveConfig, RawConfig, RunMode, keys};
use crate::storage::ConfigStore;
use crate::sync::planner::month_window;
use crate::sync::timing::Clock;

/// What this process should do, as decided by the resolver
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Unattended run over everything since the cursor
    Automatic { config: EffectiveConfig },
    /// Interactive backfill of one month (`month` counts from 0)
    Manual {
        config: EffectiveConfig,
        year: i32,
        month: u32,
        reset_device: bool,
    },
    /// Automatic mode was just switched on; the next invocation will sync
    Deferred { config: EffectiveConfig },
}

impl Resolution {
    pub fn config(&self) -> &EffectiveConfig {
        match self {
            Resolution::Automatic { config }
            | Resolution::Manual { config, .. }
            | Resolution::Deferred { config } => config,
        }
    }

    /// The run mode, or `None` when nothing should be synced now
    pub fn mode(&self) -> Option<RunMode> {
        match self {
            Resolution::Automatic { .. } => Some(RunMode::Automatic),
            Resolution::Manual { year, month, .. } => Some(RunMode::Manual {
                year: *year,
                month: *month,
            }),
            Resolution::Deferred { .. } => None,
        }
    }
}

/// Keep the existing device id unless a reset is requested or there is none
///
/// New ids are random v4 UUIDs in uppercase hyphenated form.
pub fn resolve_device_id(existing: Option<&str>, reset: bool) -> String {
    match existing {
        Some(id) if !reset && !id.is_empty() => id.to_string(),
        _ => Uuid::new_v4().hyphenated().to_string().to_uppercase(),
    }
}

/// Produces the effective configuration for one invocation
pub struct Resolver<'a> {
    store: &'a dyn ConfigStore,
    env: &'a dyn EnvSource,
    clock: &'a dyn Clock,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a dyn ConfigStore, env: &'a dyn EnvSource, clock: &'a dyn Clock) -> Self {
        Self { store, env, clock }
    }

    /// Resolve the configuration, prompting only when the run is not unattended
    pub fn resolve(&self, prompter: &mut dyn Prompter) -> Result<Resolution, ConfigError> {
        let mut raw = self.store.load()?;

        if apply_overrides(&mut raw, self.env) {
            log::info!("All settings provided by the environment, using automatic mode");
            raw.set(keys::AUTO, true);
            self.store.save(&raw)?;
            let config = EffectiveConfig::from_raw(&raw)?;
            return Ok(Resolution::Automatic { config });
        }

        if raw.is_auto() {
            let device = resolve_device_id(raw.get_str(keys::LIBRE_DEVICE), false);
            raw.set(keys::LIBRE_DEVICE, device);
            self.store.save(&raw)?;
            let config = EffectiveConfig::from_raw(&raw)?;
            return Ok(Resolution::Automatic { config });
        }

        self.ask(raw, prompter)
    }

    fn ask(&self, mut raw: RawConfig, prompter: &mut dyn Prompter) -> Result<Resolution, ConfigError> {
        let url = required(
            prompter.input(Question::SourceUrl, raw.get_str(keys::NIGHTSCOUT_URL)),
            keys::NIGHTSCOUT_URL,
        )?;
        let token = prompter
            .input(Question::SourceToken, raw.get_str(keys::NIGHTSCOUT_TOKEN))
            .map_err(ConfigError::Prompt)?;
        let username = required(
            prompter.input(Question::Username, raw.get_str(keys::LIBRE_USERNAME)),
            keys::LIBRE_USERNAME,
        )?;
        let password = required(
            prompter.password(Question::Password, raw.get_str(keys::LIBRE_PASSWORD)),
            keys::LIBRE_PASSWORD,
        )?;

        let glucose = confirm(prompter, Question::TransferGlucose, raw.get_bool(keys::GLUCOSE).unwrap_or(true))?;
        let food = confirm(prompter, Question::TransferFood, raw.get_bool(keys::FOOD).unwrap_or(true))?;
        let insulin = confirm(prompter, Question::TransferInsulin, raw.get_bool(keys::INSULIN).unwrap_or(true))?;
        let auto = confirm(prompter, Question::AutoMode, raw.get_bool(keys::AUTO).unwrap_or(false))?;

        let period = if auto { None } else { Some(self.ask_period(prompter)?) };
        let reset_device = confirm(prompter, Question::ResetDevice, false)?;

        let device = resolve_device_id(raw.get_str(keys::LIBRE_DEVICE), reset_device);
        raw.set(keys::NIGHTSCOUT_URL, url);
        raw.set(keys::NIGHTSCOUT_TOKEN, token);
        raw.set(keys::LIBRE_USERNAME, username);
        raw.set(keys::LIBRE_PASSWORD, password);
        raw.set(keys::GLUCOSE, glucose);
        raw.set(keys::FOOD, food);
        raw.set(keys::INSULIN, insulin);
        raw.set(keys::LIBRE_DEVICE, device);
        raw.set(keys::AUTO, auto);
        self.store.save(&raw)?;

        let config = EffectiveConfig::from_raw(&raw)?;
        Ok(match period {
            None => Resolution::Deferred { config },
            Some((year, month)) => Resolution::Manual {
                config,
                year,
                month,
                reset_device,
            },
        })
    }

    /// Ask for the month to backfill, defaulting to the current one
    fn ask_period(&self, prompter: &mut dyn Prompter) -> Result<(i32, u32), ConfigError> {
        let now = self.clock.now();

        let year = required(
            prompter.input(Question::Year, Some(&now.year().to_string())),
            "year",
        )?;
        let year: i32 = year.trim().parse().map_err(|_| ConfigError::Invalid {
            key: "year",
            reason: format!("{year:?} is not a number"),
        })?;

        let month = required(
            prompter.input(Question::Month, Some(&now.month0().to_string())),
            "month",
        )?;
        let month: u32 = month.trim().parse().map_err(|_| ConfigError::Invalid {
            key: "month",
            reason: format!("{month:?} is not a number"),
        })?;

        month_window(year, month)?;
        Ok((year, month))
    }
}

fn required(answer: anyhow::Result<String>, key: &'static str) -> Result<String, ConfigError> {
    let answer = answer.map_err(ConfigError::Prompt)?;
    if answer.trim().is_empty() {
        return Err(ConfigError::Missing(key));
    }
    Ok(answer.trim().to_string())
}

fn confirm(prompter: &mut dyn Prompter, question: Question, default: bool) -> Result<bool, ConfigError> {
    prompter
        .confirm(question, default)
        .map_err(ConfigError::Prompt)
}
