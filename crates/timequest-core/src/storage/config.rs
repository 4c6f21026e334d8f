//! TOML-based application configuration.
//!
//! Stores tunables including:
//! - Lesson completion payouts
//! - Focus quest timing and scoring constants
//! - AI endpoint settings
//!
//! Configuration is stored at `~/.config/timequest/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::data_dir;
use crate::error::ConfigError;

/// Coins paid by each lesson.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardsConfig {
    #[serde(default = "default_time_blocking")]
    pub time_blocking: u32,
    #[serde(default = "default_weekly_schedule")]
    pub weekly_schedule: u32,
    #[serde(default = "default_30")]
    pub prioritization: u32,
    #[serde(default = "default_30")]
    pub delegation: u32,
    #[serde(default = "default_smart_goals")]
    pub smart_goals: u32,
    #[serde(default = "default_focus_quest")]
    pub focus_quest: u32,
    /// Paid every time a custom time-blocking task is created.
    #[serde(default = "default_custom_task")]
    pub custom_task: u32,
}

/// Focus quest tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FocusConfig {
    #[serde(default = "default_game_secs")]
    pub game_secs: u32,
    #[serde(default = "default_initial_focus")]
    pub initial_focus: f64,
    /// Focus lost per second for each live distraction, spread over the decay ticks.
    #[serde(default = "default_loss_rate")]
    pub loss_rate: f64,
    /// Distractions younger than this do not drain focus yet.
    #[serde(default = "default_grace_ms")]
    pub grace_ms: u64,
    #[serde(default = "default_lifespan_ms")]
    pub lifespan_ms: u64,
    #[serde(default = "default_spawn_ms")]
    pub spawn_ms: u64,
    #[serde(default = "default_productive_chance")]
    pub productive_chance: f64,
    #[serde(default = "default_clock_ms")]
    pub clock_ms: u64,
    #[serde(default = "default_decay_ms")]
    pub decay_ms: u64,
    #[serde(default = "default_pass_score")]
    pub pass_score: u32,
}

/// External planner model settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timequest/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub focus: FocusConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

// Default functions
fn default_time_blocking() -> u32 {
    20
}
fn default_weekly_schedule() -> u32 {
    35
}
fn default_30() -> u32 {
    30
}
fn default_smart_goals() -> u32 {
    50
}
fn default_focus_quest() -> u32 {
    20
}
fn default_custom_task() -> u32 {
    5
}
fn default_game_secs() -> u32 {
    35
}
fn default_initial_focus() -> f64 {
    100.0
}
fn default_loss_rate() -> f64 {
    5.0
}
fn default_grace_ms() -> u64 {
    1000
}
fn default_lifespan_ms() -> u64 {
    4000
}
fn default_spawn_ms() -> u64 {
    1500
}
fn default_productive_chance() -> f64 {
    0.45
}
fn default_clock_ms() -> u64 {
    1000
}
fn default_decay_ms() -> u64 {
    100
}
fn default_pass_score() -> u32 {
    60
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            time_blocking: default_time_blocking(),
            weekly_schedule: default_weekly_schedule(),
            prioritization: 30,
            delegation: 30,
            smart_goals: default_smart_goals(),
            focus_quest: default_focus_quest(),
            custom_task: default_custom_task(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            game_secs: default_game_secs(),
            initial_focus: default_initial_focus(),
            loss_rate: default_loss_rate(),
            grace_ms: default_grace_ms(),
            lifespan_ms: default_lifespan_ms(),
            spawn_ms: default_spawn_ms(),
            productive_chance: default_productive_chance(),
            clock_ms: default_clock_ms(),
            decay_ms: default_decay_ms(),
            pass_score: default_pass_score(),
        }
    }
}

impl FocusConfig {
    /// Focus drained per decay tick by one aged distraction.
    pub fn drain_per_tick(&self) -> f64 {
        self.loss_rate * self.decay_ms as f64 / 1000.0
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Apply `TIMEQUEST_AI_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("TIMEQUEST_AI_BASE_URL") {
            self.base_url = v;
        }
        if let Ok(v) = std::env::var("TIMEQUEST_AI_MODEL") {
            self.model = v;
        }
        if let Ok(v) = std::env::var("TIMEQUEST_AI_KEY_ENV") {
            self.api_key_env = v;
        }
        self
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if the file is missing.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if key is unknown
    /// or the value does not fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// All leaf keys with their current values, in dot-path form.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
