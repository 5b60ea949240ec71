//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Quiz generation defaults and the grading mode
//! - Model name, endpoint and optional API key
//! - Overtime storage backend, default owner and wage
//! - Holiday calendar used for default day-kind inference
//!
//! Configuration is stored at `~/.config/deskmate/config.toml`.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::overtime::Jurisdiction;
use crate::quiz::{Difficulty, MatchMode, PromptOptions};

/// Quiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Most recent wrong-pool questions sent to the model as context.
    #[serde(default = "default_wrong_pool_context")]
    pub wrong_pool_context: usize,
    /// Questions replayed in a remedial round.
    #[serde(default = "default_remedial_size")]
    pub remedial_size: usize,
}

/// Model client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_name")]
    pub name: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Falls back to the GEMINI_API_KEY environment variable when unset.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    /// Append-only CSV ledger.
    Ledger,
}

/// Overtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OvertimeConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub default_owner: Option<String>,
    #[serde(default)]
    pub hourly_wage: Option<f64>,
}

/// Holiday calendar configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    pub jurisdiction: Jurisdiction,
    #[serde(default = "default_weekend")]
    pub weekend: Vec<Weekday>,
    #[serde(default)]
    pub extra_holidays: Vec<NaiveDate>,
    /// Weekend dates that are working days.
    #[serde(default)]
    pub makeup_workdays: Vec<NaiveDate>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/deskmate/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub quiz: QuizConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub overtime: OvertimeConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

// Default functions
fn default_question_count() -> u32 {
    10
}
fn default_language() -> String {
    "Traditional Chinese".into()
}
fn default_wrong_pool_context() -> usize {
    5
}
fn default_remedial_size() -> usize {
    10
}
fn default_model_name() -> String {
    "gemini-1.5-flash".into()
}
fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn default_weekend() -> Vec<Weekday> {
    vec![Weekday::Sat, Weekday::Sun]
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            difficulty: Difficulty::default(),
            language: default_language(),
            match_mode: MatchMode::default(),
            wrong_pool_context: default_wrong_pool_context(),
            remedial_size: default_remedial_size(),
        }
    }
}

impl QuizConfig {
    pub fn prompt_options(&self) -> PromptOptions {
        PromptOptions {
            question_count: self.question_count,
            difficulty: self.difficulty,
            language: self.language.clone(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            endpoint: default_endpoint(),
            api_key: None,
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            jurisdiction: Jurisdiction::default(),
            weekend: default_weekend(),
            extra_holidays: Vec::new(),
            makeup_workdays: Vec::new(),
        }
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

    /// Candidate JSON encodings of `value`, typed by the value currently at
    /// `key`. An unset optional (null) could be a string or a number, so both
    /// are offered and the first that deserializes wins.
    fn candidate_values(
        existing: &serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<Vec<serde_json::Value>, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        Ok(match existing {
            serde_json::Value::Bool(_) => vec![serde_json::Value::Bool(
                value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
            )],
            serde_json::Value::Number(_) => {
                let number = if let Ok(n) = value.parse::<u64>() {
                    serde_json::Number::from(n)
                } else {
                    value
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                };
                vec![serde_json::Value::Number(number)]
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                vec![serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?]
            }
            serde_json::Value::Null => {
                let mut candidates = vec![serde_json::Value::String(value.into())];
                if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(value) {
                    candidates.push(parsed);
                }
                candidates
            }
            serde_json::Value::String(_) => vec![serde_json::Value::String(value.into())],
        })
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        new_value: serde_json::Value,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent) = parent {
            for part in parent.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        if !obj.contains_key(leaf) {
            return Err(unknown());
        }
        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
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

    /// Set a config value by key in memory. Returns error if the key is
    /// unknown or the value does not fit the field's type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        let existing = Self::get_json_value_by_path(&json, key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let mut last_err = None;
        for candidate in Self::candidate_values(existing, key, value)? {
            let mut updated = json.clone();
            Self::set_json_value_by_path(&mut updated, key, candidate)?;
            match serde_json::from_value::<Config>(updated) {
                Ok(cfg) => {
                    *self = cfg;
                    return Ok(());
                }
                Err(e) => last_err = Some(e.to_string()),
            }
        }
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: last_err.unwrap_or_else(|| format!("cannot use '{value}'")),
        })
    }

    /// Set a config value by key and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }
}
