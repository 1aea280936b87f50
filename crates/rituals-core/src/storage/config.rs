//! TOML-based application configuration.
//!
//! Stores:
//! - Display geometry and title font preference
//! - Colors for the normal, paused and overrun conditions
//! - Tick cadence and haptic alerts
//! - Ritual and derived-data file names
//!
//! Configuration is stored at `~/.config/rituals/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::display::Palette;
use crate::error::{ConfigError, Result};
use crate::input::DEFAULT_SWIPE_THRESHOLD;
use crate::session::SessionSettings;

/// Screen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Usable width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Keep act titles in the big font even when they need wrapping.
    #[serde(default)]
    pub large_titles: bool,
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: i32,
}

/// Timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Buzz when an act reaches its expected duration.
    #[serde(default = "default_true")]
    pub haptics: bool,
}

/// File names inside the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_rituals_file")]
    pub rituals_file: String,
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/rituals/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

// Default functions
fn default_width() -> u32 {
    176
}
fn default_swipe_threshold() -> i32 {
    DEFAULT_SWIPE_THRESHOLD
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}
fn default_rituals_file() -> String {
    "rituals.json".into()
}
fn default_data_file() -> String {
    "rituals_data.json".into()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            large_titles: false,
            swipe_threshold: default_swipe_threshold(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            haptics: true,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            rituals_file: default_rituals_file(),
            data_file: default_data_file(),
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
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }
            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                ),
                serde_json::Value::Number(_) => value
                    .parse::<i64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Location of `config.toml` in the data directory.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
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
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Set a config value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value has the wrong type.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            width: self.display.width,
            large_titles: self.display.large_titles,
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.display.width, 176);
        assert_eq!(parsed.timer.tick_interval_ms, 1000);
        assert_eq!(parsed.palette, Palette::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[display]\nwidth = 240\n").unwrap();
        assert_eq!(parsed.display.width, 240);
        assert_eq!(parsed.display.swipe_threshold, 10);
        assert!(parsed.timer.haptics);
        assert_eq!(parsed.storage.data_file, "rituals_data.json");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("display.width").as_deref(), Some("176"));
        assert_eq!(cfg.get("timer.haptics").as_deref(), Some("true"));
        assert_eq!(cfg.get("palette.paused_bg").as_deref(), Some("#FFF5BC"));
        assert!(cfg.get("display.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_value_updates_typed_fields() {
        let mut cfg = Config::default();
        cfg.set_value("display.large_titles", "true").unwrap();
        cfg.set_value("display.swipe_threshold", "25").unwrap();
        cfg.set_value("palette.overrun_bg", "#FF0000").unwrap();
        assert!(cfg.display.large_titles);
        assert_eq!(cfg.display.swipe_threshold, 25);
        assert_eq!(cfg.palette.overrun_bg, "#FF0000");
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set_value("display.nonexistent", "1").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(cfg.set_value("nothing.here", "1").is_err());
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("timer.haptics", "sometimes").is_err());
        assert!(cfg.set_value("display.width", "wide").is_err());
        assert!(cfg.set_value("display.width", "-5").is_err());
        assert_eq!(cfg.display.width, 176);
    }

    #[test]
    fn load_from_missing_file_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.display.width, 176);
    }

    #[test]
    fn load_from_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "display = 3 = 4").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn session_settings_follow_display() {
        let mut cfg = Config::default();
        cfg.display.width = 240;
        cfg.display.large_titles = true;
        let settings = cfg.session_settings();
        assert_eq!(settings.width, 240);
        assert!(settings.large_titles);
    }
}
