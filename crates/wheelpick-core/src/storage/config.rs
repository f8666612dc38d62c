//! TOML-based picker configuration.
//!
//! Stores the tunables the engine deliberately does not hard-code:
//! - Numeric column geometry, velocity, damping and snap timing
//! - Period (AM/PM) column overrides
//! - Minute step for block-time and duration pickers
//! - Feedback toggles for the host's haptic/audio sink
//!
//! Configuration is stored at `~/.config/wheelpick/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::picker::{ColumnConfig, DampingProfile};
use crate::presets::{PresetKind, PresetOptions};

/// Feedback sink preferences. The engine always emits ticks; these decide
/// whether the host forwards them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default = "default_true")]
    pub haptics: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_volume")]
    pub volume: u32,
}

/// Picker configuration.
///
/// Serialized to/from TOML at `~/.config/wheelpick/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_minute_step")]
    pub minute_step: u32,
    #[serde(default)]
    pub numeric: ColumnConfig,
    #[serde(default = "default_period_column")]
    pub period: ColumnConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

fn default_true() -> bool {
    true
}
fn default_volume() -> u32 {
    50
}
fn default_minute_step() -> u32 {
    1
}
fn default_period_column() -> ColumnConfig {
    ColumnConfig {
        damping: DampingProfile::period(),
        ..ColumnConfig::default()
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            haptics: true,
            sound: true,
            volume: default_volume(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            numeric: ColumnConfig::default(),
            period: default_period_column(),
            minute_step: default_minute_step(),
            feedback: FeedbackConfig::default(),
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
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

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

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.validate().map_err(|e| load_failed(e.to_string()))?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
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

    /// Set a config value by key. The result must still build every preset.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed, or
    /// the new value makes the configuration invalid. `self` is unchanged on
    /// error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate().map_err(|e| invalid(e.to_string()))?;
        *self = updated;
        Ok(())
    }

    /// Check that every preset picker can be built from this configuration.
    pub fn validate(&self) -> Result<(), crate::error::PickerConfigError> {
        let options = self.preset_options();
        for kind in [PresetKind::BlockTime, PresetKind::Duration, PresetKind::Timer] {
            kind.build(&options)?;
        }
        Ok(())
    }

    pub fn preset_options(&self) -> PresetOptions {
        PresetOptions {
            numeric: self.numeric.clone(),
            period: self.period.clone(),
            minute_step: self.minute_step,
        }
    }

    /// Whether ticks should reach any sink at all.
    pub fn feedback_enabled(&self) -> bool {
        self.feedback.haptics || self.feedback.sound
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
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.period.damping, DampingProfile::period());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            minute_step = 5

            [numeric]
            item_extent = 30.0

            [numeric.damping]
            damping_factor = 0.9
            "#,
        )
        .unwrap();
        assert_eq!(parsed.minute_step, 5);
        assert_eq!(parsed.numeric.item_extent, 30.0);
        assert_eq!(parsed.numeric.visible_window, 5);
        assert_eq!(parsed.numeric.damping.damping_factor, 0.9);
        assert_eq!(
            parsed.numeric.damping.exit_threshold,
            DampingProfile::numeric().exit_threshold
        );
        assert_eq!(parsed.period, default_period_column());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("numeric.visible_window").as_deref(), Some("5"));
        assert_eq!(cfg.get("feedback.haptics").as_deref(), Some("true"));
        assert_eq!(cfg.get("period.damping.damping_factor").as_deref(), Some("0.8"));
        assert!(cfg.get("numeric.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("numeric.item_extent", "32.5").unwrap();
        assert_eq!(cfg.numeric.item_extent, 32.5);
        cfg.set("feedback.sound", "false").unwrap();
        assert!(!cfg.feedback.sound);
        cfg.set("minute_step", "15").unwrap();
        assert_eq!(cfg.minute_step, 15);
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_types() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("numeric.nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.set("feedback.haptics", "not_a_bool").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_values_that_break_pickers() {
        let mut cfg = Config::default();
        assert!(cfg.set("numeric.visible_window", "4").is_err());
        assert!(cfg.set("minute_step", "7").is_err());
        assert!(cfg.set("period.item_extent", "0").is_err());
        assert!(cfg.set("numeric.damping.damping_factor", "1.5").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("numeric.tick_interval_ms", "40").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[numeric]\nvisible_window = 2\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn feedback_toggle() {
        let mut cfg = Config::default();
        assert!(cfg.feedback_enabled());
        cfg.feedback.haptics = false;
        cfg.feedback.sound = false;
        assert!(!cfg.feedback_enabled());
    }
}
