//! TOML-based scheduling configuration.
//!
//! Holds the fixed UTC offset, the daily window table and card limits.
//! Stored at `~/.config/studyplan/config.toml`; every field has a default so
//! a partial file loads.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::card::DEFAULT_MAX_TITLE_LENGTH;
use crate::error::ConfigError;
use crate::reschedule::Rescheduler;
use crate::slot::SlotEnforcer;
use crate::window::{WindowPolicyTable, WindowResolver};

/// Offset of `-03:00`, the wire format's fixed zone.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = -180;

/// Card payload limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardsConfig {
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,
}

/// Scheduling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub window: WindowPolicyTable,
    #[serde(default)]
    pub cards: CardsConfig,
}

fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}
fn default_max_title_length() -> usize {
    DEFAULT_MAX_TITLE_LENGTH
}

/// Offset built from [`DEFAULT_UTC_OFFSET_MINUTES`].
pub(crate) fn default_offset() -> FixedOffset {
    offset_from_minutes(DEFAULT_UTC_OFFSET_MINUTES).unwrap_or_else(|| Utc.fix())
}

/// `None` when `minutes` is a day or more, or overflows as seconds.
fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

impl Default for CardsConfig {
    fn default() -> Self {
        Self {
            max_title_length: default_max_title_length(),
        }
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            window: WindowPolicyTable::default(),
            cards: CardsConfig::default(),
        }
    }
}

/// Returns `~/.config/studyplan[-dev]/` based on STUDYPLAN_ENV.
///
/// Set STUDYPLAN_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYPLAN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("studyplan-dev")
    } else {
        base_dir.join("studyplan")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DirUnavailable(e.to_string()))?;
    Ok(dir)
}

impl SchedulingConfig {
    /// Default config file location.
    ///
    /// # Errors
    /// Returns an error if the config directory is unavailable.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// validated, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            tracing::debug!(path = %path.display(), "wrote default configuration");
            Ok(cfg)
        }
    }

    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LoadFailed`] if the file cannot be read or
    /// parsed, or [`ConfigError::InvalidValue`] if a value is out of range.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: SchedulingConfig = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(cfg)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Check offsets, window hours and exception days.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.offset()?;
        self.window.validate()?;
        if self.cards.max_title_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "cards.max_title_length".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The configured fixed offset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the offset is a day or more.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        offset_from_minutes(self.utc_offset_minutes).ok_or_else(|| {
            ConfigError::InvalidValue {
                key: "utc_offset_minutes".to_string(),
                message: format!("{} is not a valid UTC offset", self.utc_offset_minutes),
            }
        })
    }

    pub fn resolver(&self) -> WindowResolver {
        WindowResolver::new(self.window.clone())
    }

    pub fn enforcer(&self) -> SlotEnforcer {
        SlotEnforcer::new(self.resolver())
    }

    /// Build a rescheduler from this config.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured offset is invalid.
    pub fn rescheduler(&self) -> Result<Rescheduler, ConfigError> {
        Ok(Rescheduler::new(self.enforcer(), self.offset()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowPolicy;

    #[test]
    fn default_config_roundtrip() {
        let cfg = SchedulingConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SchedulingConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn default_offset_is_minus_three_hours() {
        let offset = SchedulingConfig::default().offset().unwrap();
        assert_eq!(offset.local_minus_utc(), -3 * 3600);
        assert_eq!(default_offset(), offset);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: SchedulingConfig = toml::from_str(
            r#"
            [window.default]
            start_hour = 18.0
            end_hour = 20.0
            "#,
        )
        .unwrap();
        assert_eq!(parsed.window.default, WindowPolicy::new(18.0, 20.0));
        assert_eq!(parsed.utc_offset_minutes, -180);
        assert_eq!(parsed.window.weekday_overrides.len(), 1);
        assert_eq!(parsed.window.exceptions.len(), 2);
        assert_eq!(parsed.cards.max_title_length, 2000);
    }

    #[test]
    fn weekday_overrides_parse_from_names() {
        let parsed: SchedulingConfig = toml::from_str(
            r#"
            [[window.weekday_overrides]]
            weekday = "Thu"
            start_hour = 20.0
            end_hour = 21.0
            "#,
        )
        .unwrap();
        assert_eq!(parsed.window.weekday_overrides[0].weekday, chrono::Weekday::Thu);
        assert_eq!(parsed.window.weekday_overrides[0].policy.start_hour, 20.0);
    }

    #[test]
    fn load_from_and_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = SchedulingConfig::default();
        cfg.cards.max_title_length = 120;
        cfg.save_to(&path).unwrap();

        let loaded = SchedulingConfig::load_from(&path).unwrap();
        assert_eq!(loaded.cards.max_title_length, 120);
    }

    #[test]
    fn load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        for value in ["5000", "40000000", "-2147483648"] {
            std::fs::write(&path, format!("utc_offset_minutes = {value}\n")).unwrap();
            let err = SchedulingConfig::load_from(&path).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "utc_offset_minutes"),
                "{value}: {err:?}"
            );
        }
    }

    #[test]
    fn default_title_limit_matches_card_default() {
        assert_eq!(
            SchedulingConfig::default().cards.max_title_length,
            DEFAULT_MAX_TITLE_LENGTH
        );
    }

    #[test]
    fn load_from_reports_parse_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "window = 3\n").unwrap();
        assert!(matches!(
            SchedulingConfig::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
