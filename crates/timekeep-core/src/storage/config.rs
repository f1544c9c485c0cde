//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - The timezone offset entries are displayed and cached in
//! - The default billable flag for new entries
//!
//! Configuration is stored at `~/.config/timekeep/config.toml`.

use chrono::{FixedOffset, Local, Offset};
use serde::{Deserialize, Serialize};

use super::config_path;
use crate::error::ConfigError;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timekeep/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// UTC offset applied to cached timestamps, e.g. `"+02:00"`,
    /// or `"local"` to follow the system timezone.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Billable flag applied to new entries when not given explicitly.
    #[serde(default)]
    pub default_billable: bool,
}

fn default_timezone() -> String {
    "local".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            default_billable: false,
        }
    }
}

impl Config {
    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
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
        let path = config_path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// The configured timezone as a fixed UTC offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the `timezone` value is neither `"local"` nor an
    /// offset of the form `+HH:MM` / `-HH:MM`.
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        if self.timezone == "local" {
            return Ok(Local::now().offset().fix());
        }
        parse_offset(&self.timezone).ok_or_else(|| ConfigError::InvalidValue {
            key: "timezone".into(),
            message: format!(
                "'{}' is not 'local' or a UTC offset like '+02:00'",
                self.timezone
            ),
        })
    }

    /// Get a config value as string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "timezone" => Some(self.timezone.clone()),
            "default_billable" => Some(self.default_billable.to_string()),
            _ => None,
        }
    }

    /// Set a config value by key and persist. Returns error if the key is
    /// unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "timezone" => {
                if value != "local" && parse_offset(value).is_none() {
                    return Err(ConfigError::InvalidValue {
                        key: key.into(),
                        message: format!("'{value}' is not 'local' or a UTC offset like '+02:00'"),
                    });
                }
                self.timezone = value.to_string();
            }
            "default_billable" => {
                self.default_billable =
                    value.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
                        key: key.into(),
                        message: format!("'{value}' is not a bool"),
                    })?;
            }
            _ => return Err(ConfigError::MissingKey(key.into())),
        }
        self.save()
    }
}

fn parse_offset(value: &str) -> Option<FixedOffset> {
    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
