use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

pub const CURRENT_CONFIG_VERSION: &str = "v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessControlMode {
    #[default]
    Disabled,
    Password,
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct AccessControlConfig {
    pub mode: AccessControlMode,
    pub password: Option<String>,
}

impl Default for AccessControlConfig {
    fn default() -> Self {
        Self {
            mode: AccessControlMode::Disabled,
            password: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Config {
    #[serde(alias = "configVersion")]
    pub config_version: String,
    #[serde(alias = "accessControl")]
    pub access_control: AccessControlConfig,
}

impl Config {
    pub fn from_raw(raw_config: &str) -> Self {
        match serde_json::from_str::<Config>(raw_config) {
            Ok(config) => config.normalized(),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse config (line {}, column {}): {}, using default",
                    e.line(),
                    e.column(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn normalized(mut self) -> Self {
        self.config_version = CURRENT_CONFIG_VERSION.to_string();

        if matches!(
            self.access_control.password.as_deref(),
            Some(password) if password.trim().is_empty()
        ) {
            self.access_control.password = None;
        }

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: CURRENT_CONFIG_VERSION.to_string(),
            access_control: AccessControlConfig::default(),
        }
    }
}

/// Will always return config, falling back to defaults on missing/invalid files.
pub async fn load_config_from_file(config_path: &PathBuf) -> Config {
    match std::fs::read_to_string(config_path) {
        Ok(raw_config) => Config::from_raw(&raw_config),
        Err(err) => {
            if err.kind() == std::io::ErrorKind::NotFound {
                tracing::info!("No config file found, creating one");
            } else {
                tracing::warn!("Failed to read config file: {}", err);
            }
            Config::default()
        }
    }
}

/// Saves the config to the given path
pub async fn save_config_to_file(
    config: &Config,
    config_path: &PathBuf,
) -> Result<(), ConfigError> {
    let normalized = config.clone().normalized();
    let raw_config = serde_json::to_string_pretty(&normalized)?;
    std::fs::write(config_path, raw_config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_empty_config() {
        let config = Config::from_raw("{}");
        assert_eq!(config.config_version, CURRENT_CONFIG_VERSION);
        assert_eq!(config.access_control.mode, AccessControlMode::Disabled);
        assert!(config.access_control.password.is_none());
    }

    #[test]
    fn invalid_json_falls_back_to_default() {
        let config = Config::from_raw("{invalid json");
        assert_eq!(config.access_control.mode, AccessControlMode::Disabled);
    }

    #[test]
    fn empty_password_is_normalized_away() {
        let raw = r#"{"access_control": {"mode": "PASSWORD", "password": "  "}}"#;
        let config = Config::from_raw(raw);
        assert_eq!(config.access_control.mode, AccessControlMode::Password);
        assert!(config.access_control.password.is_none());
    }

    #[test]
    fn camel_case_aliases_are_accepted() {
        let raw = r#"{"accessControl": {"mode": "PASSWORD", "password": "hunter2"}}"#;
        let config = Config::from_raw(raw);
        assert_eq!(config.access_control.mode, AccessControlMode::Password);
        assert_eq!(config.access_control.password.as_deref(), Some("hunter2"));
    }
}
