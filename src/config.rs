// Application configuration
// Model location, notification endpoint and alert tuning, read from a JSON file

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::classifier::remote::parse_base_url;
use crate::classifier::ListenOptions;
use crate::detection::AlertPolicy;
use crate::notify::{Coordinates, HttpTransport};

pub const DEFAULT_MODEL_BASE_URL: &str =
    "https://teachablemachine.withgoogle.com/models/_QnYngEJh/";
pub const DEFAULT_NOTIFICATION_ENDPOINT: &str = "http://localhost:8000/send-notification";

/// Environment variable overriding the model base location
pub const MODEL_URL_ENV: &str = "SOUNDGUARD_MODEL_URL";

const APP_DIR: &str = "com.soundguard.app";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to get config directory")]
    NoConfigDir,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding `model.json` and `metadata.json`
    pub model_base_url: String,

    /// Endpoint receiving push-notification requests
    pub notification_endpoint: String,

    pub alert_policy: AlertPolicy,

    pub listen_options: ListenOptions,

    /// Position reported with notifications when the host provides none
    pub fixed_location: Option<Coordinates>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            model_base_url: DEFAULT_MODEL_BASE_URL.to_string(),
            notification_endpoint: DEFAULT_NOTIFICATION_ENDPOINT.to_string(),
            alert_policy: AlertPolicy::default(),
            listen_options: ListenOptions::default(),
            fixed_location: None,
        }
    }
}

/// Path of the config file in the user's config directory
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
}

impl AppConfig {
    /// Parse a config file; every field is optional
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Like `from_file`, falling back to defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match Self::from_file(path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Load from the user config directory, apply environment overrides, validate
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::load_from(&config_path()?)?
            .with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(MODEL_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.model_base_url = url;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.alert_policy.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "alert threshold {} outside [0, 1]",
                threshold
            )));
        }
        if self.alert_policy.alert_labels.is_empty() {
            return Err(ConfigError::Invalid("alert label set is empty".to_string()));
        }
        if let Some(location) = self.fixed_location {
            if !location.is_valid() {
                return Err(ConfigError::Invalid(format!(
                    "fixed location {:?} out of range",
                    location
                )));
            }
        }

        parse_base_url(&self.model_base_url).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        HttpTransport::new(&self.notification_endpoint)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.listen_options
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model_base_url, DEFAULT_MODEL_BASE_URL);
        assert_eq!(config.notification_endpoint, DEFAULT_NOTIFICATION_ENDPOINT);
        assert_eq!(config.alert_policy.threshold, 0.75);
        assert_eq!(config.listen_options.overlap_factor, 0.5);
        assert!(config.fixed_location.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "notification_endpoint": "https://alerts.example.com/notify",
                "alert_policy": { "threshold": 0.9 },
                "fixed_location": { "latitude": 52.52, "longitude": 13.405 }
            }"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.notification_endpoint, "https://alerts.example.com/notify");
        assert_eq!(config.alert_policy.threshold, 0.9);
        assert_eq!(config.alert_policy.alert_labels.len(), 3);
        assert_eq!(config.model_base_url, DEFAULT_MODEL_BASE_URL);
        assert_eq!(
            config.fixed_location,
            Some(Coordinates::new(52.52, 13.405))
        );
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_model_url_override() {
        let env: HashMap<&str, &str> =
            [(MODEL_URL_ENV, "https://models.example.com/sirens/")].into();
        let config = AppConfig::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.model_base_url, "https://models.example.com/sirens/");

        let blank = AppConfig::default().with_overrides(|_| Some("  ".to_string()));
        assert_eq!(blank.model_base_url, DEFAULT_MODEL_BASE_URL);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.alert_policy.threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.alert_policy.alert_labels.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.notification_endpoint = "nowhere".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.fixed_location = Some(Coordinates::new(120.0, 0.0));
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.listen_options.include_spectrogram = false;
        assert!(config.validate().is_err());
    }
}
