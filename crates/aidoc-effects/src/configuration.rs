//! Client configuration
//!
//! Layering: built-in defaults, then an optional TOML file, then environment
//! variables. [`AidocConfig::validate`] runs last.
//!
//! ```toml
//! data_dir = "./.aidoc"
//! log_level = "info"
//!
//! [inference]
//! endpoint = "https://generativelanguage.googleapis.com/v1beta"
//! diagnosis_model = "gemini-2.5-flash-lite"
//!
//! [trip]
//! dwell_ms = 3000
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable holding the inference key (highest precedence).
pub const ENV_API_KEY: &str = "API_KEY";
/// Alternate environment variable for the inference key.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Environment override for [`AidocConfig::data_dir`].
pub const ENV_DATA_DIR: &str = "AIDOC_DATA_DIR";
/// Environment override for [`AidocConfig::log_level`].
pub const ENV_LOG: &str = "AIDOC_LOG";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {reason}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying error
        reason: String,
    },
    /// Config file is not valid TOML for [`AidocConfig`]
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// A field failed validation
    #[error("Invalid {field}: {reason}")]
    Invalid {
        /// Dotted field path
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AidocConfig {
    /// Directory backing the key-value store
    pub data_dir: PathBuf,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Remote model settings
    pub inference: InferenceConfig,
    /// Trip animation timing
    pub trip: TripConfig,
}

impl Default for AidocConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./.aidoc"),
            log_level: "info".to_string(),
            inference: InferenceConfig::default(),
            trip: TripConfig::default(),
        }
    }
}

/// Remote model settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL of a `generateContent`-compatible API
    pub endpoint: String,
    /// Inference key. When absent the stored override is consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model used for symptom diagnosis
    pub diagnosis_model: String,
    /// Model used for meal analysis
    pub nutrition_model: String,
    /// Model used for medicine recommendations
    pub medicine_model: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            diagnosis_model: "gemini-2.5-flash-lite".to_string(),
            nutrition_model: "gemini-2.5-flash".to_string(),
            medicine_model: "gemini-2.5-flash".to_string(),
        }
    }
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("diagnosis_model", &self.diagnosis_model)
            .field("nutrition_model", &self.nutrition_model)
            .field("medicine_model", &self.medicine_model)
            .finish()
    }
}

/// Trip animation timing, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripConfig {
    /// Time spent searching for a driver
    pub dwell_ms: u64,
    /// Travel time from origin to destination
    pub duration_ms: u64,
    /// Animation frame interval
    pub frame_ms: u64,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            dwell_ms: 3_000,
            duration_ms: 15_000,
            frame_ms: 16,
        }
    }
}

impl AidocConfig {
    /// Defaults, then `path` if given, then the process environment; validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing fields take their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from the process environment.
    pub fn merge_with_env(&mut self) {
        self.merge_with_vars(std::env::vars());
    }

    /// Apply overrides from `vars`. Empty values are ignored. `API_KEY` wins
    /// over `GEMINI_API_KEY` regardless of order.
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut primary_key = None;
        let mut secondary_key = None;
        for (name, value) in vars {
            let value: String = value.into();
            if value.is_empty() {
                continue;
            }
            match name.as_ref() {
                ENV_API_KEY => primary_key = Some(value),
                ENV_GEMINI_API_KEY => secondary_key = Some(value),
                ENV_DATA_DIR => self.data_dir = PathBuf::from(value),
                ENV_LOG => self.log_level = value,
                _ => {}
            }
        }
        if let Some(key) = primary_key.or(secondary_key) {
            self.inference.api_key = Some(key);
        }
    }

    /// Check field values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(invalid("data_dir", "must not be empty"));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(invalid(
                "log_level",
                format!("'{}' is not one of {}", self.log_level, LOG_LEVELS.join(", ")),
            ));
        }

        let inference = &self.inference;
        if inference.endpoint.trim().is_empty() {
            return Err(invalid("inference.endpoint", "must not be empty"));
        }
        for (field, model) in [
            ("inference.diagnosis_model", &inference.diagnosis_model),
            ("inference.nutrition_model", &inference.nutrition_model),
            ("inference.medicine_model", &inference.medicine_model),
        ] {
            if model.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        if self.trip.duration_ms == 0 {
            return Err(invalid("trip.duration_ms", "must be greater than zero"));
        }
        if self.trip.frame_ms == 0 {
            return Err(invalid("trip.frame_ms", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = AidocConfig::default();
        config.validate().unwrap();
        assert_eq!(config.trip.dwell_ms, 3_000);
        assert_eq!(config.inference.diagnosis_model, "gemini-2.5-flash-lite");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AidocConfig::from_toml_str(
            r#"
            log_level = "debug"

            [trip]
            duration_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.trip.duration_ms, 500);
        assert_eq!(config.trip.dwell_ms, 3_000);
        assert_eq!(config.inference.medicine_model, "gemini-2.5-flash");
    }

    #[test]
    fn api_key_env_precedence() {
        let mut config = AidocConfig::default();
        config.merge_with_vars([(ENV_API_KEY, "primary"), (ENV_GEMINI_API_KEY, "secondary")]);
        assert_eq!(config.inference.api_key.as_deref(), Some("primary"));

        let mut config = AidocConfig::default();
        config.merge_with_vars([(ENV_GEMINI_API_KEY, "secondary"), (ENV_API_KEY, "")]);
        assert_eq!(config.inference.api_key.as_deref(), Some("secondary"));
    }

    #[test]
    fn env_overrides_paths_and_level() {
        let mut config = AidocConfig::default();
        config.merge_with_vars([(ENV_DATA_DIR, "/tmp/aidoc"), (ENV_LOG, "warn")]);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/aidoc"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AidocConfig::default();
        config.log_level = "loud".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "log_level", .. })
        ));

        let mut config = AidocConfig::default();
        config.trip.frame_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AidocConfig::default();
        config.inference.nutrition_model = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "inference.nutrition_model",
                ..
            })
        ));
    }

    #[test]
    fn debug_output_redacts_key() {
        let mut config = AidocConfig::default();
        config.inference.api_key = Some("sk-secret".to_string());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aidoc.toml");
        std::fs::write(&path, "data_dir = \"custom\"\n").unwrap();
        let config = AidocConfig::load_from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("custom"));

        let missing = AidocConfig::load_from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
