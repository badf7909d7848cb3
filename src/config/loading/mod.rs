mod file_creation;

use super::{Config, ConfigPaths};
use crate::{MiniplayError, Result};
use file_creation::create_default_config_file;
use std::{fs, path::Path};
use toml::Value;
use tracing::{debug, instrument};

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or the
    /// file cannot be created, read, or validated.
    pub fn load() -> Result<Config> {
        let path = ConfigPaths::main_config()?;
        Self::load_from(&path)
    }

    /// Loads a configuration file, creating a commented default if missing.
    ///
    /// Every field has a default, so an empty file yields `Config::default()`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file cannot be created or read
    /// - The TOML content is invalid
    /// - A value fails validation
    #[instrument]
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!("Creating default config at {}", path.display());
            create_default_config_file(path)?;
        }

        let content = fs::read_to_string(path).map_err(|e| MiniplayError::IoError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| MiniplayError::toml_parse(e, Some(path)))?;
        config.validate()?;

        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a value fails validation.
    pub fn from_toml_str(content: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| MiniplayError::toml_parse(e, None))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| MiniplayError::Config(e.to_string()))
    }

    /// Looks up a value by dotted path, e.g. `sync.drift_epsilon`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` if any path segment does not exist.
    pub fn value_at(&self, path: &str) -> Result<Value> {
        let root = Value::try_from(self).map_err(|e| MiniplayError::Config(e.to_string()))?;

        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(root, |value, segment| {
                value
                    .as_table()
                    .and_then(|table| table.get(segment))
                    .cloned()
                    .ok_or_else(|| MiniplayError::ConfigValidation {
                        component: path.to_string(),
                        details: format!("no such key '{segment}'"),
                    })
            })
    }

    /// JSON schema describing every configuration section.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Config)).unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        if self.sync.interval_ms == 0 {
            return Err(MiniplayError::ConfigValidation {
                component: "sync".to_string(),
                details: "interval_ms must be greater than zero".to_string(),
            });
        }

        if !self.sync.drift_epsilon.is_finite() || self.sync.drift_epsilon < 0.0 {
            return Err(MiniplayError::ConfigValidation {
                component: "sync".to_string(),
                details: format!(
                    "drift_epsilon must be a non-negative number, got {}",
                    self.sync.drift_epsilon
                ),
            });
        }

        if self.miniplayer.min_width == 0 {
            return Err(MiniplayError::ConfigValidation {
                component: "miniplayer".to_string(),
                details: "min_width must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
