//! Form layer configuration
//!
//! Loaded from a JSON file; every key is optional.
//!
//! ```json
//! {
//!   "messages": "./messages/en-us.json",
//!   "error_code_prefix": "Error_Campaign_Api_",
//!   "generic_error_key": "GenericErrorMessage",
//!   "aggregate_separator": " + ",
//!   "log_level": "info"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::i18n::keys;
use crate::observability::{Event, Logger, Severity};
use crate::schema::{FormError, FormResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Message catalog (`{ "key": "template" }`); keys echo as `[KEY]` without one
    #[serde(default)]
    pub messages: Option<PathBuf>,

    /// Prefix joined with an API error `Code` to form its message key
    #[serde(default = "default_error_code_prefix")]
    pub error_code_prefix: String,

    /// Message key used when a server response has no structured errors
    #[serde(default = "default_generic_error_key")]
    pub generic_error_key: String,

    /// Joins property names in aggregate remaining-character messages
    #[serde(default = "default_aggregate_separator")]
    pub aggregate_separator: String,

    /// Minimum log severity: trace, info, warn, error, fatal
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_error_code_prefix() -> String {
    "Error_Campaign_Api_".to_string()
}
fn default_generic_error_key() -> String {
    keys::GENERIC_ERROR.to_string()
}
fn default_aggregate_separator() -> String {
    " + ".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            messages: None,
            error_code_prefix: default_error_code_prefix(),
            generic_error_key: default_generic_error_key(),
            aggregate_separator: default_aggregate_separator(),
            log_level: default_log_level(),
        }
    }
}

impl FormConfig {
    /// Load configuration from file.
    ///
    /// A relative `messages` path is resolved against the config file's directory.
    pub fn load(path: &Path) -> FormResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| FormError::Config(format!("Failed to read config: {}", e)))?;

        let mut config: FormConfig = serde_json::from_str(&content)
            .map_err(|e| FormError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        if let (Some(messages), Some(dir)) = (&config.messages, path.parent()) {
            if messages.is_relative() {
                config.messages = Some(dir.join(messages));
            }
        }

        Logger::event(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );

        Ok(config)
    }

    fn validate(&self) -> FormResult<()> {
        self.severity()?;

        if self.generic_error_key.trim().is_empty() {
            return Err(FormError::Config("generic_error_key must not be empty".into()));
        }

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> FormResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| FormError::Config(format!("Invalid log_level: {}", e)))
    }

    /// Applies the logging settings process-wide
    pub fn apply_logging(&self) -> FormResult<()> {
        Logger::set_min_severity(self.severity()?);
        Ok(())
    }
}
