//! TOML-based deployment configuration.
//!
//! Holds the transport credentials and delivery settings:
//!
//! ```toml
//! [transport]
//! service_id = "service_abc"
//! template_id = "template_xyz"
//! public_key = "pk_123"
//! webhook_url = "https://hooks.example.com/intake"
//! destination = "owner@example.com"
//!
//! [delivery]
//! timeout_secs = 15
//! subject = "New intake questionnaire"
//! allow_restart = true
//! ```
//!
//! Every transport value can be overridden from the environment, see
//! [`IntakeConfig::with_env_overrides`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::locale;
use crate::transport::{DEFAULT_TIMEOUT, TransportConfig};

/// Environment variables and the transport value each one overrides.
pub const ENV_SERVICE_ID: &str = "INTAKE_EMAIL_SERVICE_ID";
pub const ENV_TEMPLATE_ID: &str = "INTAKE_EMAIL_TEMPLATE_ID";
pub const ENV_PUBLIC_KEY: &str = "INTAKE_EMAIL_PUBLIC_KEY";
pub const ENV_WEBHOOK_URL: &str = "INTAKE_WEBHOOK_URL";
pub const ENV_DESTINATION: &str = "INTAKE_DESTINATION_EMAIL";

/// Error loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Delivery timeout must be at least one second")]
    ZeroTimeout,
}

/// How submissions are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeliverySettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_true")]
    pub allow_restart: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_subject() -> String {
    locale::DEFAULT_SUBJECT.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            subject: default_subject(),
            allow_restart: default_true(),
        }
    }
}

impl DeliverySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntakeConfig {
    pub transport: TransportConfig,
    pub delivery: DeliverySettings,
}

impl IntakeConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        if config.delivery.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(config)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load the file when given, else start from defaults; then apply the
    /// process environment.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Replace transport values with the ones `lookup` finds.
    ///
    /// Blank variables are ignored, so an exported but empty variable
    /// does not erase a value from the file.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let transport = &mut self.transport;
        let slots = [
            (ENV_SERVICE_ID, &mut transport.service_id),
            (ENV_TEMPLATE_ID, &mut transport.template_id),
            (ENV_PUBLIC_KEY, &mut transport.public_key),
            (ENV_WEBHOOK_URL, &mut transport.webhook_url),
            (ENV_DESTINATION, &mut transport.destination),
        ];
        for (name, slot) in slots {
            if let Some(value) = lookup(name)
                && !value.trim().is_empty()
            {
                tracing::debug!(variable = name, "transport value taken from environment");
                *slot = Some(value);
            }
        }
        self
    }
}
