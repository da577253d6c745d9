//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use transit_routes::DEFAULT_SCHEME;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheme the external deep links are registered under
    pub deep_link_scheme: String,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Deep link or in-app path opened right after start
    pub start_uri: Option<String>,
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;

        tracing::debug!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let scheme = &self.deep_link_scheme;
        let valid = scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

        if !valid {
            return Err(CoreError::Config(format!(
                "Invalid deep link scheme: {:?}",
                scheme
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deep_link_scheme: DEFAULT_SCHEME.to_string(),
            log_filter: "info".to_string(),
            start_uri: None,
        }
    }
}
