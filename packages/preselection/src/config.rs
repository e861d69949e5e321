//! Pre-selection settings, loaded from TOML.
//!
//! ```toml
//! sample_limit = 50
//! ```

use std::path::Path;

use serde::Deserialize;

/// Default cap on the email samples carried by a report.
pub const DEFAULT_SAMPLE_LIMIT: usize = 200;

/// Errors loading a [`PreselectionConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this config.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for processing a pre-selection document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreselectionConfig {
    /// Maximum number of extracted and unmatched emails listed in a
    /// report. Counts are never capped.
    pub sample_limit: usize,
}

impl Default for PreselectionConfig {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }
}

impl PreselectionConfig {
    /// Parses a config from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML or
    /// holds unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not a valid config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded pre-selection config from {}: {config:?}", path.display());
        Ok(config)
    }
}
