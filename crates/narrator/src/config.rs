//! Configuration loading for the narrator.
//!
//! Narrator settings are loaded from a TOML configuration file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use thiserror::Error;

/// Complete narrator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    /// Upper bound for one external phrase-render call
    pub render_timeout_ms: u64,
    /// Last-resort line when every other tier fails
    pub fixed_line: String,
    /// Optional TOML file overriding the built-in templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_path: Option<String>,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            render_timeout_ms: 2500,
            fixed_line: "...I need a minute to think about that.".to_string(),
            templates_path: None,
        }
    }
}

impl NarratorConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NarratorConfig::default();
        assert_eq!(config.render_timeout_ms, 2500);
        assert!(!config.fixed_line.is_empty());
        assert!(config.templates_path.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = NarratorConfig::from_str("render_timeout_ms = 400").unwrap();
        assert_eq!(config.render_timeout_ms, 400);
        assert_eq!(config.fixed_line, NarratorConfig::default().fixed_line);
    }

    #[test]
    fn test_config_to_toml_parses_back() {
        let config = NarratorConfig::default();
        let toml = config.to_toml().unwrap();
        assert_eq!(NarratorConfig::from_str(&toml).unwrap(), config);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("narrator.toml");
        std::fs::write(&path, "fixed_line = \"Hm.\"\n").unwrap();
        let config = NarratorConfig::from_file(&path).unwrap();
        assert_eq!(config.fixed_line, "Hm.");
    }
}
