//! Configuration handling
//!
//! Configuration is read from `mdquote.toml` in the scanned root directory, or
//! from an explicit `--config` file. Every field is optional.
//!
//! ```toml
//! extensions = ["md", "markdown"]
//! ignore = ["node_modules", "target", "vendor"]
//! include_hidden = false
//! follow_links = false
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up in the scanned root
pub const CONFIG_FILE_NAME: &str = "mdquote.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Discovery and processing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File extensions treated as documents (case-insensitive, without the dot)
    pub extensions: Vec<String>,

    /// Directory names skipped during discovery
    pub ignore: Vec<String>,

    /// Walk into directories whose name starts with `.`
    pub include_hidden: bool,

    /// Follow symbolic links during discovery
    pub follow_links: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string()],
            ignore: vec![
                "node_modules".to_string(),
                "target".to_string(),
                ".git".to_string(),
            ],
            include_hidden: false,
            follow_links: false,
        }
    }
}

impl Config {
    /// Loads `mdquote.toml` from a scan root, falling back to defaults
    ///
    /// A root that is a file (a single document) has no config of its own.
    pub fn load(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Ok(Self::default());
        }

        let config_path = root.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::from_file(&config_path)
    }

    /// Loads configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(ConfigError::Invalid("extensions must not be empty".to_string()).into());
        }
        if let Some(ext) = self.extensions.iter().find(|e| e.is_empty() || e.starts_with('.')) {
            return Err(ConfigError::Invalid(format!(
                "extension '{}' must be non-empty and written without a leading dot",
                ext
            ))
            .into());
        }
        Ok(())
    }

    /// Returns true if the path has one of the configured document extensions
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}
