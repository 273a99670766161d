//! Notebook configuration (pulse.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::helpers::is_valid_date_format;
use crate::theme::Theme;

/// Name of the configuration file in the base directory
pub const CONFIG_FILE: &str = "pulse.yml";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Title of exported pages
    pub title: String,

    /// Key-value storage file, relative to the base directory
    pub data_file: String,

    /// Date format for listings (Moment.js style)
    pub date_format: String,

    /// Length of list excerpts, in characters
    pub excerpt_length: usize,

    /// Theme used until one is chosen
    pub default_theme: Theme,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Markdown Pulse".to_string(),
            data_file: ".pulse/storage.json".to_string(),
            date_format: "YYYY-MM-DD".to_string(),
            excerpt_length: 120,
            default_theme: Theme::Light,
            highlight: HighlightConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail once something is rendered
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            is_valid_date_format(&self.date_format),
            "Invalid date_format in {}: {:?}",
            CONFIG_FILE,
            self.date_format
        );
        Ok(())
    }

    /// Load `pulse.yml` from `base_dir`, falling back to defaults
    pub fn load_or_default<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            line_number: false,
        }
    }
}
