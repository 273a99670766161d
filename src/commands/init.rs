//! Initialize a new notebook

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Markdown Pulse configuration

# Title used for exported pages
title: Markdown Pulse

# Where posts and settings are stored, relative to this file
data_file: .pulse/storage.json

# Date format for listings (Moment.js style)
date_format: YYYY-MM-DD

# Characters of plain text shown under each listed post
excerpt_length: 120

# Theme used until one is chosen: light or dark
default_theme: light

highlight:
  enable: true
  line_number: false
"#;

/// Initialize a notebook in the given directory
pub fn init_notebook(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("Notebook already initialized: {:?}", config_path);
    }
    fs::write(&config_path, DEFAULT_CONFIG)?;
    tracing::info!("Created {:?}", config_path);

    Ok(())
}
