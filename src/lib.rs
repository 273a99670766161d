//! markdown-pulse: a local-first markdown notebook
//!
//! Posts live in a key-value store as one JSON document, are searched and
//! filtered by tag in memory, and are rendered to sanitized HTML for
//! display. The `commands` module drives all of this from the CLI; other
//! front ends can use [`content::PostStore`], [`session::Session`] and
//! [`render::RenderPipeline`] directly.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod render;
pub mod session;
pub mod storage;
pub mod templates;
pub mod theme;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main notebook application
#[derive(Clone)]
pub struct Pulse {
    /// Notebook configuration
    pub config: config::AppConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Key-value storage file
    pub data_path: PathBuf,
}

impl Pulse {
    /// Create a notebook rooted at a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::AppConfig::load_or_default(&base_dir)?;
        let data_path = base_dir.join(&config.data_file);

        Ok(Self {
            config,
            base_dir,
            data_path,
        })
    }

    /// Open the post store over the storage file
    ///
    /// Unreadable data opens as an empty notebook; the warning is logged
    /// where the problem is found.
    pub fn open_store(&self) -> Result<content::PostStore<storage::FileStore>> {
        let backend = storage::FileStore::open_lenient(&self.data_path)?;
        Ok(content::PostStore::open(backend))
    }

    /// Render pipeline configured for this notebook
    pub fn pipeline(&self) -> render::RenderPipeline {
        render::RenderPipeline::with_highlight(&self.config.highlight)
    }

    /// Current theme
    pub fn theme<S: storage::KeyValueStore + ?Sized>(&self, backend: &S) -> theme::Theme {
        theme::Theme::load(backend, self.config.default_theme)
    }
}
