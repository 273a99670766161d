//! File-backed storage
//!
//! All entries live in a single JSON object on disk. Every write rewrites
//! the whole file through a temporary sibling and a rename, so a crash or a
//! full disk never leaves a half-written file behind.

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

/// Key-value store persisted to a JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: IndexMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, reading existing entries if the file exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                IndexMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
        } else {
            IndexMap::new()
        };

        tracing::debug!("Opened storage {:?} ({} entries)", path, entries.len());
        Ok(Self { path, entries })
    }

    /// Open the store at `path`, starting empty if the file cannot be parsed
    ///
    /// The unreadable file is left on disk until the next successful write
    /// replaces it.
    pub fn open_lenient<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        match Self::open(path) {
            Err(StorageError::Corrupt { path, message }) => {
                tracing::warn!(
                    "Storage file {:?} is unreadable, starting empty: {}",
                    path,
                    message
                );
                Ok(Self {
                    path,
                    entries: IndexMap::new(),
                })
            }
            other => other,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &IndexMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(entries).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        self.entries = next;
        tracing::debug!("Wrote {} ({} bytes) to {:?}", key, value.len(), self.path);
        Ok(())
    }
}
