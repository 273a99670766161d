//! Key-value persistence backends
//!
//! Everything the notebook remembers between runs lives in a flat map of
//! string keys to string values. Posts and the theme preference are two
//! independent entries in that map.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;
use thiserror::Error;

/// Key holding the JSON-encoded post collection
pub const POSTS_KEY: &str = "markdownPosts";

/// Key holding the theme preference
pub const THEME_KEY: &str = "theme";

/// Storage backend errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Corrupt storage file {path:?}: {message}")]
    Corrupt { path: PathBuf, message: String },
}

/// Synchronous string-keyed storage
///
/// A `set` either fully replaces the stored value or fails and leaves the
/// previous value in place.
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}
