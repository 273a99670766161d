//! CLI commands
//!
//! Each command opens the store, drives a [`Session`](crate::session::Session)
//! through one user action and returns what should be shown.

pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod new;
pub mod preview;
pub mod show;
pub mod theme;

use anyhow::Result;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Read markdown from an inline value, a file, or stdin when the file is `-`
pub fn read_content(inline: Option<String>, file: Option<&Path>) -> Result<Option<String>> {
    match (inline, file) {
        (Some(_), Some(_)) => anyhow::bail!("Use either --content or --file, not both"),
        (Some(text), None) => Ok(Some(text)),
        (None, Some(path)) if path == Path::new("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(Some(text))
        }
        (None, Some(path)) => Ok(Some(fs::read_to_string(path)?)),
        (None, None) => Ok(None),
    }
}
