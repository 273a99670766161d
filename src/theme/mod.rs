//! Light/dark theme preference

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::storage::{KeyValueStore, StorageError, THEME_KEY};

/// Unrecognized theme name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown theme: {0} (expected light or dark)")]
pub struct UnknownTheme(pub String);

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored name
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Glyph of the toggle button, which shows the theme it switches to
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }

    /// syntect palette for highlighted code
    pub fn highlight_palette(self) -> &'static str {
        match self {
            Theme::Light => "InspiredGitHub",
            Theme::Dark => "base16-ocean.dark",
        }
    }

    /// Read the stored theme
    ///
    /// A missing, unreadable or unrecognized value yields `fallback`.
    pub fn load<S: KeyValueStore + ?Sized>(backend: &S, fallback: Theme) -> Theme {
        match backend.get(THEME_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or_else(|e: UnknownTheme| {
                tracing::warn!("{}, using {}", e, fallback);
                fallback
            }),
            Ok(None) => fallback,
            Err(e) => {
                tracing::warn!("Failed to read theme, using {}: {}", fallback, e);
                fallback
            }
        }
    }

    /// Persist this theme
    pub fn save<S: KeyValueStore + ?Sized>(self, backend: &mut S) -> Result<(), StorageError> {
        backend.set(THEME_KEY, self.as_str())?;
        tracing::info!("Theme set to {}", self);
        Ok(())
    }

    /// Switch the stored theme and return the new one
    pub fn toggle<S: KeyValueStore + ?Sized>(
        backend: &mut S,
        fallback: Theme,
    ) -> Result<Theme, StorageError> {
        let next = Self::load(&*backend, fallback).toggled();
        next.save(backend)?;
        Ok(next)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}
