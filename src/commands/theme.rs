//! Show or change the theme

use anyhow::Result;

use crate::render::highlight_css;
use crate::storage::FileStore;
use crate::theme::Theme;
use crate::Pulse;

/// Requested theme change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Toggle,
    Set(Theme),
}

/// Apply `action` (if any) and return the resulting theme
pub fn run(pulse: &Pulse, action: Option<ThemeAction>) -> Result<Theme> {
    let mut backend = FileStore::open(&pulse.data_path)?;
    let theme = match action {
        None => pulse.theme(&backend),
        Some(ThemeAction::Toggle) => Theme::toggle(&mut backend, pulse.config.default_theme)?,
        Some(ThemeAction::Set(theme)) => {
            theme.save(&mut backend)?;
            theme
        }
    };
    Ok(theme)
}

/// Highlighting stylesheet for the current theme
pub fn stylesheet(pulse: &Pulse) -> Result<String> {
    let theme = run(pulse, None)?;
    highlight_css(theme.highlight_palette())
}
