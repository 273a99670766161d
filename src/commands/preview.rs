//! Live preview of unsaved markdown

use crate::Pulse;

/// Render `markdown` exactly as a saved post would be
pub fn render(pulse: &Pulse, markdown: &str) -> String {
    pulse.pipeline().render_safe(markdown)
}
