//! Render pipeline - markdown to display-safe HTML
//!
//! Markdown is always expanded first and sanitized second. Sanitizing the
//! source would let constructs produced by the expansion slip through.

mod markdown;
mod sanitize;

pub use markdown::{highlight_css, MarkdownRenderer};
pub use sanitize::HtmlSanitizer;

use crate::config::HighlightConfig;
use crate::helpers::{decode_entities, strip_html, truncate};

/// Markdown expansion followed by sanitizing
pub struct RenderPipeline {
    markdown: MarkdownRenderer,
    sanitizer: HtmlSanitizer,
}

impl RenderPipeline {
    /// Pipeline with default highlighting
    pub fn new() -> Self {
        Self::with_highlight(&HighlightConfig::default())
    }

    /// Pipeline honoring the highlight settings
    pub fn with_highlight(config: &HighlightConfig) -> Self {
        Self {
            markdown: MarkdownRenderer::with_options(config.enable, config.line_number),
            sanitizer: HtmlSanitizer::new(),
        }
    }

    /// Render markdown to HTML that is safe to insert into a page
    ///
    /// Used for saved posts and live previews alike.
    pub fn render_safe(&self, markdown: &str) -> String {
        let html = self.markdown.render(markdown);
        self.sanitizer.clean(&html)
    }

    /// Plain-text summary of a markdown document, at most `length` characters
    pub fn excerpt(&self, markdown: &str, length: usize) -> String {
        let text = decode_entities(&strip_html(&self.render_safe(markdown)));
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        truncate(&text, length, None)
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}
