//! Render a stored post

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::render::highlight_css;
use crate::templates::{post_article, post_page};
use crate::Pulse;

/// Sanitized article markup for the post with `id`
pub fn render_post(pulse: &Pulse, id: i64) -> Result<String> {
    let store = pulse.open_store()?;
    let Some(post) = store.find(id) else {
        anyhow::bail!("No post with id {}", id);
    };

    let body = pulse.pipeline().render_safe(&post.content);
    Ok(post_article(post, &body, &pulse.config.date_format))
}

/// Write the post with `id` as a standalone page
pub fn write_page(pulse: &Pulse, id: i64, output: &Path) -> Result<()> {
    let store = pulse.open_store()?;
    let Some(post) = store.find(id) else {
        anyhow::bail!("No post with id {}", id);
    };

    let theme = pulse.theme(store.backend());
    let css = if pulse.config.highlight.enable {
        highlight_css(theme.highlight_palette())?
    } else {
        String::new()
    };
    let body = pulse.pipeline().render_safe(&post.content);
    let page = post_page(&pulse.config, theme, post, &body, &css);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, page)?;
    tracing::info!("Wrote {:?}", output);
    Ok(())
}
