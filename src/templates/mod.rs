//! HTML views for a single post
//!
//! Bodies passed in here must already come out of
//! [`RenderPipeline::render_safe`](crate::render::RenderPipeline::render_safe).
//! Everything else (title, tags, dates) is escaped on the way in.

use crate::config::AppConfig;
use crate::content::Post;
use crate::helpers::{html_escape, time_tag};
use crate::theme::Theme;

/// Article markup for a post: title, meta line and body
pub fn post_article(post: &Post, safe_body: &str, date_format: &str) -> String {
    let tags = if post.tags.is_empty() {
        String::new()
    } else {
        let list = post
            .tags
            .iter()
            .map(|t| format!(r#"<span class="tag">{}</span>"#, html_escape(t)))
            .collect::<Vec<_>>()
            .join(" ");
        format!(r#"<span class="post-tags">{}</span>"#, list)
    };

    format!(
        r#"<article class="post" data-id="{id}">
<h1>{title}</h1>
<div class="post-meta"><span class="post-date">{date}</span>{tags}</div>
<div class="post-content">{body}</div>
</article>"#,
        id = post.id,
        title = html_escape(&post.title),
        date = time_tag(&post.created_at, Some(date_format)),
        tags = tags,
        body = safe_body,
    )
}

/// Standalone HTML document for a post
pub fn post_page(config: &AppConfig, theme: Theme, post: &Post, safe_body: &str, css: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en" data-theme="{theme}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="generator" content="markdown-pulse {version}">
<title>{title} | {site}</title>
<style>
{css}
</style>
</head>
<body>
{article}
</body>
</html>
"#,
        theme = theme,
        version = env!("CARGO_PKG_VERSION"),
        title = html_escape(&post.title),
        site = html_escape(&config.title),
        css = css,
        article = post_article(post, safe_body, &config.date_format),
    )
}
