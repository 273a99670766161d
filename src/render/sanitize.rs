//! HTML sanitizing

use std::borrow::Cow;

/// Tags that keep their `class` attribute, so highlighted code survives
const CLASSED_TAGS: &[&str] = &["pre", "code", "span", "figure", "table", "td"];

/// Allow-list sanitizer for rendered markdown
///
/// Removes script and style elements with their content, inline event
/// handlers, and URLs outside the safe schemes (so `javascript:` links
/// lose their `href`). Structural and inline markup is kept.
pub struct HtmlSanitizer {
    builder: ammonia::Builder<'static>,
}

impl HtmlSanitizer {
    /// Create a sanitizer tuned for markdown output
    pub fn new() -> Self {
        let mut builder = ammonia::Builder::default();
        // task list checkboxes
        builder
            .add_tags(&["input"])
            .add_tag_attributes("input", &["type", "checked", "disabled"]);
        for tag in CLASSED_TAGS {
            builder.add_tag_attributes(*tag, &["class"]);
        }
        builder.attribute_filter(|element, attribute, value| {
            if element == "input" && attribute == "type" && !value.eq_ignore_ascii_case("checkbox") {
                None
            } else {
                Some(Cow::Borrowed(value))
            }
        });
        Self { builder }
    }

    /// Sanitize an HTML fragment
    pub fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_script_and_handlers() {
        let sanitizer = HtmlSanitizer::new();
        let html = sanitizer.clean(
            r#"<p onclick="steal()">hi</p><script>alert(1)</script><img src="x.png" onerror="alert(2)">"#,
        );
        assert!(!html.contains("script"));
        assert!(!html.contains("alert"));
        assert!(!html.contains("onclick"));
        assert!(!html.contains("onerror"));
        assert!(html.contains("<p>hi</p>"));
        assert!(html.contains(r#"src="x.png""#));
    }

    #[test]
    fn test_strips_javascript_urls() {
        let sanitizer = HtmlSanitizer::new();
        let html = sanitizer.clean(r#"<a href="javascript:alert(1)">x</a><a href="https://example.com">y</a>"#);
        assert!(!html.contains("javascript:"));
        assert!(html.contains(r#"href="https://example.com""#));
    }

    #[test]
    fn test_keeps_highlight_classes() {
        let sanitizer = HtmlSanitizer::new();
        let html = sanitizer.clean(r#"<pre class="highlight"><code class="language-rust"><span class="hl-source">fn</span></code></pre>"#);
        assert!(html.contains(r#"<pre class="highlight">"#));
        assert!(html.contains(r#"<span class="hl-source">"#));
    }

    #[test]
    fn test_keeps_task_list_checkboxes() {
        let sanitizer = HtmlSanitizer::new();
        let html = sanitizer.clean(r#"<ul><li><input disabled="" type="checkbox" checked=""> done</li></ul>"#);
        assert!(html.contains("<input"));
        assert!(html.contains(r#"type="checkbox""#));
    }

    #[test]
    fn test_only_checkbox_inputs_keep_their_type() {
        let sanitizer = HtmlSanitizer::new();
        let html = sanitizer.clean(r#"<input type="password"><input type="text" checked="">"#);
        assert!(!html.contains("password"));
        assert!(!html.contains(r#"type="text""#));
    }
}
