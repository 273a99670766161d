//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::helpers::html_escape;

/// Prefix of every highlighting class, keeps them apart from page styles
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

lazy_static! {
    /// A single HTML tag or comment inside a raw HTML block
    static ref HTML_TAG: Regex =
        Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][A-Za-z0-9-]*(?:\s[^<>]*)?/?>").unwrap();
}

/// Markdown renderer with syntax highlighting
///
/// Produces unsanitized HTML. Anything shown to a reader has to go through
/// [`RenderPipeline`](super::RenderPipeline) instead.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    highlight: bool,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create with custom settings
    pub fn with_options(highlight: bool, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            highlight,
            line_numbers,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, options());
        let events = self.transform(parser);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Replace code blocks with highlighted HTML and expand markdown inside
    /// raw HTML blocks
    fn transform<'a>(&self, parser: Parser<'a>) -> Vec<Event<'a>> {
        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;
        let mut html_block: Option<String> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::Start(Tag::HtmlBlock) => {
                    html_block = Some(String::new());
                }
                Event::End(TagEnd::HtmlBlock) => {
                    if let Some(raw) = html_block.take() {
                        events.push(Event::Html(CowStr::from(self.expand_html_block(&raw))));
                    }
                }
                Event::Html(text) if html_block.is_some() => {
                    if let Some(raw) = html_block.as_mut() {
                        raw.push_str(&text);
                    }
                }
                _ => events.push(event),
            }
        }

        events
    }

    /// Expand markdown between the tags of a raw HTML block
    ///
    /// CommonMark keeps everything up to the end of the line after a block
    /// tag as raw HTML, so `<b>x</b> **y**` would never get emphasis. Tags
    /// are passed through untouched and each run of text between them is
    /// rendered as markdown of its own.
    fn expand_html_block(&self, raw: &str) -> String {
        let mut output = String::with_capacity(raw.len());
        let mut last = 0;
        // nesting depth of <pre>/<code>/<textarea>, whose text stays verbatim
        let mut verbatim = 0usize;

        for tag in HTML_TAG.find_iter(raw) {
            self.push_segment(&mut output, &raw[last..tag.start()], verbatim > 0);
            output.push_str(tag.as_str());
            last = tag.end();

            let tag = tag.as_str().to_ascii_lowercase();
            let name = tag
                .trim_start_matches('<')
                .trim_start_matches('/')
                .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .next()
                .unwrap_or("");
            if matches!(name, "pre" | "code" | "textarea") {
                if tag.starts_with("</") {
                    verbatim = verbatim.saturating_sub(1);
                } else {
                    verbatim += 1;
                }
            }
        }
        self.push_segment(&mut output, &raw[last..], verbatim > 0);

        output
    }

    fn push_segment(&self, output: &mut String, segment: &str, verbatim: bool) {
        if verbatim || segment.trim().is_empty() {
            output.push_str(segment);
            return;
        }

        let parser = Parser::new_ext(segment, options());
        let mut events: Vec<Event> = parser.collect();

        // A lone paragraph is inline text and should not gain <p> tags
        let paragraphs = events
            .iter()
            .filter(|e| matches!(e, Event::Start(Tag::Paragraph)))
            .count();
        if paragraphs == 1
            && matches!(events.first(), Some(Event::Start(Tag::Paragraph)))
            && matches!(events.last(), Some(Event::End(TagEnd::Paragraph)))
        {
            events.remove(0);
            events.pop();
        }

        html::push_html(output, events.into_iter());
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let lang_class = html_escape(lang);

        if !self.highlight {
            return format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang_class,
                html_escape(code)
            );
        }

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::debug!("Highlighting failed for {}: {}", lang, e);
                return format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang_class,
                    html_escape(code)
                );
            }
        }
        let highlighted = generator.finalize();

        if self.line_numbers {
            self.add_line_numbers(&highlighted, &lang_class)
        } else {
            format!(
                r#"<pre class="highlight"><code class="language-{}">{}</code></pre>"#,
                lang_class, highlighted
            )
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
            lang,
            gutter,
            lines.join("\n")
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Stylesheet for highlighted code using one of syntect's bundled palettes
pub fn highlight_css(palette: &str) -> anyhow::Result<String> {
    let theme_set = ThemeSet::load_defaults();
    let theme = theme_set
        .themes
        .get(palette)
        .ok_or_else(|| anyhow::anyhow!("Unknown highlight palette: {}", palette))?;
    Ok(css_for_theme_with_class_style(theme, CLASS_STYLE)?)
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}
