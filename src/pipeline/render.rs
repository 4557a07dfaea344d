//! Markdown → HTML with class-based syntax highlighting.
//!
//! pulldown-cmark parses the aggregated Markdown; fenced code blocks are
//! intercepted and replaced by syntect output. Highlighting uses CSS classes
//! rather than inline colours so a single stylesheet generated from the theme
//! covers the whole document.
//!
//! Fences without a language tag (and indented code) are escaped but not
//! highlighted: the language is never guessed.

use crate::error::DocsError;
use once_cell::sync::Lazy;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Wrapper class for highlighted blocks, also the scope of the theme CSS.
pub const CODE_CLASS: &str = "codehilite";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Stylesheet appended after the highlighter CSS when no custom one is set.
pub const DEFAULT_STYLESHEET: &str = include_str!("../../assets/pdf_style.css");

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Whether `name` is one of syntect's bundled themes.
pub fn theme_exists(name: &str) -> bool {
    THEMES.themes.contains_key(name)
}

/// CSS for the highlighter classes emitted by [`markdown_to_html`].
pub fn highlight_css(theme: &str) -> Result<String, DocsError> {
    let theme = THEMES
        .themes
        .get(theme)
        .ok_or_else(|| DocsError::InvalidConfig(format!("unknown highlight theme '{theme}'")))?;
    css_for_theme_with_class_style(theme, CLASS_STYLE)
        .map_err(|e| DocsError::Highlight(e.to_string()))
}

/// Render Markdown to an HTML fragment with fenced-code highlighting.
pub fn markdown_to_html(markdown: &str) -> Result<String, DocsError> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut events: Vec<Event<'_>> = Vec::new();
    let mut code: Option<(Option<String>, String)> = None;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                };
                code = Some((lang, String::new()));
            }
            Event::Text(text) if code.is_some() => {
                if let Some((_, ref mut buf)) = code {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((lang, buf)) = code.take() {
                    let block = highlight_block(&buf, lang.as_deref())?;
                    events.push(Event::Html(CowStr::from(block)));
                }
            }
            other => events.push(other),
        }
    }

    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, events.into_iter());
    Ok(out)
}

/// Assemble the standalone page: highlighter CSS, stylesheet, body.
pub fn wrap_html(body: &str, highlight_css: &str, stylesheet: &str) -> String {
    format!(
        "<html><head><meta charset='utf-8'><style>{highlight_css}\n{stylesheet}</style></head><body>{body}</body></html>"
    )
}

/// First word of the fence info string, e.g. `python` for "```python title=x".
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn highlight_block(code: &str, lang: Option<&str>) -> Result<String, DocsError> {
    let syntax = lang.and_then(|l| SYNTAXES.find_syntax_by_token(l));
    let Some(syntax) = syntax else {
        return Ok(format!(
            "<div class=\"{CODE_CLASS}\"><pre><code>{}</code></pre></div>\n",
            escape_html(code)
        ));
    };

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAXES, CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
        generator
            .parse_html_for_line_which_includes_newline(line)
            .map_err(|e| DocsError::Highlight(e.to_string()))?;
    }
    Ok(format!(
        "<div class=\"{CODE_CLASS}\"><pre><code>{}</code></pre></div>\n",
        generator.finalize()
    ))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
