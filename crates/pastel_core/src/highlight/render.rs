//! Line-numbered HTML rendering backed by syntect.

use super::registry::LexerEntry;
use std::fmt::Write as _;
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static THEMES: OnceLock<ThemeSet> = OnceLock::new();
    THEMES.get_or_init(ThemeSet::load_defaults)
}

fn resolve_theme(name: &str) -> &'static Theme {
    let themes = theme_set();
    if let Some(theme) = themes.themes.get(name) {
        return theme;
    }
    tracing::warn!("Theme \"{}\" cannot be found, falling back to default", name);
    themes
        .themes
        .get(crate::constants::DEFAULT_THEME)
        .unwrap_or_else(|| themes.themes.values().next().expect("bundled themes"))
}

/// Resolve a syntect grammar for a registry entry.
///
/// Tries the display name, then each alias and extension; entries without a
/// bundled grammar (ini, toml, ...) fall back to plain text rather than
/// failing the render.
fn resolve_syntax(entry: &LexerEntry) -> &'static SyntaxReference {
    let ps = syntax_set();
    if let Some(syntax) = ps.find_syntax_by_name(entry.name) {
        return syntax;
    }
    for candidate in entry.aliases.iter().chain(entry.extensions) {
        if let Some(syntax) = ps.find_syntax_by_token(candidate) {
            return syntax;
        }
    }
    ps.find_syntax_plain_text()
}

/// Escape text for embedding in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn line_number_column(line_count: usize) -> String {
    let mut column = String::new();
    for n in 1..=line_count {
        let _ = write!(column, "<a id=\"ln-{n}\" href=\"#ln-{n}\">{n}</a>\n");
    }
    column
}

/// Render content as a line-numbered, inline-styled HTML fragment.
///
/// Rendering is best-effort: a missing grammar means plain-text highlighting,
/// and a highlighting failure degrades to escaped preformatted text. Never
/// fails.
pub fn render_html(content: &str, entry: &LexerEntry, theme_name: &str) -> String {
    let syntax = resolve_syntax(entry);
    let theme = resolve_theme(theme_name);
    let code = match highlighted_html_for_string(content, syntax_set(), syntax, theme) {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!("Highlighting failed, serving plain content: {}", err);
            format!("<pre>{}</pre>", escape_html(content))
        }
    };

    let line_count = content.lines().count().max(1);
    format!(
        "<div class=\"highlight\"><table class=\"highlighttable\"><tr>\
         <td class=\"linenos\"><pre>{}</pre></td>\
         <td class=\"code\">{}</td>\
         </tr></table></div>",
        line_number_column(line_count),
        code
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::registry;

    #[test]
    fn render_includes_line_anchors() {
        let entry = registry::by_token("rust").unwrap();
        let html = render_html("fn main() {\n}\n", entry, "InspiredGitHub");
        assert!(html.contains("id=\"ln-1\""));
        assert!(html.contains("id=\"ln-2\""));
        assert!(!html.contains("id=\"ln-3\""));
    }

    #[test]
    fn entries_without_bundled_grammars_still_render() {
        let entry = registry::by_token("ini").unwrap();
        let html = render_html("[core]\nkey = 1\n", entry, "InspiredGitHub");
        assert!(html.contains("key"));
    }

    #[test]
    fn unknown_theme_falls_back() {
        let entry = registry::plain_text();
        let html = render_html("hello", entry, "no-such-theme");
        assert!(html.contains("hello"));
    }

    #[test]
    fn escape_html_covers_specials() {
        assert_eq!(
            escape_html("<a href=\"x\">&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }
}
