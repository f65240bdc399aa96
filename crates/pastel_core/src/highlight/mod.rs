//! Lexer registry and HTML highlighting.
//!
//! Lookup is a fixed registry of known syntaxes rather than dynamic plugin
//! resolution, and every resolution path falls back to plain text; a paste is
//! never rejected because its syntax could not be matched.

/// Content-based syntax detection heuristics.
pub mod detect;
/// The static lexer table and lookup helpers.
pub mod registry;
/// Line-numbered HTML rendering via syntect.
pub mod render;

pub use registry::{plain_text, LexerEntry};
pub use render::{escape_html, render_html};

/// Outcome of creation-time lexer resolution.
#[derive(Debug, Clone, Copy)]
pub struct Resolved {
    pub entry: &'static LexerEntry,
    /// Canonical token recorded as the paste's `lexer` field.
    pub token: &'static str,
    /// First declared mimetype of the resolved lexer.
    pub mimetype: &'static str,
}

impl From<&'static LexerEntry> for Resolved {
    fn from(entry: &'static LexerEntry) -> Self {
        Self {
            entry,
            token: entry.token(),
            mimetype: entry.mimetype(),
        }
    }
}

/// Resolve the lexer for a new paste.
///
/// Order: forced syntax token, then filename extension (falling back to
/// content detection), then content detection alone, then plain text.
pub fn resolve(forced: Option<&str>, filename: Option<&str>, content: &str) -> Resolved {
    let entry = if let Some(forced) = forced {
        registry::by_token(forced).unwrap_or_else(plain_text)
    } else if let Some(filename) = filename {
        registry::for_filename(filename)
            .or_else(|| detect::detect(content))
            .unwrap_or_else(plain_text)
    } else {
        detect::detect(content).unwrap_or_else(plain_text)
    };
    Resolved::from(entry)
}

/// Resolve the lexer for displaying a stored paste.
///
/// Order: explicit `lang` override, then the stored lexer token, then the
/// stored mimetype, then plain text.
pub fn resolve_for_display(
    lang: Option<&str>,
    lexer: Option<&str>,
    mimetype: &str,
) -> &'static LexerEntry {
    lang.and_then(registry::by_token)
        .or_else(|| lexer.and_then(registry::by_token))
        .or_else(|| registry::by_token(mimetype))
        .unwrap_or_else(plain_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_syntax_wins_over_filename() {
        let resolved = resolve(Some("python"), Some("x.ini"), "[core]\nkey = 1");
        assert_eq!(resolved.token, "python");
    }

    #[test]
    fn forced_mimetype_is_accepted_as_a_token() {
        let resolved = resolve(Some("text/plain"), Some("x.ini"), "[core]\nkey = 1");
        assert_eq!(resolved.mimetype, "text/plain");
    }

    #[test]
    fn ini_filename_resolves_mimetype() {
        let resolved = resolve(None, Some("x.ini"), "[core]\nkey = 1");
        assert_eq!(resolved.mimetype, "text/x-ini");
        assert_eq!(resolved.token, "ini");
    }

    #[test]
    fn unknown_forced_syntax_falls_back_to_plain() {
        let resolved = resolve(Some("klingon"), None, "qapla'");
        assert_eq!(resolved.mimetype, "text/plain");
    }

    #[test]
    fn unknown_extension_falls_back_to_content_detection() {
        let resolved = resolve(None, Some("notes.whatever"), "{\"a\": 1}");
        assert_eq!(resolved.token, "json");
    }

    #[test]
    fn display_resolution_prefers_lang_override() {
        let entry = resolve_for_display(Some("diff"), Some("python"), "text/x-python");
        assert_eq!(entry.token(), "diff");

        let entry = resolve_for_display(None, Some("python"), "text/x-ini");
        assert_eq!(entry.token(), "python");

        let entry = resolve_for_display(None, None, "text/x-ini");
        assert_eq!(entry.token(), "ini");

        let entry = resolve_for_display(None, None, "application/unknown");
        assert_eq!(entry.token(), "text");
    }
}
