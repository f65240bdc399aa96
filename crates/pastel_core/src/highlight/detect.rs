//! Best-effort content-based syntax detection.
//!
//! Detection samples only the first portion of text to keep scan costs
//! bounded for large pastes. Unknown content yields `None`; callers fall back
//! to plain text.

use super::registry::{self, LexerEntry};

const SAMPLE_MAX_BYTES: usize = 64 * 1024;
const SAMPLE_MAX_LINES: usize = 512;

fn utf8_prefix(content: &str, max_bytes: usize) -> &str {
    if content.len() <= max_bytes {
        return content;
    }
    let mut end = max_bytes;
    while end > 0 && !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

fn looks_like_markdown(sample: &str) -> bool {
    if sample.contains("```") || sample.contains("](") {
        return true;
    }
    sample.lines().take(SAMPLE_MAX_LINES).any(|line| {
        let t = line.trim_start();
        (t.starts_with('#') && t.trim_start_matches('#').starts_with(' '))
            || t.starts_with("> ")
            || ((t.starts_with("- ") || t.starts_with("* ")) && !t.contains(": "))
    })
}

fn token_for_content(content: &str) -> Option<&'static str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return None;
    }
    let sample = utf8_prefix(trimmed, SAMPLE_MAX_BYTES);
    let lower = sample.to_ascii_lowercase();
    let lines = || sample.lines().take(SAMPLE_MAX_LINES);

    // JSON: structural check without full parsing
    if (sample.starts_with('{') || sample.starts_with('['))
        && sample.contains('"')
        && (sample.contains(':') || sample.starts_with('['))
        && (sample.ends_with('}') || sample.ends_with(']') || sample.len() < trimmed.len())
    {
        return Some("json");
    }

    // HTML before generic XML so we don't mis-classify
    if lower.contains("<!doctype html")
        || lower.contains("<html")
        || lower.contains("<body")
        || lower.contains("<div")
    {
        return Some("html");
    }

    if lower.starts_with("<?xml")
        || (sample.starts_with('<') && lower.contains("</") && !lower.contains("<html"))
    {
        return Some("xml");
    }

    if lower.starts_with("#!/bin/")
        || lower.starts_with("#!/usr/bin/env bash")
        || lower.starts_with("#!/usr/bin/env sh")
        || lower.contains("\nfi")
        || lower.contains("\ndone")
    {
        return Some("bash");
    }

    if lower.starts_with("#!/usr/bin/env python") || lower.starts_with("#!/usr/bin/python") {
        return Some("python");
    }

    let yaml_pairs = lines()
        .filter(|l| {
            let t = l.trim();
            if t.is_empty() || t.starts_with('#') {
                return false;
            }
            (t.starts_with("- ") || t.contains(": ")) && !t.contains('{')
        })
        .count();
    if (lower.starts_with("---") || yaml_pairs >= 2) && !sample.contains('{') {
        return Some("yaml");
    }

    let has_section_header = lines().any(|l| {
        let t = l.trim();
        t.starts_with('[') && t.ends_with(']') && t.len() > 2
    });
    let assignments = lines()
        .filter(|l| {
            let t = l.trim();
            if t.is_empty() || t.starts_with('#') || t.starts_with(';') || t.starts_with('[') {
                return false;
            }
            t.contains('=') && !t.contains("==")
        })
        .count();
    if has_section_header && assignments >= 1 {
        // TOML and INI share this shape; string values are the TOML tell.
        return if sample.contains('"') {
            Some("toml")
        } else {
            Some("ini")
        };
    }

    if looks_like_markdown(sample) {
        return Some("markdown");
    }

    if lower.contains("\\begin{") || lower.contains("\\documentclass") {
        return Some("latex");
    }

    if lower.contains('{') && lower.contains('}') && lower.contains(':') && lower.contains(';') {
        let css_tokens = ["color:", "background", "margin", "padding", "font-", "display"];
        if css_tokens.iter().any(|token| lower.contains(token)) {
            return Some("css");
        }
    }

    // Specialised checks for languages with distinctive constructs
    if lower.contains("std::") || lower.contains("using namespace std") {
        return Some("cpp");
    }
    if lower.contains("#include") && (lower.contains("int main") || lower.contains("printf")) {
        return Some("c");
    }

    let keyword_hits =
        |keywords: &[&str]| -> usize { keywords.iter().filter(|kw| lower.contains(*kw)).count() };

    let scored: &[(&str, &[&str])] = &[
        ("rust", &["fn ", "impl", "let ", "mut ", "pub ", "struct ", "match ", "crate::"]),
        ("python", &["def ", "import ", "class ", "self", "elif", "print("]),
        ("javascript", &["function", "const ", "let ", "=>", "console.", "export "]),
        ("go", &["package ", "func ", "fmt.", "defer ", "chan", "go "]),
        ("java", &["public class", "import java.", "system.out", " extends ", " void main"]),
        ("sql", &["select ", "insert ", " from ", " where ", "create table", " join "]),
    ];

    let mut best: Option<(&str, usize)> = None;
    for (token, keywords) in scored {
        let hits = keyword_hits(keywords);
        if hits >= 2 && best.map_or(true, |(_, b)| hits > b) {
            best = Some((token, hits));
        }
    }
    best.map(|(token, _)| token)
}

/// Guess a registry entry from content alone.
pub fn detect(content: &str) -> Option<&'static LexerEntry> {
    token_for_content(content).and_then(registry::by_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(content: &str) -> Option<&'static str> {
        detect(content).map(|entry| entry.token())
    }

    #[test]
    fn detects_structured_formats() {
        assert_eq!(token("{\"key\": \"value\"}"), Some("json"));
        assert_eq!(token("<?xml version=\"1.0\"?>\n<a></a>"), Some("xml"));
        assert_eq!(token("<!DOCTYPE html>\n<html></html>"), Some("html"));
        assert_eq!(token("host: localhost\nport: 9669\n"), Some("yaml"));
    }

    #[test]
    fn detects_scripts_and_code() {
        assert_eq!(token("#!/bin/sh\necho hi\n"), Some("bash"));
        assert_eq!(
            token("fn main() {\n    let mut x = 1;\n    pub use crate::y;\n}\n"),
            Some("rust")
        );
        assert_eq!(
            token("def march():\n    import os\n    print(os.sep)\n"),
            Some("python")
        );
    }

    #[test]
    fn section_headers_with_assignments_look_like_ini() {
        assert_eq!(token("[core]\nkey = 1\n"), Some("ini"));
        assert_eq!(token("[package]\nname = \"demo\"\n"), Some("toml"));
    }

    #[test]
    fn unknown_content_yields_none() {
        assert_eq!(token("just a single sentence"), None);
        assert_eq!(token(""), None);
        assert_eq!(token("   \n  "), None);
    }
}
