//! Paste rows, creation requests, and the password gate.

use crate::constants::{FILENAME_MAX_LEN, PASSWORD_HASH_LEN};
use crate::error::AppError;
use crate::highlight;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::net::IpAddr;

/// A stored paste. Immutable once inserted; "editing" creates a new paste
/// whose `parent` points back at this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paste {
    /// Monotonic id, assigned by the store at insert time.
    pub id: u64,
    pub content: String,
    pub filename: Option<String>,
    pub mimetype: String,
    /// Lexer token recorded for exact re-resolution on display. The mimetype
    /// alone can be ambiguous across several lexers.
    pub lexer: Option<String>,
    /// 40-hex SHA-1 digest when the paste is password protected.
    pub password: Option<String>,
    pub created: DateTime<Utc>,
    /// Binary-encoded source address (4 or 16 octets), display-only.
    pub ip: Option<Vec<u8>>,
    pub parent: Option<u64>,
}

/// Lightweight row for the recent-pastes listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasteMeta {
    pub id: u64,
    pub filename: Option<String>,
    pub mimetype: String,
    pub created: DateTime<Utc>,
    pub protected: bool,
}

impl From<&Paste> for PasteMeta {
    fn from(value: &Paste) -> Self {
        Self {
            id: value.id,
            filename: value.filename.clone(),
            mimetype: value.mimetype.clone(),
            created: value.created,
            protected: value.password.is_some(),
        }
    }
}

/// Creation request, as collected from the upload form.
#[derive(Debug, Default, Clone)]
pub struct NewPaste {
    pub content: String,
    pub filename: Option<String>,
    pub syntax: Option<String>,
    pub password: Option<String>,
    /// When set, `password` is already a 40-hex digest and is stored verbatim.
    pub password_is_hashed: bool,
    pub source_ip: Option<String>,
    pub parent: Option<u64>,
    /// Skip lexer resolution entirely and store the content as `text/html`.
    pub as_html: bool,
}

/// Outcome of checking a supplied password against a paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Protected paste, no password supplied. A prompt, not an error.
    NeedsPassword,
    WrongPassword,
}

/// Treat `-` and empty/whitespace form values as absent.
pub fn normalize_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "-")
}

/// Hash a plaintext password into the stored 40-hex digest form.
pub fn hash_password(plain: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn sanitize_filename(filename: &str) -> Option<String> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();
    if base.is_empty() {
        return None;
    }
    Some(base.chars().take(FILENAME_MAX_LEN).collect())
}

fn encode_source_ip(raw: &str) -> Option<Vec<u8>> {
    match raw.trim().parse::<IpAddr>() {
        Ok(IpAddr::V4(addr)) => Some(addr.octets().to_vec()),
        Ok(IpAddr::V6(addr)) => Some(addr.octets().to_vec()),
        Err(err) => {
            tracing::warn!("Impossible to store the source IP address: {}", err);
            None
        }
    }
}

/// Decode a stored binary address back into display form.
pub fn format_ip(bytes: &[u8]) -> Option<String> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::from(octets).to_string())
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(IpAddr::from(octets).to_string())
        }
        _ => None,
    }
}

impl Paste {
    /// Build a paste row from a creation request.
    ///
    /// Resolves the lexer and mimetype (forced syntax, then filename + content
    /// guess, then content guess, always falling back to plain text), hashes
    /// the password unless the caller declared it pre-hashed, and encodes the
    /// source address. The id is a placeholder until the store assigns one.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` when `content` is empty.
    pub fn build(new: NewPaste) -> Result<Self, AppError> {
        if new.content.is_empty() {
            return Err(AppError::BadRequest("No paste provided".to_string()));
        }

        let filename = normalize_field(new.filename).and_then(|f| sanitize_filename(&f));
        let syntax = normalize_field(new.syntax);

        let (mimetype, lexer) = if new.as_html {
            ("text/html".to_string(), None)
        } else {
            let resolved = highlight::resolve(syntax.as_deref(), filename.as_deref(), &new.content);
            (resolved.mimetype.to_string(), Some(resolved.token.to_string()))
        };

        let password = normalize_field(new.password).map(|p| {
            if new.password_is_hashed {
                p.chars().take(PASSWORD_HASH_LEN).collect()
            } else {
                hash_password(&p)
            }
        });

        let ip = new.source_ip.as_deref().and_then(encode_source_ip);

        Ok(Self {
            id: 0,
            content: new.content,
            filename,
            mimetype,
            lexer,
            password,
            created: Utc::now(),
            ip,
            parent: new.parent,
        })
    }

    /// Check a supplied password against this paste.
    ///
    /// `supplied_is_hashed` always means "the supplied value is already the
    /// 40-hex digest"; the same convention the creation path uses (the
    /// `is_encrypted` form flag). Comparison is constant-time.
    pub fn authorize(&self, supplied: Option<&str>, supplied_is_hashed: bool) -> Access {
        let Some(stored) = self.password.as_deref() else {
            return Access::Granted;
        };
        let Some(supplied) = supplied.filter(|s| !s.is_empty()) else {
            return Access::NeedsPassword;
        };
        let candidate = if supplied_is_hashed {
            supplied.to_string()
        } else {
            hash_password(supplied)
        };
        if constant_time_eq(&candidate, stored) {
            Access::Granted
        } else {
            Access::WrongPassword
        }
    }

    /// Whether this paste is password protected.
    pub fn protected(&self) -> bool {
        self.password.is_some()
    }

    /// Display label used in diff headers and page titles.
    pub fn label(&self) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| format!("Paste #{}", self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(content: &str) -> NewPaste {
        NewPaste {
            content: content.to_string(),
            ..NewPaste::default()
        }
    }

    #[test]
    fn build_rejects_empty_content() {
        let err = Paste::build(plain("")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn build_defaults_to_plain_text() {
        let paste = Paste::build(plain("just some words")).expect("build");
        assert_eq!(paste.mimetype, "text/plain");
        assert_eq!(paste.lexer.as_deref(), Some("text"));
        assert!(paste.password.is_none());
    }

    #[test]
    fn dash_fields_are_treated_as_absent() {
        let mut new = plain("data");
        new.filename = Some("-".to_string());
        new.syntax = Some(" - ".to_string());
        let paste = Paste::build(new).expect("build");
        assert!(paste.filename.is_none());
        assert_eq!(paste.mimetype, "text/plain");
    }

    #[test]
    fn filename_is_trimmed_to_basename() {
        let mut new = plain("[core]\nkey = 1");
        new.filename = Some("  /etc/deep/path/settings.ini ".to_string());
        let paste = Paste::build(new).expect("build");
        assert_eq!(paste.filename.as_deref(), Some("settings.ini"));
        assert_eq!(paste.mimetype, "text/x-ini");
    }

    #[test]
    fn forced_syntax_overrides_filename() {
        let mut new = plain("[core]\nkey = 1");
        new.filename = Some("settings.ini".to_string());
        new.syntax = Some("text/plain".to_string());
        let paste = Paste::build(new).expect("build");
        assert_eq!(paste.mimetype, "text/plain");
    }

    #[test]
    fn as_html_fixes_the_mimetype() {
        let mut new = plain("<p>hello</p>");
        new.as_html = true;
        let paste = Paste::build(new).expect("build");
        assert_eq!(paste.mimetype, "text/html");
        assert!(paste.lexer.is_none());
    }

    #[test]
    fn plaintext_password_is_stored_as_digest() {
        let mut new = plain("secret data");
        new.password = Some("hunter2".to_string());
        let paste = Paste::build(new).expect("build");
        let stored = paste.password.as_deref().expect("password set");
        assert_eq!(stored.len(), PASSWORD_HASH_LEN);
        assert_eq!(stored, hash_password("hunter2"));
    }

    #[test]
    fn prehashed_password_is_stored_verbatim() {
        let digest = hash_password("hunter2");
        let mut new = plain("secret data");
        new.password = Some(digest.clone());
        new.password_is_hashed = true;
        let paste = Paste::build(new).expect("build");
        assert_eq!(paste.password.as_deref(), Some(digest.as_str()));
    }

    #[test]
    fn authorize_covers_all_gate_outcomes() {
        let mut new = plain("secret data");
        new.password = Some("hunter2".to_string());
        let paste = Paste::build(new).expect("build");

        assert_eq!(paste.authorize(None, false), Access::NeedsPassword);
        assert_eq!(paste.authorize(Some(""), false), Access::NeedsPassword);
        assert_eq!(paste.authorize(Some("wrong"), false), Access::WrongPassword);
        assert_eq!(paste.authorize(Some("hunter2"), false), Access::Granted);
        let digest = hash_password("hunter2");
        assert_eq!(paste.authorize(Some(&digest), true), Access::Granted);
        // A plaintext value with the pre-hashed flag set must not match.
        assert_eq!(paste.authorize(Some("hunter2"), true), Access::WrongPassword);
    }

    #[test]
    fn unprotected_paste_grants_unconditionally() {
        let paste = Paste::build(plain("open data")).expect("build");
        assert_eq!(paste.authorize(None, false), Access::Granted);
        assert_eq!(paste.authorize(Some("anything"), false), Access::Granted);
    }

    #[test]
    fn source_ip_roundtrips_and_bad_values_are_dropped() {
        let mut new = plain("data");
        new.source_ip = Some("192.168.1.9".to_string());
        let paste = Paste::build(new).expect("build");
        let bytes = paste.ip.as_deref().expect("ip stored");
        assert_eq!(bytes.len(), 4);
        assert_eq!(format_ip(bytes).as_deref(), Some("192.168.1.9"));

        let mut bad = plain("data");
        bad.source_ip = Some("not-an-ip".to_string());
        let paste = Paste::build(bad).expect("build");
        assert!(paste.ip.is_none());

        let mut v6 = plain("data");
        v6.source_ip = Some("::1".to_string());
        let paste = Paste::build(v6).expect("build");
        assert_eq!(paste.ip.as_deref().map(<[u8]>::len), Some(16));
    }

    #[test]
    fn meta_reflects_protection() {
        let mut new = plain("secret");
        new.password = Some("pw".to_string());
        let paste = Paste::build(new).expect("build");
        let meta = PasteMeta::from(&paste);
        assert!(meta.protected);
        assert_eq!(meta.mimetype, "text/plain");
    }
}
