//! Configuration loading from a TOML file and environment variables.

use crate::constants::*;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Runtime configuration for Pastel.
///
/// Values are resolved once at startup: built-in defaults, then the optional
/// TOML config file, then environment-variable overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub db_path: String,
    pub debug: bool,
    pub recent_items: usize,
    pub theme: String,
    pub title: String,
    pub max_paste_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            db_path: default_db_path(),
            debug: false,
            recent_items: DEFAULT_RECENT_ITEMS,
            theme: DEFAULT_THEME.to_string(),
            title: DEFAULT_TITLE.to_string(),
            max_paste_size: DEFAULT_MAX_PASTE_SIZE,
        }
    }
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("pastel")
        .join("db")
        .to_string_lossy()
        .to_string()
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    // Prefer explicit HOME if set (Unix, some Windows shells)
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

/// Parse a boolean-like flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load configuration from the config file and environment.
    ///
    /// The file path comes from `PASTEL_CONFIG`, defaulting to `pastel.toml`
    /// in the working directory. A missing file is not an error; defaults and
    /// env overrides still apply so the server starts with zero setup.
    ///
    /// # Returns
    /// A populated [`Config`].
    pub fn load() -> Self {
        let path = env::var("PASTEL_CONFIG").unwrap_or_else(|_| "pastel.toml".to_string());
        let mut config = Self::from_file(Path::new(&path)).unwrap_or_default();
        config.apply_env_overrides();
        config
    }

    /// Parse a config file, logging and discarding unreadable content.
    ///
    /// # Returns
    /// `Some(config)` when the file exists and parses, otherwise `None`.
    pub fn from_file(path: &Path) -> Option<Self> {
        let raw = std::fs::read_to_string(path).ok()?;
        match toml::from_str::<Self>(&raw) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!("Ignoring unparseable config file {}: {}", path.display(), err);
                None
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(bind) = env::var("BIND") {
            if !bind.trim().is_empty() {
                self.bind = bind.trim().to_string();
            }
        }
        if let Some(port) = env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Ok(db_path) = env::var("DB_PATH") {
            self.db_path = expand_tilde(db_path);
        }
        if let Some(debug) = env::var("DEBUG").ok().and_then(|v| parse_env_flag(&v)) {
            self.debug = debug;
        }
        if let Some(recent) = env::var("RECENT_ITEMS").ok().and_then(|v| v.parse().ok()) {
            self.recent_items = recent;
        }
        if let Ok(theme) = env::var("THEME") {
            if !theme.trim().is_empty() {
                self.theme = theme.trim().to_string();
            }
        }
        if let Some(size) = env::var("MAX_PASTE_SIZE").ok().and_then(|v| v.parse().ok()) {
            self.max_paste_size = size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn from_file_reads_partial_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pastel.toml");
        std::fs::write(&path, "port = 8080\ntitle = \"My pastes\"\n").expect("write");

        let config = Config::from_file(&path).expect("config should parse");
        assert_eq!(config.port, 8080);
        assert_eq!(config.title, "My pastes");
        // Unspecified fields keep their defaults.
        assert_eq!(config.recent_items, crate::constants::DEFAULT_RECENT_ITEMS);
    }

    #[test]
    fn from_file_rejects_garbage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pastel.toml");
        std::fs::write(&path, "this is not toml [[").expect("write");
        assert!(Config::from_file(&path).is_none());
    }
}
