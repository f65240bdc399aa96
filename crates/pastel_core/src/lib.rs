//! Core domain library for Pastel (config, storage, models, highlighting).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across Pastel crates.
pub mod constants;
/// Database access layer.
pub mod db;
/// Unified diff rendering between pastes.
pub mod diff;
/// Application error types (storage/domain).
pub mod error;
/// Lexer registry and HTML highlighting.
pub mod highlight;
/// Data models for pastes and creation requests.
pub mod models;

pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use db::Database;
pub use error::AppError;
