//! Data models for pastes.

/// Paste rows and creation requests.
pub mod paste;
