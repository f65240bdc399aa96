//! HTTP request handlers.

/// Paste endpoints: create, show, raw, edit, diff, recent.
pub mod paste;
