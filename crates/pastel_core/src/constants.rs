//! Shared constants used across Pastel crates.

/// Default HTTP port for the Pastel server.
pub const DEFAULT_PORT: u16 = 9669;

/// Default bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default maximum paste size accepted by the upload endpoint.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 10 * 1024 * 1024;

/// Default number of entries shown on the recent-pastes page.
pub const DEFAULT_RECENT_ITEMS: usize = 20;

/// Default syntect theme used for highlighted views.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Default page title.
pub const DEFAULT_TITLE: &str = "Pastel";

/// Stored password digests are 40 hex characters (SHA-1).
pub const PASSWORD_HASH_LEN: usize = 40;

/// Filenames are truncated to this many characters before storage.
pub const FILENAME_MAX_LEN: usize = 128;
