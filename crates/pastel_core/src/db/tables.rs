//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Canonical paste rows (`Paste`, bincode-encoded), keyed by id.
pub const PASTES: TableDefinition<u64, &[u8]> = TableDefinition::new("pastes");
/// Paste metadata rows (`PasteMeta`, bincode-encoded), keyed by id.
pub const PASTES_META: TableDefinition<u64, &[u8]> = TableDefinition::new("pastes_meta");
/// Named monotonic counters.
pub const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Counter row holding the next paste id to assign.
pub const NEXT_PASTE_ID: &str = "next_paste_id";
