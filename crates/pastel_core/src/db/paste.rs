//! Paste storage operations backed by redb.

use crate::db::tables::*;
use crate::error::AppError;
use crate::models::paste::{Paste, PasteMeta};
use chrono::Utc;
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for paste-related redb tables.
pub struct PasteDb {
    db: Arc<redb::Database>,
}

fn deserialize_paste(bytes: &[u8]) -> Result<Paste, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

fn deserialize_meta(bytes: &[u8]) -> Result<PasteMeta, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

impl PasteDb {
    /// Initialize paste tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.open_table(PASTES_META)?;
        write_txn.open_table(COUNTERS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new paste, assigning the next monotonic id and the creation
    /// timestamp inside the write transaction.
    ///
    /// # Returns
    /// The stored paste with `id` and `created` filled in.
    ///
    /// # Errors
    /// Returns an error when serialization or storage operations fail.
    pub fn insert(&self, mut paste: Paste) -> Result<Paste, AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut counters = write_txn.open_table(COUNTERS)?;
            let id = counters
                .get(NEXT_PASTE_ID)?
                .map(|guard| guard.value())
                .unwrap_or(1);
            counters.insert(NEXT_PASTE_ID, id + 1)?;

            paste.id = id;
            paste.created = Utc::now();

            let encoded_paste = bincode::serialize(&paste)?;
            let meta = PasteMeta::from(&paste);
            let encoded_meta = bincode::serialize(&meta)?;

            let mut pastes = write_txn.open_table(PASTES)?;
            let mut metas = write_txn.open_table(PASTES_META)?;
            pastes.insert(paste.id, encoded_paste.as_slice())?;
            metas.insert(paste.id, encoded_meta.as_slice())?;
        }
        write_txn.commit()?;
        tracing::debug!("Stored paste #{} ({})", paste.id, paste.mimetype);
        Ok(paste)
    }

    /// Fetch a paste by id.
    ///
    /// # Returns
    /// `Ok(Some(paste))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: u64) -> Result<Option<Paste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        match pastes.get(id)? {
            Some(value) => Ok(Some(deserialize_paste(value.value())?)),
            None => Ok(None),
        }
    }

    /// List metadata for the most recent pastes, newest first.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<PasteMeta>, AppError> {
        let read_txn = self.db.begin_read()?;
        let metas = read_txn.open_table(PASTES_META)?;
        let mut items = Vec::with_capacity(limit);
        for entry in metas.iter()?.rev().take(limit) {
            let (_, value) = entry?;
            items.push(deserialize_meta(value.value())?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::paste::NewPaste;
    use tempfile::TempDir;

    fn setup_test_db() -> (Database, TempDir) {
        let temp = TempDir::new().expect("tempdir");
        let db = Database::new(temp.path().to_str().unwrap()).expect("open db");
        (db, temp)
    }

    fn new_paste(content: &str) -> Paste {
        Paste::build(NewPaste {
            content: content.to_string(),
            ..NewPaste::default()
        })
        .expect("build")
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let (db, _temp) = setup_test_db();
        let first = db.pastes.insert(new_paste("one")).expect("insert");
        let second = db.pastes.insert(new_paste("two")).expect("insert");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn insert_get_roundtrip_preserves_content() {
        let (db, _temp) = setup_test_db();
        let stored = db.pastes.insert(new_paste("fn main() {}")).expect("insert");

        let fetched = db
            .pastes
            .get(stored.id)
            .expect("get")
            .expect("paste exists");
        assert_eq!(fetched.content, "fn main() {}");
        assert_eq!(fetched.mimetype, stored.mimetype);
        assert_eq!(fetched.created, stored.created);
    }

    #[test]
    fn unicode_content_roundtrips() {
        let (db, _temp) = setup_test_db();
        let content = "emoji: \u{1f980}\u{1f680} — ünïcödé";
        let stored = db.pastes.insert(new_paste(content)).expect("insert");
        let fetched = db.pastes.get(stored.id).expect("get").expect("exists");
        assert_eq!(fetched.content.as_bytes(), content.as_bytes());
    }

    #[test]
    fn unknown_id_is_none() {
        let (db, _temp) = setup_test_db();
        assert!(db.pastes.get(12345).expect("get").is_none());
    }

    #[test]
    fn recent_lists_newest_first_with_protection_flag() {
        let (db, _temp) = setup_test_db();
        db.pastes.insert(new_paste("oldest")).expect("insert");
        db.pastes.insert(new_paste("middle")).expect("insert");
        let mut protected = NewPaste {
            content: "newest".to_string(),
            ..NewPaste::default()
        };
        protected.password = Some("pw".to_string());
        let newest = db
            .pastes
            .insert(Paste::build(protected).expect("build"))
            .expect("insert");

        let items = db.pastes.recent(2).expect("recent");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, newest.id);
        assert!(items[0].protected);
        assert!(!items[1].protected);
    }

    #[test]
    fn ids_survive_reopen() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().to_str().unwrap().to_string();
        {
            let db = Database::new(&path).expect("open db");
            db.pastes.insert(new_paste("before reopen")).expect("insert");
        }
        let db = Database::new(&path).expect("reopen db");
        let next = db.pastes.insert(new_paste("after reopen")).expect("insert");
        assert_eq!(next.id, 2);
        assert!(db.pastes.get(1).expect("get").is_some());
    }
}
