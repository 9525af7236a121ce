//! SQLite-backed store.
//!
//! A `Store` is the single session a command runs against. It is opened once
//! per invocation and passed by reference into every component.

mod collections;
mod migrations;

use std::path::Path;

use chrono::{FixedOffset, Offset, Utc};
use rusqlite::{Connection, Transaction};

use crate::error::Result;

pub use collections::{parse_collections_json, CollectionInfo};
pub use migrations::CURRENT_SCHEMA_VERSION;

/// Database session.
pub struct Store {
    conn: Connection,
    utc_offset: FixedOffset,
}

impl Store {
    /// Open (or create) the database at `path` and bring its schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;
        tracing::debug!(path = %path.as_ref().display(), "opened store");
        Self::init(conn)
    }

    /// An in-memory database, for tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        let store = Self {
            conn,
            utc_offset: utc(),
        };
        migrations::run(&store.conn)?;
        Ok(store)
    }

    /// Set the timezone used to derive a lookup's calendar date at ingestion.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside one transaction. Commits on `Ok`, rolls back on `Err`.
    pub(crate) fn transaction<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Current schema version recorded in `schema_migrations`.
    pub fn schema_version(&self) -> Result<i32> {
        migrations::current_version(&self.conn)
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_store_is_migrated() {
        let store = Store::in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn reopening_on_disk_keeps_data_and_does_not_reseed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.db");

        let seeded = {
            let store = Store::open(&path).unwrap();
            store
                .conn()
                .execute("DELETE FROM collection_words WHERE collection = 'gre'", [])
                .unwrap();
            store.collections().unwrap().len()
        };

        let store = Store::open(&path).unwrap();
        assert_eq!(store.collections().unwrap().len(), seeded);
        assert!(store.collection_words("gre").unwrap().is_empty());
    }

    #[test]
    fn transaction_rolls_back_on_error() {
        let store = Store::in_memory().unwrap();
        let result: Result<()> = store.transaction(|tx| {
            tx.execute(
                "INSERT INTO quiz_attempts (pool, taken_at, question_count, points, duration_secs)
                 VALUES ('all', '2024-01-01 00:00:00+00:00', 4, 4, 10)",
                [],
            )?;
            Err(crate::error::WordstashError::InvalidInput("boom".into()))
        });
        assert!(result.is_err());
        let count: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM quiz_attempts", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
