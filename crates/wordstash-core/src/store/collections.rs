//! Collection membership: static (word, collection) reference data.

use std::collections::BTreeMap;

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WordstashError};
use crate::model::normalize_word;
use crate::store::Store;

const BUNDLED_COLLECTIONS: &str = include_str!("../../data/collections.json");

/// A named collection and its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub word_count: usize,
}

/// Parse `{ "collection": ["word", ...] }` into normalized (word, collection) pairs.
pub fn parse_collections_json(json: &str) -> Result<Vec<(String, String)>> {
    let parsed: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
    let mut pairs = Vec::new();
    for (collection, words) in parsed {
        let collection = collection.trim().to_lowercase();
        if collection.is_empty() {
            return Err(WordstashError::InvalidInput(
                "collection name must not be empty".into(),
            ));
        }
        pairs.extend(
            words
                .iter()
                .map(|w| normalize_word(w))
                .filter(|w| !w.is_empty())
                .map(|w| (w, collection.clone())),
        );
    }
    Ok(pairs)
}

fn insert_pairs(conn: &Connection, pairs: &[(String, String)]) -> Result<usize> {
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO collection_words (word, collection) VALUES (?1, ?2)")?;
    let mut inserted = 0;
    for (word, collection) in pairs {
        inserted += stmt.execute(params![word, collection])?;
    }
    Ok(inserted)
}

/// Seed from the bundled resource. Only called by the migration that runs once.
pub(crate) fn seed_bundled(conn: &Connection) -> Result<usize> {
    insert_pairs(conn, &parse_collections_json(BUNDLED_COLLECTIONS)?)
}

impl Store {
    /// Import additional collection members from a JSON document.
    ///
    /// Existing memberships are left alone; returns the number of new rows.
    pub fn import_collections(&self, json: &str) -> Result<usize> {
        let pairs = parse_collections_json(json)?;
        self.transaction(|tx| insert_pairs(tx, &pairs))
    }

    /// All collections with their sizes, by name.
    pub fn collections(&self) -> Result<Vec<CollectionInfo>> {
        let mut stmt = self.conn().prepare(
            "SELECT collection, COUNT(*) FROM collection_words
             GROUP BY collection ORDER BY collection",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CollectionInfo {
                name: row.get(0)?,
                word_count: row.get::<_, i64>(1)? as usize,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Members of one collection, sorted.
    pub fn collection_words(&self, collection: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn().prepare(
            "SELECT word FROM collection_words WHERE collection = ?1 ORDER BY word",
        )?;
        let rows = stmt.query_map(params![collection.trim().to_lowercase()], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<String>>>()?)
    }
}
