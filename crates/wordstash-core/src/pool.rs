//! Word pools for quiz and revision sessions.

use rusqlite::params;

use crate::error::{Result, WordstashError};
use crate::ledger::WordLedger;
use crate::model::PoolFilter;
use crate::store::Store;

/// Distinct looked-up words matching `filter`, sorted.
///
/// A collection pool holds the collection's members that have lookup
/// history. An empty result is an error: `NoWordsInDb` for `All`,
/// `EmptyPool` for any narrower view.
pub fn build_pool(store: &Store, filter: &PoolFilter) -> Result<Vec<String>> {
    let ledger = WordLedger::new(store);
    let words = match filter {
        PoolFilter::All => ledger.words()?,
        PoolFilter::Tag(tag) => ledger.words_tagged(tag)?,
        PoolFilter::Status(flag) => ledger.words_with(*flag)?,
        PoolFilter::Collection(name) => collection_pool(store, name)?,
    };

    if words.is_empty() {
        return Err(match filter {
            PoolFilter::All => WordstashError::NoWordsInDb,
            other => WordstashError::EmptyPool(other.to_string()),
        });
    }
    Ok(words)
}

/// Words distractors may be drawn from: the same collection for a
/// collection pool, the whole ledger otherwise.
pub fn distractor_universe(store: &Store, filter: &PoolFilter) -> Result<Vec<String>> {
    match filter {
        PoolFilter::Collection(name) => store.collection_words(name),
        _ => WordLedger::new(store).words(),
    }
}

fn collection_pool(store: &Store, name: &str) -> Result<Vec<String>> {
    let mut stmt = store.conn().prepare(
        "SELECT DISTINCT c.word FROM collection_words c
         JOIN lookup_events e ON e.word = c.word
         WHERE c.collection = ?1 ORDER BY c.word",
    )?;
    let rows = stmt.query_map(params![name.trim().to_lowercase()], |r| r.get(0))?;
    Ok(rows.collect::<rusqlite::Result<Vec<String>>>()?)
}
