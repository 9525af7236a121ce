//! Lookup history and per-word state.
//!
//! Every lookup appends a row to `lookup_events`. The current tag and status
//! flags of a word are replicated across all of its rows: a mutation rewrites
//! every row of the word in one transaction, and reads take the most recent
//! row. Any historical row therefore reports the word's current state.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Result, WordstashError};
use crate::model::{normalize_word, LedgerSummary, LookupEvent, StatusFlag, WordState};
use crate::statistics::{longest_streak, predict_milestone, MilestoneForecast, Streak};
use crate::store::Store;

const EVENT_COLUMNS: &str =
    "id, word, looked_up_at, looked_up_on, tag, mastered, learning, favorite";

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<LookupEvent> {
    Ok(LookupEvent {
        id: row.get(0)?,
        word: row.get(1)?,
        looked_up_at: row.get(2)?,
        looked_up_on: row.get(3)?,
        tag: row.get(4)?,
        mastered: row.get(5)?,
        learning: row.get(6)?,
        favorite: row.get(7)?,
    })
}

/// Append-only lookup history with replicated word state.
pub struct WordLedger<'a> {
    store: &'a Store,
}

impl<'a> WordLedger<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Record a lookup stamped now.
    pub fn record_lookup(&self, word: &str, tag: Option<&str>) -> Result<LookupEvent> {
        self.record_lookup_at(word, tag, Utc::now())
    }

    /// Record a lookup at an explicit instant.
    ///
    /// Earned status and an existing tag carry forward onto the new row. A new
    /// tag, when given, becomes the word's tag on every row.
    pub fn record_lookup_at(
        &self,
        word: &str,
        tag: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<LookupEvent> {
        let word = normalize_word(word);
        if word.is_empty() {
            return Err(WordstashError::InvalidInput("word must not be empty".into()));
        }
        let new_tag = tag.map(str::trim).filter(|t| !t.is_empty());

        self.store.transaction(|tx| {
            let at = unique_timestamp(tx, at)?;
            let on = at.with_timezone(&self.store.utc_offset()).date_naive();

            // Aggregates over zero rows yield NULL, read as "never set".
            let (mastered, learning, favorite): (Option<bool>, Option<bool>, Option<bool>) = tx
                .query_row(
                    "SELECT MAX(mastered), MAX(learning), MAX(favorite)
                     FROM lookup_events WHERE word = ?1",
                    params![word],
                    |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
                )?;
            let mastered = mastered.unwrap_or(false);
            let learning = learning.unwrap_or(false) && !mastered;
            let favorite = favorite.unwrap_or(false);

            let tag = match new_tag {
                Some(t) => {
                    tx.execute(
                        "UPDATE lookup_events SET tag = ?1 WHERE word = ?2",
                        params![t, word],
                    )?;
                    Some(t.to_string())
                }
                None => tx
                    .query_row(
                        "SELECT tag FROM lookup_events
                         WHERE word = ?1 AND tag IS NOT NULL ORDER BY id DESC LIMIT 1",
                        params![word],
                        |r| r.get::<_, String>(0),
                    )
                    .optional()?,
            };

            tx.execute(
                "INSERT INTO lookup_events
                    (word, looked_up_at, looked_up_on, tag, mastered, learning, favorite)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![word, at, on, tag, mastered, learning, favorite],
            )?;
            let id = tx.last_insert_rowid();
            tracing::debug!(%word, id, "recorded lookup");

            Ok(LookupEvent {
                id,
                word: word.clone(),
                looked_up_at: at,
                looked_up_on: on,
                tag,
                mastered,
                learning,
                favorite,
            })
        })
    }

    /// Current state of a word, or `None` if it was never looked up.
    pub fn state(&self, word: &str) -> Result<Option<WordState>> {
        let word = normalize_word(word);
        Ok(self
            .store
            .conn()
            .query_row(
                "SELECT word, tag, mastered, learning, favorite FROM lookup_events
                 WHERE word = ?1 ORDER BY id DESC LIMIT 1",
                params![word],
                |r| {
                    Ok(WordState {
                        word: r.get(0)?,
                        tag: r.get(1)?,
                        mastered: r.get(2)?,
                        learning: r.get(3)?,
                        favorite: r.get(4)?,
                    })
                },
            )
            .optional()?)
    }

    /// Current state of a word; fails if it was never looked up.
    pub fn require_state(&self, word: &str) -> Result<WordState> {
        self.state(word)?
            .ok_or_else(|| WordstashError::NeverLookedUp(normalize_word(word)))
    }

    /// Every lookup of a word, oldest first.
    pub fn history(&self, word: &str) -> Result<Vec<LookupEvent>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM lookup_events WHERE word = ?1 ORDER BY id");
        let mut stmt = self.store.conn().prepare(&sql)?;
        let rows = stmt.query_map(params![normalize_word(word)], event_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// A single lookup row by id.
    pub fn event(&self, id: i64) -> Result<Option<LookupEvent>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM lookup_events WHERE id = ?1");
        Ok(self
            .store
            .conn()
            .query_row(&sql, params![id], event_from_row)
            .optional()?)
    }

    /// Distinct words in the ledger, sorted.
    pub fn words(&self) -> Result<Vec<String>> {
        self.query_words("SELECT DISTINCT word FROM lookup_events ORDER BY word", params![])
    }

    /// Words whose current state has `flag` set.
    pub fn words_with(&self, flag: StatusFlag) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT DISTINCT word FROM lookup_events WHERE {} = 1 ORDER BY word",
            flag.column()
        );
        self.query_words(&sql, params![])
    }

    /// Words whose current tag is `tag`.
    pub fn words_tagged(&self, tag: &str) -> Result<Vec<String>> {
        self.query_words(
            "SELECT DISTINCT word FROM lookup_events WHERE tag = ?1 ORDER BY word",
            params![tag.trim()],
        )
    }

    fn query_words(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<String>> {
        let mut stmt = self.store.conn().prepare(sql)?;
        let rows = stmt.query_map(params, |r| r.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<String>>>()?)
    }

    pub fn distinct_word_count(&self) -> Result<usize> {
        let n: i64 = self.store.conn().query_row(
            "SELECT COUNT(DISTINCT word) FROM lookup_events",
            [],
            |r| r.get(0),
        )?;
        Ok(n as usize)
    }

    /// Distinct calendar dates with at least one lookup, ascending.
    pub fn lookup_dates(&self) -> Result<Vec<NaiveDate>> {
        let mut stmt = self.store.conn().prepare(
            "SELECT DISTINCT looked_up_on FROM lookup_events ORDER BY looked_up_on",
        )?;
        let rows = stmt.query_map([], |r| r.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<NaiveDate>>>()?)
    }

    /// Earliest and latest lookup dates.
    pub fn date_range(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let (first, last): (Option<NaiveDate>, Option<NaiveDate>) = self.store.conn().query_row(
            "SELECT MIN(looked_up_on), MAX(looked_up_on) FROM lookup_events",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;
        Ok(first.zip(last))
    }

    pub fn summary(&self) -> Result<LedgerSummary> {
        Ok(LedgerSummary {
            distinct_words: self.distinct_word_count()?,
            lookups: self
                .store
                .conn()
                .query_row("SELECT COUNT(*) FROM lookup_events", [], |r| {
                    r.get::<_, i64>(0)
                })? as usize,
            learning: self.words_with(StatusFlag::Learning)?.len(),
            mastered: self.words_with(StatusFlag::Mastered)?.len(),
            favorite: self.words_with(StatusFlag::Favorite)?.len(),
        })
    }

    /// Longest run of consecutive lookup days.
    pub fn longest_streak(&self) -> Result<Streak> {
        longest_streak(&self.lookup_dates()?)
    }

    /// Project when the ledger will hold `target` distinct words.
    pub fn predict_milestone(&self, target: usize, today: NaiveDate) -> Result<MilestoneForecast> {
        let (first, _) = self.date_range()?.ok_or(WordstashError::NoWordsInDb)?;
        predict_milestone(target, self.distinct_word_count()?, first, today)
    }

    // ----- mutations -------------------------------------------------------

    /// Set the tag of a word on every row.
    pub fn set_tag(&self, word: &str, tag: &str) -> Result<WordState> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(WordstashError::InvalidInput("tag must not be empty".into()));
        }
        self.write_tag(word, Some(tag))
    }

    /// Remove the tag of a word on every row.
    pub fn clear_tag(&self, word: &str) -> Result<WordState> {
        self.write_tag(word, None)
    }

    fn write_tag(&self, word: &str, tag: Option<&str>) -> Result<WordState> {
        let state = self.require_state(word)?;
        self.store.transaction(|tx| {
            tx.execute(
                "UPDATE lookup_events SET tag = ?1 WHERE word = ?2",
                params![tag, state.word],
            )?;
            Ok(())
        })?;
        self.require_state(&state.word)
    }

    /// Delete every lookup of a word. Returns the number of rows removed.
    pub fn delete_word(&self, word: &str) -> Result<usize> {
        let word = normalize_word(word);
        let removed = self.store.transaction(|tx| {
            Ok(tx.execute("DELETE FROM lookup_events WHERE word = ?1", params![word])?)
        })?;
        if removed == 0 {
            return Err(WordstashError::NeverLookedUp(word));
        }
        tracing::info!(%word, removed, "deleted lookup history");
        Ok(removed)
    }

    /// Delete all lookup history. The definition cache is kept.
    pub fn clear_history(&self) -> Result<usize> {
        let removed = self
            .store
            .transaction(|tx| Ok(tx.execute("DELETE FROM lookup_events", [])?))?;
        tracing::info!(removed, "cleared lookup history");
        Ok(removed)
    }
}

/// Write one status flag on every row of `word`.
pub(crate) fn write_flag(conn: &Connection, word: &str, flag: StatusFlag, on: bool) -> Result<usize> {
    let sql = format!("UPDATE lookup_events SET {} = ?1 WHERE word = ?2", flag.column());
    Ok(conn.execute(&sql, params![on, word])?)
}

/// Timestamps are unique: an instant already taken moves forward one
/// microsecond at a time until it is free.
fn unique_timestamp(conn: &Connection, mut at: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let mut taken = conn.prepare_cached("SELECT 1 FROM lookup_events WHERE looked_up_at = ?1")?;
    while taken.exists(params![at])? {
        at += Duration::microseconds(1);
    }
    Ok(at)
}
