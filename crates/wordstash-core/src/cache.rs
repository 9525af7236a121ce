//! Local cache of raw dictionary responses.
//!
//! A cached word never triggers an external fetch. Failed fetches are not
//! cached, so a word without a definition today can gain one later. Entries
//! never expire; `refresh` and `refresh_many` are the only ways to re-fetch.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::error::{FetchError, Result, WordstashError};
use crate::model::{normalize_word, DefinitionPayload};
use crate::store::Store;
use crate::traits::DefinitionSource;

/// Per-word results of a bulk refresh.
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub refreshed: Vec<String>,
    pub failed: Vec<(String, WordstashError)>,
}

/// Word → definition cache sitting in front of a `DefinitionSource`.
pub struct LookupCache<'a> {
    store: &'a Store,
    source: &'a dyn DefinitionSource,
}

impl<'a> LookupCache<'a> {
    pub fn new(store: &'a Store, source: &'a dyn DefinitionSource) -> Self {
        Self { store, source }
    }

    /// Return the cached definition, fetching and caching it on a miss.
    pub async fn get_or_fetch(&self, word: &str) -> Result<DefinitionPayload> {
        let word = normalize_word(word);
        if word.is_empty() {
            return Err(WordstashError::InvalidInput("word must not be empty".into()));
        }
        if let Some(payload) = self.cached(&word)? {
            tracing::debug!(%word, "definition cache hit");
            return Ok(payload);
        }
        tracing::debug!(%word, source = self.source.name(), "definition cache miss");
        self.fetch_and_store(&word).await
    }

    /// Re-fetch a cached word and overwrite its entry.
    ///
    /// Only existing entries are refreshed; a word that was never cached is
    /// `NotCached` and triggers no fetch. On failure the old entry stays.
    pub async fn refresh(&self, word: &str) -> Result<DefinitionPayload> {
        let word = normalize_word(word);
        if word.is_empty() {
            return Err(WordstashError::InvalidInput("word must not be empty".into()));
        }
        if !self.is_cached(&word)? {
            return Err(WordstashError::NotCached(word));
        }
        self.fetch_and_store(&word).await
    }

    /// Refresh many words one at a time, pausing between requests.
    ///
    /// This is a maintenance path; callers should confirm before running it
    /// over a large set. A failure is recorded and the batch continues.
    pub async fn refresh_many(&self, words: &[String], pause: Duration) -> RefreshReport {
        let mut report = RefreshReport::default();
        for (i, word) in words.iter().enumerate() {
            if i > 0 && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
            match self.refresh(word).await {
                Ok(_) => report.refreshed.push(normalize_word(word)),
                Err(e) => {
                    tracing::warn!(%word, error = %e, "refresh failed");
                    report.failed.push((normalize_word(word), e));
                }
            }
        }
        report
    }

    /// Cached definition without any fetch.
    pub fn cached(&self, word: &str) -> Result<Option<DefinitionPayload>> {
        let raw: Option<String> = self
            .store
            .conn()
            .query_row(
                "SELECT payload FROM definition_cache WHERE word = ?1",
                params![normalize_word(word)],
                |r| r.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn is_cached(&self, word: &str) -> Result<bool> {
        Ok(self
            .store
            .conn()
            .prepare_cached("SELECT 1 FROM definition_cache WHERE word = ?1")?
            .exists(params![word])?)
    }

    /// Every cached word, sorted.
    pub fn cached_words(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .store
            .conn()
            .prepare("SELECT word FROM definition_cache ORDER BY word")?;
        let rows = stmt.query_map([], |r| r.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<String>>>()?)
    }

    /// First definitions of the given words, from the cache only.
    ///
    /// Words that are not cached, or whose payload has no definition, are absent.
    pub fn cached_first_definitions(&self, words: &[String]) -> Result<HashMap<String, String>> {
        let mut definitions = HashMap::with_capacity(words.len());
        for word in words {
            if let Some(text) = self
                .cached(word)?
                .as_ref()
                .and_then(DefinitionPayload::first_definition)
            {
                definitions.insert(word.clone(), text.to_string());
            }
        }
        Ok(definitions)
    }

    async fn fetch_and_store(&self, word: &str) -> Result<DefinitionPayload> {
        let raw = self.source.fetch(word).await?;
        let payload: DefinitionPayload = serde_json::from_str(&raw)
            .map_err(|e| FetchError::InvalidPayload(format!("{word}: {e}")))?;
        if payload.entries.is_empty() {
            return Err(FetchError::NotFound(word.to_string()).into());
        }
        self.store.conn().execute(
            "INSERT INTO definition_cache (word, payload, fetched_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(word) DO UPDATE SET payload = excluded.payload,
                                             fetched_at = excluded.fetched_at",
            params![word, raw, Utc::now()],
        )?;
        tracing::debug!(%word, "cached definition");
        Ok(payload)
    }
}
