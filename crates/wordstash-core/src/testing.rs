//! Test doubles shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::cache::LookupCache;
use crate::error::FetchError;
use crate::ledger::WordLedger;
use crate::store::Store;
use crate::traits::DefinitionSource;

/// Dictionary response body with a single first-sense definition.
pub(crate) fn body(word: &str, definition: &str) -> String {
    serde_json::json!([{
        "word": word,
        "meanings": [{"partOfSpeech": "noun",
                      "definitions": [{"definition": definition}]}]
    }])
    .to_string()
}

/// Counts calls and replays per-word responses. The last queued response
/// for a word repeats; unknown words are not found.
#[derive(Default)]
pub(crate) struct SpySource {
    calls: AtomicU32,
    responses: Mutex<HashMap<String, VecDeque<Result<String, FetchError>>>>,
}

impl SpySource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_definition(self, word: &str, definition: &str) -> Self {
        self.with_response(word, Ok(body(word, definition)))
    }

    pub(crate) fn with_response(self, word: &str, response: Result<String, FetchError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(word.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DefinitionSource for SpySource {
    fn name(&self) -> &str {
        "spy"
    }

    async fn fetch(&self, word: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(word) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(FetchError::NotFound(word.to_string())),
        }
    }
}

/// Look up each word once (caching its definition) with an optional tag.
pub(crate) async fn look_up_all(
    store: &Store,
    source: &SpySource,
    words: &[(&str, Option<&str>)],
) {
    let cache = LookupCache::new(store, source);
    let ledger = WordLedger::new(store);
    for (word, tag) in words {
        cache.get_or_fetch(word).await.unwrap();
        ledger.record_lookup(word, *tag).unwrap();
    }
}
