//! Mock definition source for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use wordstash_core::error::FetchError;
use wordstash_core::traits::DefinitionSource;

/// A definition source that serves canned definitions without any network.
///
/// Words with no canned entry are not found.
#[derive(Default)]
pub struct MockSource {
    /// Map of word → response.
    responses: HashMap<String, Result<String, FetchError>>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last word requested.
    last_word: Mutex<Option<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a single-sense definition for `word`.
    pub fn with_definition(mut self, word: &str, definition: &str) -> Self {
        self.responses
            .insert(word.to_string(), Ok(definition_body(word, definition)));
        self
    }

    /// Fail every fetch of `word` with `error`.
    pub fn with_failure(mut self, word: &str, error: FetchError) -> Self {
        self.responses.insert(word.to_string(), Err(error));
        self
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last word requested from this source.
    pub fn last_word(&self) -> Option<String> {
        self.last_word
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

/// A dictionary response body with one entry, one meaning, and one definition.
pub fn definition_body(word: &str, definition: &str) -> String {
    serde_json::json!([{
        "word": word,
        "phonetics": [],
        "meanings": [{
            "partOfSpeech": "noun",
            "definitions": [{"definition": definition}],
            "synonyms": [],
            "antonyms": []
        }]
    }])
    .to_string()
}

#[async_trait]
impl DefinitionSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, word: &str) -> Result<String, FetchError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_word.lock() {
            *last = Some(word.to_string());
        }

        self.responses
            .get(word)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::NotFound(word.to_string())))
    }
}
