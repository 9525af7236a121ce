//! Error types.
//!
//! `FetchError` is what a definition source reports; `WordstashError` is the
//! structured outcome every core operation returns to its caller.

use thiserror::Error;

/// Errors that can occur when fetching a definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The dictionary has no definition for the word.
    #[error("no definition found for '{0}'")]
    NotFound(String),

    /// The dictionary could not be reached.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The dictionary answered, but not with a definition payload.
    #[error("invalid definition payload: {0}")]
    InvalidPayload(String),
}

/// Errors returned by wordstash operations.
#[derive(Debug, Error)]
pub enum WordstashError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A status or tag change was requested for a word with no lookup history.
    #[error("'{0}' has never been looked up")]
    NeverLookedUp(String),

    /// A refresh was requested for a word with no cache entry.
    #[error("'{0}' has no cached definition to refresh")]
    NotCached(String),

    /// A filtered view has no members.
    #[error("no words match {0}")]
    EmptyPool(String),

    /// Too few words to build a quiz.
    #[error("not enough words for a quiz: found {found}, need at least {required}")]
    NotEnoughWords { found: usize, required: usize },

    /// The ledger is empty.
    #[error("no words in the database yet")]
    NoWordsInDb,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WordstashError {
    /// Returns `true` for transport failures the user may simply retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            WordstashError::Fetch(FetchError::NetworkUnavailable(_) | FetchError::Timeout(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, WordstashError>;
