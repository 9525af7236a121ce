//! Core data model types for wordstash.
//!
//! These are the types every component shares: the definition payload
//! returned by a definition source, lookup events, the derived per-word
//! state, pool filters, and quiz attempts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WordstashError;

/// Normalize a word at the boundary: trimmed and lowercased.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Definition payload
// ---------------------------------------------------------------------------

/// The raw definition response for a word, as returned by the dictionary.
///
/// The dictionary answers with a list of entries (one per etymology), each
/// carrying phonetics and meanings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionPayload {
    pub entries: Vec<DictionaryEntry>,
}

/// One dictionary entry for a word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

/// Pronunciation text and an optional audio URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phonetic {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

/// One sense group: a part of speech with its definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

/// A single definition with an optional usage example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
}

impl DefinitionPayload {
    /// The first sense's first definition text.
    ///
    /// Only this definition is ever used as quiz ground truth.
    pub fn first_definition(&self) -> Option<&str> {
        self.entries
            .iter()
            .flat_map(|e| e.meanings.first())
            .flat_map(|m| m.definitions.first())
            .map(|d| d.definition.as_str())
            .next()
    }

    /// The first phonetic text found, preferring the entry-level field.
    pub fn phonetic(&self) -> Option<&str> {
        self.entries.iter().find_map(|e| {
            e.phonetic
                .as_deref()
                .or_else(|| e.phonetics.iter().find_map(|p| p.text.as_deref()))
        })
    }

    /// All meanings across all entries, in order.
    pub fn meanings(&self) -> impl Iterator<Item = &Meaning> {
        self.entries.iter().flat_map(|e| e.meanings.iter())
    }
}

// ---------------------------------------------------------------------------
// Ledger types
// ---------------------------------------------------------------------------

/// One row of lookup history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupEvent {
    pub id: i64,
    pub word: String,
    pub looked_up_at: DateTime<Utc>,
    /// Calendar date of the lookup, fixed at ingestion.
    pub looked_up_on: NaiveDate,
    pub tag: Option<String>,
    pub mastered: bool,
    pub learning: bool,
    pub favorite: bool,
}

/// The current status of a word: whatever the most recent mutation set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordState {
    pub word: String,
    pub tag: Option<String>,
    pub mastered: bool,
    pub learning: bool,
    pub favorite: bool,
}

impl WordState {
    pub fn get(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::Learning => self.learning,
            StatusFlag::Mastered => self.mastered,
            StatusFlag::Favorite => self.favorite,
        }
    }
}

/// A mutable per-word status flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFlag {
    Learning,
    Mastered,
    Favorite,
}

impl StatusFlag {
    /// Column name in the lookup-events table.
    pub(crate) fn column(self) -> &'static str {
        match self {
            StatusFlag::Learning => "learning",
            StatusFlag::Mastered => "mastered",
            StatusFlag::Favorite => "favorite",
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for StatusFlag {
    type Err = WordstashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "learning" => Ok(StatusFlag::Learning),
            "mastered" => Ok(StatusFlag::Mastered),
            "favorite" | "favourite" => Ok(StatusFlag::Favorite),
            other => Err(WordstashError::InvalidInput(format!(
                "unknown status: {other}"
            ))),
        }
    }
}

/// Aggregate counts over the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub distinct_words: usize,
    pub lookups: usize,
    pub learning: usize,
    pub mastered: usize,
    pub favorite: usize,
}

// ---------------------------------------------------------------------------
// Pools and quizzes
// ---------------------------------------------------------------------------

/// Which words are eligible for a quiz or revision session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PoolFilter {
    All,
    Tag(String),
    Collection(String),
    Status(StatusFlag),
}

impl PoolFilter {
    /// A collection filter; collection names are matched case-insensitively.
    pub fn collection(name: &str) -> Self {
        PoolFilter::Collection(normalize_word(name))
    }

    /// The same filter with its collection name normalized, so that one
    /// collection always yields one descriptor.
    pub fn normalized(self) -> Self {
        match self {
            PoolFilter::Collection(name) => PoolFilter::collection(&name),
            other => other,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, PoolFilter::Collection(_))
    }
}

impl fmt::Display for PoolFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolFilter::All => write!(f, "all"),
            PoolFilter::Tag(t) => write!(f, "tag:{t}"),
            PoolFilter::Collection(c) => write!(f, "collection:{c}"),
            PoolFilter::Status(s) => write!(f, "status:{s}"),
        }
    }
}

impl FromStr for PoolFilter {
    type Err = WordstashError;

    /// Parse the descriptor form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(PoolFilter::All);
        }
        let invalid = || WordstashError::InvalidInput(format!("invalid pool descriptor: {s}"));
        let (kind, value) = s.split_once(':').ok_or_else(invalid)?;
        if value.is_empty() {
            return Err(invalid());
        }
        match kind {
            "tag" => Ok(PoolFilter::Tag(value.to_string())),
            "collection" => Ok(PoolFilter::collection(value)),
            "status" => Ok(PoolFilter::Status(value.parse()?)),
            _ => Err(invalid()),
        }
    }
}

/// A persisted record of one completed quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: i64,
    /// Descriptor of the pool filter (see `PoolFilter`'s `Display`).
    pub pool: String,
    pub taken_at: DateTime<Utc>,
    pub question_count: u32,
    pub points: u32,
    pub duration_secs: u64,
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub word: String,
    /// Exactly four options, shuffled.
    pub options: Vec<String>,
    pub correct_definition: String,
}

impl Question {
    /// Index of the correct option.
    pub fn correct_index(&self) -> Option<usize> {
        self.options
            .iter()
            .position(|o| *o == self.correct_definition)
    }

    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.correct_definition
    }
}
