//! Collaborator traits.
//!
//! `DefinitionSource` is implemented by `wordstash-providers`; `Prompter` is
//! implemented by whatever front-end drives interactive sessions.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::Question;

// ---------------------------------------------------------------------------
// Definition source
// ---------------------------------------------------------------------------

/// An external dictionary.
///
/// One call is one request attempt. Implementations never retry.
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    /// Human-readable source name (e.g. "dictionaryapi").
    fn name(&self) -> &str;

    /// Fetch the raw definition response body for a word.
    async fn fetch(&self, word: &str) -> Result<String, FetchError>;
}

// ---------------------------------------------------------------------------
// Interactive prompts
// ---------------------------------------------------------------------------

/// An answer to a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAnswer {
    /// Index into `Question::options`.
    Choice(usize),
    /// Abandon the quiz. Nothing is persisted.
    Quit,
}

/// The user on the other side of an interactive session.
///
/// A `false` from `confirm` is an ordinary answer, never an error.
pub trait Prompter {
    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;

    /// Present a question and collect an answer.
    fn ask(&mut self, index: usize, total: usize, question: &Question) -> QuizAnswer;

    /// Show a word and its definition during revision.
    fn show(&mut self, word: &str, definition: &str);

    /// Feedback after an answer is scored.
    fn feedback(&mut self, _question: &Question, _correct: bool) {}
}

/// A prompter that replays scripted answers. Useful for tests and
/// non-interactive front-ends.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    confirms: std::collections::VecDeque<bool>,
    answers: std::collections::VecDeque<QuizAnswer>,
    /// Every message passed to `confirm`, in order.
    pub confirm_log: Vec<String>,
    /// Every word passed to `show`, in order.
    pub shown: Vec<String>,
    /// When true, `ask` answers with the correct option once the script runs out.
    pub answer_correctly: bool,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue confirmation answers.
    pub fn with_confirms(mut self, confirms: impl IntoIterator<Item = bool>) -> Self {
        self.confirms.extend(confirms);
        self
    }

    /// Queue quiz answers.
    pub fn with_answers(mut self, answers: impl IntoIterator<Item = QuizAnswer>) -> Self {
        self.answers.extend(answers);
        self
    }

    /// Answer every unscripted question correctly.
    pub fn always_correct(mut self) -> Self {
        self.answer_correctly = true;
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, message: &str) -> bool {
        self.confirm_log.push(message.to_string());
        self.confirms.pop_front().unwrap_or(false)
    }

    fn ask(&mut self, _index: usize, _total: usize, question: &Question) -> QuizAnswer {
        if let Some(answer) = self.answers.pop_front() {
            return answer;
        }
        if self.answer_correctly {
            if let Some(i) = question.correct_index() {
                return QuizAnswer::Choice(i);
            }
        }
        QuizAnswer::Choice(0)
    }

    fn show(&mut self, word: &str, _definition: &str) {
        self.shown.push(word.to_string());
    }
}
