//! Interactive revision: walk a pool and promote words through the status
//! lifecycle. Unlike a quiz, a revision session is never scored or recorded.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cache::LookupCache;
use crate::error::{Result, WordstashError};
use crate::model::{PoolFilter, StatusFlag};
use crate::pool::build_pool;
use crate::status::StatusMachine;
use crate::store::Store;
use crate::traits::Prompter;

/// A word and the definition shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionCard {
    pub word: String,
    pub definition: String,
}

/// A prepared revision walkthrough.
#[derive(Debug, Clone)]
pub struct RevisionSession {
    filter: PoolFilter,
    cards: Vec<RevisionCard>,
}

impl RevisionSession {
    pub fn filter(&self) -> &PoolFilter {
        &self.filter
    }

    pub fn cards(&self) -> &[RevisionCard] {
        &self.cards
    }
}

/// What happened during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionSummary {
    pub reviewed: usize,
    pub marked_learning: usize,
    pub marked_mastered: usize,
    pub stopped_early: bool,
}

pub struct RevisionEngine<'a, R> {
    store: &'a Store,
    cache: &'a LookupCache<'a>,
    rng: R,
}

impl<'a, R: Rng> RevisionEngine<'a, R> {
    pub fn new(store: &'a Store, cache: &'a LookupCache<'a>, rng: R) -> Self {
        Self { store, cache, rng }
    }

    /// Shuffle the pool and resolve each word's first definition.
    ///
    /// Words without definition text are left out.
    pub async fn prepare(&mut self, filter: PoolFilter) -> Result<RevisionSession> {
        let filter = filter.normalized();
        let mut pool = build_pool(self.store, &filter)?;
        pool.shuffle(&mut self.rng);

        let mut cards = Vec::with_capacity(pool.len());
        for word in pool {
            let payload = self.cache.get_or_fetch(&word).await?;
            match payload.first_definition() {
                Some(text) => {
                    let definition = text.to_string();
                    cards.push(RevisionCard { word, definition });
                }
                None => tracing::warn!(%word, "no definition text, skipping revision card"),
            }
        }

        if cards.is_empty() {
            return Err(WordstashError::EmptyPool(filter.to_string()));
        }
        Ok(RevisionSession { filter, cards })
    }

    /// Walk the session card by card.
    ///
    /// In a collection pool a word not yet learning is offered for learning.
    /// Otherwise a word not yet mastered is offered for mastery. A word with
    /// nothing left to offer asks whether to keep going; "no" ends the session.
    pub fn run(
        &self,
        session: &RevisionSession,
        prompter: &mut dyn Prompter,
    ) -> Result<RevisionSummary> {
        let machine = StatusMachine::new(self.store);
        let in_collection = session.filter.is_collection();
        let mut summary = RevisionSummary::default();

        for card in &session.cards {
            prompter.show(&card.word, &card.definition);
            summary.reviewed += 1;

            let Some(state) = machine.state(&card.word)? else {
                return Err(WordstashError::NeverLookedUp(card.word.clone()));
            };

            if in_collection && !state.learning {
                let question = format!("Add '{}' to your learning list?", card.word);
                if prompter.confirm(&question)
                    && machine
                        .set_status(&card.word, StatusFlag::Learning, true, prompter)?
                        .changed()
                {
                    summary.marked_learning += 1;
                }
            } else if !state.mastered {
                let question = format!("Mark '{}' as mastered?", card.word);
                if prompter.confirm(&question)
                    && machine
                        .set_status(&card.word, StatusFlag::Mastered, true, prompter)?
                        .changed()
                {
                    summary.marked_mastered += 1;
                }
            } else if !prompter.confirm("Keep revising?") {
                summary.stopped_early = true;
                break;
            }
        }

        tracing::info!(
            pool = %session.filter,
            reviewed = summary.reviewed,
            learning = summary.marked_learning,
            mastered = summary.marked_mastered,
            stopped_early = summary.stopped_early,
            "revision finished"
        );
        Ok(summary)
    }
}
