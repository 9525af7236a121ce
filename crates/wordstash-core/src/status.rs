//! Status lifecycle: learning, mastered, favorite.
//!
//! `learning` and `mastered` are mutually exclusive. Promoting to mastered
//! clears learning; demoting a mastered word to learning needs confirmation.
//! `favorite` is independent of both.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ledger::{write_flag, WordLedger};
use crate::model::{StatusFlag, WordState};
use crate::store::Store;
use crate::traits::Prompter;

/// Result of a status change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StatusOutcome {
    /// The flag changed. `cleared` names the flag that was turned off to
    /// keep learning and mastered exclusive.
    Changed {
        state: WordState,
        cleared: Option<StatusFlag>,
    },
    /// The flag already had the requested value; nothing was written.
    AlreadySet { state: WordState },
    /// The user declined a demotion; nothing was written.
    Declined { state: WordState },
}

impl StatusOutcome {
    pub fn state(&self) -> &WordState {
        match self {
            StatusOutcome::Changed { state, .. }
            | StatusOutcome::AlreadySet { state }
            | StatusOutcome::Declined { state } => state,
        }
    }

    pub fn changed(&self) -> bool {
        matches!(self, StatusOutcome::Changed { .. })
    }
}

/// Applies status transitions on top of the ledger.
pub struct StatusMachine<'a> {
    store: &'a Store,
    ledger: WordLedger<'a>,
}

impl<'a> StatusMachine<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            ledger: WordLedger::new(store),
        }
    }

    /// Turn `flag` on or off for `word`.
    ///
    /// Fails with `NeverLookedUp` before touching anything if the word has no
    /// history. All rows of the word change together or not at all.
    pub fn set_status(
        &self,
        word: &str,
        flag: StatusFlag,
        on: bool,
        prompter: &mut dyn Prompter,
    ) -> Result<StatusOutcome> {
        let state = self.ledger.require_state(word)?;
        if state.get(flag) == on {
            return Ok(StatusOutcome::AlreadySet { state });
        }

        let cleared = match (flag, on) {
            (StatusFlag::Mastered, true) if state.learning => Some(StatusFlag::Learning),
            (StatusFlag::Learning, true) if state.mastered => {
                let message = format!("'{}' is mastered. Move it back to learning?", state.word);
                if !prompter.confirm(&message) {
                    return Ok(StatusOutcome::Declined { state });
                }
                Some(StatusFlag::Mastered)
            }
            _ => None,
        };

        self.store.transaction(|tx| {
            if let Some(other) = cleared {
                write_flag(tx, &state.word, other, false)?;
            }
            write_flag(tx, &state.word, flag, on)?;
            Ok(())
        })?;

        let state = self.ledger.require_state(&state.word)?;
        tracing::info!(word = %state.word, %flag, on, ?cleared, "status changed");
        Ok(StatusOutcome::Changed { state, cleared })
    }

    /// Current state of a word, if it was ever looked up.
    pub fn state(&self, word: &str) -> Result<Option<WordState>> {
        self.ledger.state(word)
    }
}
