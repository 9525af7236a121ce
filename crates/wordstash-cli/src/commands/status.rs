//! The `wordstash learning|mastered|favorite|tag|untag` commands.

use std::path::Path;

use anyhow::Result;

use wordstash_core::ledger::WordLedger;
use wordstash_core::model::StatusFlag;
use wordstash_core::status::{StatusMachine, StatusOutcome};

use super::define::print_state;
use super::Session;
use crate::prompt::ConsolePrompter;

pub fn execute(config: Option<&Path>, word: &str, flag: StatusFlag, on: bool) -> Result<()> {
    let session = Session::open(config)?;
    let machine = StatusMachine::new(&session.store);
    let mut prompter = ConsolePrompter::stdio();

    let outcome = machine.set_status(word, flag, on, &mut prompter)?;
    match &outcome {
        StatusOutcome::Changed { state, cleared } => {
            let verb = if on { "is now" } else { "is no longer" };
            println!("'{}' {verb} {flag}.", state.word);
            if let Some(cleared) = cleared {
                println!("Removed {cleared} status.");
            }
        }
        StatusOutcome::AlreadySet { state } => {
            let already = if on { "already" } else { "not" };
            println!("'{}' is {already} {flag}.", state.word);
        }
        StatusOutcome::Declined { state } => {
            println!("Left '{}' unchanged.", state.word);
        }
    }
    Ok(())
}

/// Set the tag, or clear it when `tag` is `None`.
pub fn tag(config: Option<&Path>, word: &str, tag: Option<&str>) -> Result<()> {
    let session = Session::open(config)?;
    let ledger = WordLedger::new(&session.store);

    let state = match tag {
        Some(tag) => ledger.set_tag(word, tag)?,
        None => ledger.clear_tag(word)?,
    };
    print_state(&state);
    Ok(())
}
