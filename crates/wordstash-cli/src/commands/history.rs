//! The `wordstash history|delete|clear` commands.

use std::path::Path;

use anyhow::Result;

use wordstash_core::ledger::WordLedger;
use wordstash_core::model::normalize_word;

use super::Session;

pub fn execute(config: Option<&Path>, word: &str) -> Result<()> {
    let session = Session::open(config)?;
    let ledger = WordLedger::new(&session.store);

    let state = ledger.require_state(word)?;
    let events = ledger.history(&state.word)?;
    let offset = session.store.utc_offset();

    println!("{} looked up {} time(s):", state.word, events.len());
    for event in &events {
        println!(
            "  {}  ({})",
            event.looked_up_at.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S"),
            event.looked_up_on
        );
    }
    super::define::print_state(&state);
    Ok(())
}

pub fn delete(config: Option<&Path>, word: &str) -> Result<()> {
    let session = Session::open(config)?;
    let removed = WordLedger::new(&session.store).delete_word(word)?;
    println!("Deleted {removed} lookup(s) of '{}'.", normalize_word(word));
    Ok(())
}

pub fn clear(config: Option<&Path>, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("refusing to delete all history without --yes");
    }
    let session = Session::open(config)?;
    let removed = WordLedger::new(&session.store).clear_history()?;
    println!("Deleted {removed} lookup(s). Cached definitions were kept.");
    Ok(())
}
