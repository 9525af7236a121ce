//! The `wordstash refresh` command.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use wordstash_core::cache::LookupCache;
use wordstash_core::traits::Prompter;
use wordstash_providers::create_source;

use super::Session;
use crate::prompt::ConsolePrompter;

/// Refreshing more than this many words asks for confirmation.
const CONFIRM_ABOVE: usize = 10;

pub async fn execute(config: Option<&Path>, words: Vec<String>, all: bool, yes: bool) -> Result<()> {
    let session = Session::open(config)?;
    let source = create_source(&session.config)?;
    let cache = LookupCache::new(&session.store, source.as_ref());

    let words = if all { cache.cached_words()? } else { words };
    if words.is_empty() {
        println!("Nothing to refresh.");
        return Ok(());
    }

    let pause = Duration::from_millis(session.config.refresh_pause_ms);
    if words.len() > CONFIRM_ABOVE && !yes {
        let message = format!(
            "Re-fetch {} definitions ({}ms apart)?",
            words.len(),
            pause.as_millis()
        );
        if !ConsolePrompter::stdio().confirm(&message) {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let report = cache.refresh_many(&words, pause).await;
    println!("Refreshed {} definition(s).", report.refreshed.len());
    for (word, error) in &report.failed {
        eprintln!("  {word}: {error}");
    }
    if !report.failed.is_empty() {
        anyhow::bail!("{} refresh(es) failed", report.failed.len());
    }
    Ok(())
}
