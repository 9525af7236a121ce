//! The `wordstash revise` command.

use std::path::Path;

use anyhow::Result;

use wordstash_core::cache::LookupCache;
use wordstash_core::model::PoolFilter;
use wordstash_core::revision::RevisionEngine;
use wordstash_providers::create_source;

use super::Session;
use crate::prompt::ConsolePrompter;

pub async fn execute(config: Option<&Path>, filter: PoolFilter) -> Result<()> {
    let session = Session::open(config)?;
    let source = create_source(&session.config)?;
    let cache = LookupCache::new(&session.store, source.as_ref());

    let mut engine = RevisionEngine::new(&session.store, &cache, rand::rng());
    let revision = engine.prepare(filter).await?;
    let mut prompter = ConsolePrompter::stdio();
    let summary = engine.run(&revision, &mut prompter)?;

    println!(
        "\nReviewed {} word(s): {} moved to learning, {} mastered.",
        summary.reviewed, summary.marked_learning, summary.marked_mastered
    );
    if summary.stopped_early {
        println!("Stopped early.");
    }
    Ok(())
}
