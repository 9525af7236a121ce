//! The `wordstash define` command.

use std::path::Path;

use anyhow::Result;

use wordstash_core::cache::LookupCache;
use wordstash_core::ledger::WordLedger;
use wordstash_core::model::{DefinitionPayload, WordState};
use wordstash_providers::create_source;

use super::Session;

pub async fn execute(config: Option<&Path>, word: &str, tag: Option<String>) -> Result<()> {
    let session = Session::open(config)?;
    let source = create_source(&session.config)?;
    let cache = LookupCache::new(&session.store, source.as_ref());

    // A failed fetch records nothing.
    let payload = cache.get_or_fetch(word).await?;
    let ledger = WordLedger::new(&session.store);
    let event = ledger.record_lookup(word, tag.as_deref())?;

    print_definition(&event.word, &payload);
    if let Some(state) = ledger.state(&event.word)? {
        print_state(&state);
    }
    Ok(())
}

fn print_definition(word: &str, payload: &DefinitionPayload) {
    match payload.phonetic() {
        Some(phonetic) => println!("{word}  {phonetic}"),
        None => println!("{word}"),
    }

    for meaning in payload.meanings() {
        println!("\n  {}", meaning.part_of_speech);
        for (i, definition) in meaning.definitions.iter().enumerate() {
            println!("    {}. {}", i + 1, definition.definition);
            if let Some(example) = &definition.example {
                println!("       \"{example}\"");
            }
        }
        if !meaning.synonyms.is_empty() {
            println!("    synonyms: {}", meaning.synonyms.join(", "));
        }
        if !meaning.antonyms.is_empty() {
            println!("    antonyms: {}", meaning.antonyms.join(", "));
        }
    }
}

pub(crate) fn print_state(state: &WordState) {
    let mut flags = Vec::new();
    if state.learning {
        flags.push("learning");
    }
    if state.mastered {
        flags.push("mastered");
    }
    if state.favorite {
        flags.push("favorite");
    }
    let tag = state
        .tag
        .as_deref()
        .map(|t| format!(" [tag: {t}]"))
        .unwrap_or_default();
    if flags.is_empty() {
        println!("\n{}{tag}", state.word);
    } else {
        println!("\n{} ({}){tag}", state.word, flags.join(", "));
    }
}
