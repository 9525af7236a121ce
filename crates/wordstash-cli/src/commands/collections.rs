//! The `wordstash import-collections` command.

use std::path::Path;

use anyhow::{Context, Result};

use super::Session;

pub fn import(config: Option<&Path>, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read collections file: {}", file.display()))?;

    let session = Session::open(config)?;
    let added = session.store.import_collections(&json)?;
    println!("Imported {added} new collection entries.");

    for info in session.store.collections()? {
        println!("  {:<16} {:>5} words", info.name, info.word_count);
    }
    Ok(())
}
