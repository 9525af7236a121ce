//! The `wordstash init` command.

use anyhow::Result;

use wordstash_providers::config::SAMPLE_CONFIG;

pub fn execute() -> Result<()> {
    if std::path::Path::new("wordstash.toml").exists() {
        println!("wordstash.toml already exists, skipping.");
    } else {
        std::fs::write("wordstash.toml", SAMPLE_CONFIG)?;
        println!("Created wordstash.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit wordstash.toml if you want a different database or dictionary");
    println!("  2. Run: wordstash define serene --tag calm");
    println!("  3. Once you have four words, run: wordstash quiz");

    Ok(())
}
