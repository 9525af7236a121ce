//! wordstash CLI, the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use wordstash_core::model::{PoolFilter, StatusFlag};

mod commands;
mod prompt;

#[derive(Parser)]
#[command(name = "wordstash", version, about = "Personal vocabulary tracker")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Pool selection shared by `quiz` and `revise`.
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct PoolArgs {
    /// Only words carrying this tag
    #[arg(long)]
    tag: Option<String>,

    /// Only looked-up words from this collection
    #[arg(long)]
    collection: Option<String>,

    /// Only words with this status: learning, mastered, favorite
    #[arg(long)]
    status: Option<StatusFlag>,
}

impl PoolArgs {
    pub fn filter(self) -> PoolFilter {
        match (self.tag, self.collection, self.status) {
            (Some(tag), _, _) => PoolFilter::Tag(tag),
            (_, Some(collection), _) => PoolFilter::collection(&collection),
            (_, _, Some(flag)) => PoolFilter::Status(flag),
            _ => PoolFilter::All,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a word and record the lookup
    Define {
        word: String,

        /// Tag to attach (replaces any earlier tag)
        #[arg(long)]
        tag: Option<String>,
    },

    /// Mark a word as learning
    Learning {
        word: String,

        /// Remove the flag instead
        #[arg(long)]
        remove: bool,
    },

    /// Mark a word as mastered
    Mastered {
        word: String,

        /// Remove the flag instead
        #[arg(long)]
        remove: bool,
    },

    /// Mark a word as a favorite
    Favorite {
        word: String,

        /// Remove the flag instead
        #[arg(long)]
        remove: bool,
    },

    /// Set a word's tag
    Tag { word: String, tag: String },

    /// Remove a word's tag
    Untag { word: String },

    /// Show every lookup of a word
    History { word: String },

    /// Longest run of consecutive lookup days
    Streak,

    /// Predict when you will reach a distinct-word count
    Milestone { target: usize },

    /// Multiple-choice quiz on saved words
    Quiz {
        #[command(flatten)]
        pool: PoolArgs,

        /// Number of questions
        #[arg(short = 'n', long)]
        questions: Option<usize>,
    },

    /// Walk through saved words and promote them
    Revise {
        #[command(flatten)]
        pool: PoolArgs,
    },

    /// Show recent quiz attempts
    Attempts {
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Re-fetch cached definitions
    Refresh {
        /// Words to refresh
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        words: Vec<String>,

        /// Refresh every cached definition
        #[arg(long)]
        all: bool,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Delete a word's lookup history
    Delete { word: String },

    /// Delete all lookup history
    Clear {
        /// Required to confirm
        #[arg(long)]
        yes: bool,
    },

    /// Import collections from a JSON file ({"name": ["word", ...]})
    ImportCollections { file: PathBuf },

    /// Summary counts
    Stats,

    /// Create a starter config file
    Init,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wordstash=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Define { word, tag } => commands::define::execute(config, &word, tag).await,
        Commands::Learning { word, remove } => {
            commands::status::execute(config, &word, StatusFlag::Learning, !remove)
        }
        Commands::Mastered { word, remove } => {
            commands::status::execute(config, &word, StatusFlag::Mastered, !remove)
        }
        Commands::Favorite { word, remove } => {
            commands::status::execute(config, &word, StatusFlag::Favorite, !remove)
        }
        Commands::Tag { word, tag } => commands::status::tag(config, &word, Some(&tag)),
        Commands::Untag { word } => commands::status::tag(config, &word, None),
        Commands::History { word } => commands::history::execute(config, &word),
        Commands::Streak => commands::stats::streak(config),
        Commands::Milestone { target } => commands::stats::milestone(config, target),
        Commands::Quiz { pool, questions } => {
            commands::quiz::execute(config, pool.filter(), questions).await
        }
        Commands::Revise { pool } => commands::revise::execute(config, pool.filter()).await,
        Commands::Attempts { limit } => commands::quiz::attempts(config, limit),
        Commands::Refresh { words, all, yes } => {
            commands::refresh::execute(config, words, all, yes).await
        }
        Commands::Delete { word } => commands::history::delete(config, &word),
        Commands::Clear { yes } => commands::history::clear(config, yes),
        Commands::ImportCollections { file } => commands::collections::import(config, &file),
        Commands::Stats => commands::stats::summary(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
