//! The `wordstash quiz` and `wordstash attempts` commands.

use std::path::Path;

use anyhow::Result;

use wordstash_core::cache::LookupCache;
use wordstash_core::model::PoolFilter;
use wordstash_core::quiz::{attempt_history, QuizEngine, QuizOutcome};
use wordstash_providers::create_source;

use super::Session;
use crate::prompt::ConsolePrompter;

pub async fn execute(
    config: Option<&Path>,
    filter: PoolFilter,
    questions: Option<usize>,
) -> Result<()> {
    let session = Session::open(config)?;
    let source = create_source(&session.config)?;
    let cache = LookupCache::new(&session.store, source.as_ref());
    let limit = questions.or(session.config.default_quiz_questions);

    let mut engine = QuizEngine::new(&session.store, &cache, rand::rng());
    let mut quiz = engine.prepare(filter, limit).await?;
    let mut prompter = ConsolePrompter::stdio();

    match engine.run(&mut quiz, &mut prompter)? {
        QuizOutcome::Completed(attempt) => {
            println!(
                "\nScore: {}/{} in {}s",
                attempt.points, attempt.question_count, attempt.duration_secs
            );
        }
        QuizOutcome::Abandoned { answered, score } => {
            println!("\nQuiz abandoned after {answered} question(s) ({score} correct). Nothing was recorded.");
        }
    }
    Ok(())
}

pub fn attempts(config: Option<&Path>, limit: usize) -> Result<()> {
    use comfy_table::{Cell, Table};

    let session = Session::open(config)?;
    let attempts = attempt_history(&session.store, limit)?;
    if attempts.is_empty() {
        println!("No quiz attempts yet. Run `wordstash quiz` to take one.");
        return Ok(());
    }

    let offset = session.store.utc_offset();
    let mut table = Table::new();
    table.set_header(vec!["Taken", "Pool", "Score", "Percent", "Time"]);

    for attempt in &attempts {
        let percent = if attempt.question_count == 0 {
            0.0
        } else {
            f64::from(attempt.points) / f64::from(attempt.question_count) * 100.0
        };
        table.add_row(vec![
            Cell::new(attempt.taken_at.with_timezone(&offset).format("%Y-%m-%d %H:%M")),
            Cell::new(&attempt.pool),
            Cell::new(format!("{}/{}", attempt.points, attempt.question_count)),
            Cell::new(format!("{percent:.0}%")),
            Cell::new(format!("{}s", attempt.duration_secs)),
        ]);
    }

    println!("{table}");
    Ok(())
}
