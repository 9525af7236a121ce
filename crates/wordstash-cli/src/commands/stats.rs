//! The `wordstash streak|milestone|stats` commands.

use std::path::Path;

use anyhow::Result;

use wordstash_core::ledger::WordLedger;
use wordstash_core::statistics::MilestoneForecast;

use super::Session;

pub fn streak(config: Option<&Path>) -> Result<()> {
    let session = Session::open(config)?;
    let streak = WordLedger::new(&session.store).longest_streak()?;
    println!(
        "Longest streak: {} day(s), {} to {}",
        streak.length_days, streak.start, streak.end
    );
    Ok(())
}

pub fn milestone(config: Option<&Path>, target: usize) -> Result<()> {
    let session = Session::open(config)?;
    let forecast = WordLedger::new(&session.store).predict_milestone(target, session.today())?;

    match forecast {
        MilestoneForecast::Reached { current, target } => {
            println!("Milestone reached: {current} words (target {target}).");
        }
        MilestoneForecast::InsufficientHistory => {
            println!("Not enough history to predict yet. Come back tomorrow.");
        }
        MilestoneForecast::Predicted {
            date,
            days_remaining,
            words_per_day,
        } => {
            println!(
                "At {words_per_day:.2} words/day you will reach {target} words on {date} \
                 ({days_remaining} day(s) from now)."
            );
            println!("This assumes your average rate so far stays constant.");
        }
        MilestoneForecast::BeyondHorizon {
            target,
            words_per_day,
        } => {
            println!(
                "At {words_per_day:.2} words/day, {target} words is too far off to put a date on."
            );
        }
    }
    Ok(())
}

pub fn summary(config: Option<&Path>) -> Result<()> {
    let session = Session::open(config)?;
    let ledger = WordLedger::new(&session.store);
    let summary = ledger.summary()?;

    println!("Words:     {}", summary.distinct_words);
    println!("Lookups:   {}", summary.lookups);
    println!("Learning:  {}", summary.learning);
    println!("Mastered:  {}", summary.mastered);
    println!("Favorites: {}", summary.favorite);
    if let Some((first, last)) = ledger.date_range()? {
        println!("Active:    {first} to {last}");
    }
    Ok(())
}
