//! Streak and milestone statistics over lookup dates.

use chrono::{Days, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WordstashError};

/// A run of consecutive lookup days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Inclusive day count.
    pub length_days: u32,
}

/// Longest run of consecutive calendar days.
///
/// Input need not be sorted or distinct. Ties resolve to the earliest run.
pub fn longest_streak(dates: &[NaiveDate]) -> Result<Streak> {
    let mut days = dates.to_vec();
    days.sort_unstable();
    days.dedup();

    let (&first, rest) = days.split_first().ok_or(WordstashError::NoWordsInDb)?;
    let mut best = Streak {
        start: first,
        end: first,
        length_days: 1,
    };
    let mut current = best;

    for &day in rest {
        if day - current.end == Duration::days(1) {
            current.end = day;
            current.length_days += 1;
        } else {
            current = Streak {
                start: day,
                end: day,
                length_days: 1,
            };
        }
        // Strictly greater keeps the earliest run on ties.
        if current.length_days > best.length_days {
            best = current;
        }
    }

    Ok(best)
}

/// Outcome of a milestone projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MilestoneForecast {
    /// The current count already meets the target.
    Reached { current: usize, target: usize },
    /// The first lookup was today; no rate can be derived yet.
    InsufficientHistory,
    /// Linear projection at the historical average rate.
    Predicted {
        date: NaiveDate,
        days_remaining: i64,
        words_per_day: f64,
    },
    /// At the historical rate the target lies past the last representable date.
    BeyondHorizon { target: usize, words_per_day: f64 },
}

/// Project the date on which `current` distinct words grows to `target`.
///
/// This is a straight-line extrapolation: it assumes the future rate equals
/// the average rate since the first lookup (`current / days elapsed`). It is
/// not a statistical forecast.
pub fn predict_milestone(
    target: usize,
    current: usize,
    first_lookup: NaiveDate,
    today: NaiveDate,
) -> Result<MilestoneForecast> {
    if target == 0 {
        return Err(WordstashError::InvalidInput(
            "milestone target must be at least 1".into(),
        ));
    }
    if current >= target {
        return Ok(MilestoneForecast::Reached { current, target });
    }
    if current == 0 {
        return Err(WordstashError::NoWordsInDb);
    }

    let elapsed = (today - first_lookup).num_days();
    if elapsed <= 0 {
        return Ok(MilestoneForecast::InsufficientHistory);
    }

    let words_per_day = current as f64 / elapsed as f64;

    // ceil(remaining / (current / elapsed)), in integers.
    let days_remaining = i64::try_from(target - current)
        .ok()
        .zip(i64::try_from(current).ok())
        .and_then(|(remaining, current)| {
            remaining
                .checked_mul(elapsed)?
                .checked_add(current - 1)
                .map(|scaled| scaled / current)
        });
    let date = days_remaining
        .and_then(|days| u64::try_from(days).ok())
        .and_then(|days| today.checked_add_days(Days::new(days)));

    match (days_remaining, date) {
        (Some(days_remaining), Some(date)) => Ok(MilestoneForecast::Predicted {
            date,
            days_remaining,
            words_per_day,
        }),
        _ => Ok(MilestoneForecast::BeyondHorizon {
            target,
            words_per_day,
        }),
    }
}
