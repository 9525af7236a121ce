//! Multiple-choice quizzes over a word pool.
//!
//! A quiz moves `NotStarted → AskingQuestion(i) → Scored → Completed`.
//! Exactly one `QuizAttempt` row is written when it completes. A quiz that
//! is abandoned or fails part-way leaves no trace.

use std::time::Instant;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::cache::LookupCache;
use crate::error::{Result, WordstashError};
use crate::model::{PoolFilter, Question, QuizAttempt};
use crate::pool::{build_pool, distractor_universe};
use crate::store::Store;
use crate::traits::{Prompter, QuizAnswer};

/// Options shown per question: the correct definition plus distractors.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Smallest pool a quiz can be built from.
pub const MIN_POOL_SIZE: usize = OPTIONS_PER_QUESTION;

/// Where a quiz is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizState {
    NotStarted,
    AskingQuestion(usize),
    Scored,
    Completed,
    Abandoned,
}

/// A prepared quiz.
#[derive(Debug, Clone)]
pub struct Quiz {
    filter: PoolFilter,
    questions: Vec<Question>,
    state: QuizState,
    score: u32,
}

impl Quiz {
    pub fn filter(&self) -> &PoolFilter {
        &self.filter
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

/// How a quiz run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizOutcome {
    Completed(QuizAttempt),
    Abandoned { answered: usize, score: u32 },
}

/// Build one question for `word`.
///
/// `candidates` are (word, first definition) pairs; the target word itself is
/// skipped, as is any candidate whose definition text repeats the correct
/// definition or an already chosen distractor.
pub fn build_question<R: Rng + ?Sized>(
    word: &str,
    correct_definition: &str,
    candidates: &[(String, String)],
    rng: &mut R,
) -> Result<Question> {
    let mut shuffled: Vec<&(String, String)> =
        candidates.iter().filter(|(w, _)| w != word).collect();
    shuffled.shuffle(rng);

    let mut options = vec![correct_definition.to_string()];
    for (candidate, definition) in shuffled {
        if options.len() == OPTIONS_PER_QUESTION {
            break;
        }
        if options.iter().any(|o| o == definition) {
            tracing::debug!(%word, %candidate, "skipping distractor with duplicate definition");
            continue;
        }
        options.push(definition.clone());
    }

    if options.len() < OPTIONS_PER_QUESTION {
        return Err(WordstashError::NotEnoughWords {
            found: options.len(),
            required: OPTIONS_PER_QUESTION,
        });
    }

    options.shuffle(rng);
    Ok(Question {
        word: word.to_string(),
        options,
        correct_definition: correct_definition.to_string(),
    })
}

/// Builds, runs, and records quizzes.
pub struct QuizEngine<'a, R> {
    store: &'a Store,
    cache: &'a LookupCache<'a>,
    rng: R,
}

impl<'a, R: Rng> QuizEngine<'a, R> {
    pub fn new(store: &'a Store, cache: &'a LookupCache<'a>, rng: R) -> Self {
        Self { store, cache, rng }
    }

    /// Build a quiz over the pool selected by `filter`, optionally capped at
    /// `limit` questions.
    pub async fn prepare(&mut self, filter: PoolFilter, limit: Option<usize>) -> Result<Quiz> {
        if limit == Some(0) {
            return Err(WordstashError::InvalidInput(
                "question count must be at least 1".into(),
            ));
        }

        let filter = filter.normalized();
        let mut pool = build_pool(self.store, &filter)?;
        if pool.len() < MIN_POOL_SIZE {
            return Err(WordstashError::NotEnoughWords {
                found: pool.len(),
                required: MIN_POOL_SIZE,
            });
        }
        pool.shuffle(&mut self.rng);
        if let Some(limit) = limit {
            pool.truncate(limit);
        }

        let universe = distractor_universe(self.store, &filter)?;
        let mut candidates: Vec<(String, String)> = self
            .cache
            .cached_first_definitions(&universe)?
            .into_iter()
            .collect();
        candidates.sort();

        let mut questions = Vec::with_capacity(pool.len());
        for word in &pool {
            let payload = self.cache.get_or_fetch(word).await?;
            let Some(correct) = payload.first_definition() else {
                tracing::warn!(%word, "no definition text, leaving out of quiz");
                continue;
            };
            questions.push(build_question(word, correct, &candidates, &mut self.rng)?);
        }

        if questions.is_empty() {
            return Err(WordstashError::EmptyPool(filter.to_string()));
        }

        tracing::debug!(pool = %filter, questions = questions.len(), "prepared quiz");
        Ok(Quiz {
            filter,
            questions,
            state: QuizState::NotStarted,
            score: 0,
        })
    }

    /// Ask every question, score the answers, and persist the attempt.
    ///
    /// Elapsed time runs from the first question to the last answer.
    pub fn run(&self, quiz: &mut Quiz, prompter: &mut dyn Prompter) -> Result<QuizOutcome> {
        if quiz.state != QuizState::NotStarted {
            return Err(WordstashError::InvalidInput(
                "quiz has already been run".into(),
            ));
        }

        let total = quiz.questions.len();
        let started = Instant::now();
        for (i, question) in quiz.questions.iter().enumerate() {
            quiz.state = QuizState::AskingQuestion(i);
            let choice = match prompter.ask(i, total, question) {
                QuizAnswer::Quit => {
                    quiz.state = QuizState::Abandoned;
                    tracing::info!(answered = i, score = quiz.score, "quiz abandoned");
                    return Ok(QuizOutcome::Abandoned {
                        answered: i,
                        score: quiz.score,
                    });
                }
                QuizAnswer::Choice(choice) => choice,
            };
            let chosen = question.options.get(choice).ok_or_else(|| {
                WordstashError::InvalidInput(format!(
                    "option {} is out of range 1-{}",
                    choice + 1,
                    question.options.len()
                ))
            })?;
            let correct = question.is_correct(chosen);
            if correct {
                quiz.score += 1;
            }
            prompter.feedback(question, correct);
        }
        let duration_secs = started.elapsed().as_secs();
        quiz.state = QuizState::Scored;

        let attempt = record_attempt(
            self.store,
            &quiz.filter,
            total as u32,
            quiz.score,
            duration_secs,
        )?;
        quiz.state = QuizState::Completed;
        tracing::info!(
            pool = %attempt.pool,
            points = attempt.points,
            questions = attempt.question_count,
            "quiz completed"
        );
        Ok(QuizOutcome::Completed(attempt))
    }

    /// Most recent attempts, newest first.
    pub fn history(&self, limit: usize) -> Result<Vec<QuizAttempt>> {
        attempt_history(self.store, limit)
    }
}

fn record_attempt(
    store: &Store,
    filter: &PoolFilter,
    question_count: u32,
    points: u32,
    duration_secs: u64,
) -> Result<QuizAttempt> {
    let pool = filter.to_string();
    let taken_at = Utc::now();
    let id = store.transaction(|tx| {
        tx.execute(
            "INSERT INTO quiz_attempts (pool, taken_at, question_count, points, duration_secs)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![pool, taken_at, question_count, points, duration_secs as i64],
        )?;
        Ok(tx.last_insert_rowid())
    })?;
    Ok(QuizAttempt {
        id,
        pool,
        taken_at,
        question_count,
        points,
        duration_secs,
    })
}

/// Most recent quiz attempts, newest first.
pub fn attempt_history(store: &Store, limit: usize) -> Result<Vec<QuizAttempt>> {
    let mut stmt = store.conn().prepare(
        "SELECT id, pool, taken_at, question_count, points, duration_secs
         FROM quiz_attempts ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit as i64], |r| {
        Ok(QuizAttempt {
            id: r.get(0)?,
            pool: r.get(1)?,
            taken_at: r.get(2)?,
            question_count: r.get(3)?,
            points: r.get(4)?,
            duration_secs: r.get::<_, i64>(5)? as u64,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::testing::{look_up_all, SpySource};
    use crate::traits::ScriptedPrompter;

    const WORDS: [(&str, &str); 5] = [
        ("abate", "To lessen in force."),
        ("lucid", "Clear and easy to understand."),
        ("laconic", "Using very few words."),
        ("prodigal", "Wastefully extravagant."),
        ("venerate", "To regard with great respect."),
    ];

    fn source(words: &[(&str, &str)]) -> SpySource {
        words
            .iter()
            .fold(SpySource::new(), |s, (w, d)| s.with_definition(w, d))
    }

    async fn stocked(store: &Store, src: &SpySource, words: &[(&str, &str)]) {
        let entries: Vec<(&str, Option<&str>)> = words.iter().map(|(w, _)| (*w, None)).collect();
        look_up_all(store, src, &entries).await;
    }

    /// Always picks a wrong option.
    struct WrongAnswers;

    impl Prompter for WrongAnswers {
        fn confirm(&mut self, _: &str) -> bool {
            false
        }
        fn ask(&mut self, _: usize, _: usize, q: &Question) -> QuizAnswer {
            let right = q.correct_index().unwrap();
            QuizAnswer::Choice((right + 1) % q.options.len())
        }
        fn show(&mut self, _: &str, _: &str) {}
    }

    #[tokio::test]
    async fn pool_of_three_is_not_enough() {
        let store = Store::in_memory().unwrap();
        let src = source(&WORDS[..3]);
        stocked(&store, &src, &WORDS[..3]).await;
        let cache = LookupCache::new(&store, &src);
        let mut engine = QuizEngine::new(&store, &cache, StdRng::seed_from_u64(1));

        let err = engine.prepare(PoolFilter::All, None).await.unwrap_err();
        assert!(matches!(
            err,
            WordstashError::NotEnoughWords {
                found: 3,
                required: 4
            }
        ));
        assert!(engine.history(10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn pool_of_four_runs_and_records_one_attempt() {
        let store = Store::in_memory().unwrap();
        let src = source(&WORDS[..4]);
        stocked(&store, &src, &WORDS[..4]).await;
        let cache = LookupCache::new(&store, &src);
        let mut engine = QuizEngine::new(&store, &cache, StdRng::seed_from_u64(2));

        let mut quiz = engine.prepare(PoolFilter::All, None).await.unwrap();
        assert_eq!(quiz.state(), QuizState::NotStarted);
        assert_eq!(quiz.questions().len(), 4);
        for q in quiz.questions() {
            assert_eq!(q.options.len(), OPTIONS_PER_QUESTION);
            assert!(q.correct_index().is_some());
        }

        let mut prompter = ScriptedPrompter::new().always_correct();
        let outcome = engine.run(&mut quiz, &mut prompter).unwrap();
        let QuizOutcome::Completed(attempt) = outcome else {
            panic!("quiz should complete");
        };
        assert_eq!(attempt.question_count, 4);
        assert_eq!(attempt.points, 4);
        assert_eq!(attempt.pool, "all");
        assert_eq!(quiz.state(), QuizState::Completed);

        let history = engine.history(10).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], attempt);
        // Definitions came from the cache filled at lookup time.
        assert_eq!(src.calls(), 4);
    }

    #[tokio::test]
    async fn wrong_answers_score_zero() {
        let store = Store::in_memory().unwrap();
        let src = source(&WORDS);
        stocked(&store, &src, &WORDS).await;
        let cache = LookupCache::new(&store, &src);
        let mut engine = QuizEngine::new(&store, &cache, StdRng::seed_from_u64(3));

        let mut quiz = engine.prepare(PoolFilter::All, None).await.unwrap();
        let outcome = engine.run(&mut quiz, &mut WrongAnswers).unwrap();
        assert!(matches!(
            outcome,
            QuizOutcome::Completed(QuizAttempt {
                points: 0,
                question_count: 5,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn limit_caps_question_count() {
        let store = Store::in_memory().unwrap();
        let src = source(&WORDS);
        stocked(&store, &src, &WORDS).await;
        let cache = LookupCache::new(&store, &src);
        let mut engine = QuizEngine::new(&store, &cache, StdRng::seed_from_u64(4));

        let mut quiz = engine.prepare(PoolFilter::All, Some(2)).await.unwrap();
        assert_eq!(quiz.questions().len(), 2);
        let outcome = engine
            .run(&mut quiz, &mut ScriptedPrompter::new().always_correct())
            .unwrap();
        assert!(matches!(
            outcome,
            QuizOutcome::Completed(QuizAttempt {
                question_count: 2,
                ..
            })
        ));
        assert!(matches!(
            engine.prepare(PoolFilter::All, Some(0)).await,
            Err(WordstashError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn abandoned_quiz_leaves_no_trace() {
        let store = Store::in_memory().unwrap();
        let src = source(&WORDS);
        stocked(&store, &src, &WORDS).await;
        let cache = LookupCache::new(&store, &src);
        let mut engine = QuizEngine::new(&store, &cache, StdRng::seed_from_u64(5));

        let mut quiz = engine.prepare(PoolFilter::All, None).await.unwrap();
        let mut prompter = ScriptedPrompter::new()
            .with_answers([QuizAnswer::Choice(0), QuizAnswer::Quit])
            .always_correct();
        let outcome = engine.run(&mut quiz, &mut prompter).unwrap();
        assert!(matches!(outcome, QuizOutcome::Abandoned { answered: 1, .. }));
        assert_eq!(quiz.state(), QuizState::Abandoned);
        assert!(engine.history(10).unwrap().is_empty());

        assert!(matches!(
            engine.run(&mut quiz, &mut prompter),
            Err(WordstashError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn out_of_range_choice_is_rejected_without_recording() {
        let store = Store::in_memory().unwrap();
        let src = source(&WORDS);
        stocked(&store, &src, &WORDS).await;
        let cache = LookupCache::new(&store, &src);
        let mut engine = QuizEngine::new(&store, &cache, StdRng::seed_from_u64(6));

        let mut quiz = engine.prepare(PoolFilter::All, None).await.unwrap();
        let mut prompter = ScriptedPrompter::new().with_answers([QuizAnswer::Choice(9)]);
        assert!(matches!(
            engine.run(&mut quiz, &mut prompter),
            Err(WordstashError::InvalidInput(_))
        ));
        assert!(engine.history(10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn collection_distractors_stay_in_collection() {
        let emotions = [
            ("happy", "Feeling joy."),
            ("serene", "Calm and peaceful."),
            ("morose", "Sullen and gloomy."),
            ("elated", "Ecstatically happy."),
        ];
        let store = Store::in_memory().unwrap();
        let src = source(&emotions);
        let src = WORDS.iter().fold(src, |s, (w, d)| s.with_definition(w, d));
        stocked(&store, &src, &emotions).await;
        stocked(&store, &src, &WORDS).await;
        let cache = LookupCache::new(&store, &src);

        let allowed: Vec<&str> = emotions.iter().map(|(_, d)| *d).collect();
        for seed in 0..10 {
            let mut engine = QuizEngine::new(&store, &cache, StdRng::seed_from_u64(seed));
            let quiz = engine
                .prepare(PoolFilter::Collection("emotions".into()), None)
                .await
                .unwrap();
            assert_eq!(quiz.questions().len(), 4);
            for q in quiz.questions() {
                for option in &q.options {
                    assert!(allowed.contains(&option.as_str()), "foreign option {option}");
                }
            }
        }
    }

    #[tokio::test]
    async fn collection_casing_records_one_pool() {
        let emotions = [
            ("happy", "Feeling joy."),
            ("serene", "Calm and peaceful."),
            ("morose", "Sullen and gloomy."),
            ("elated", "Ecstatically happy."),
        ];
        let store = Store::in_memory().unwrap();
        let src = source(&emotions);
        stocked(&store, &src, &emotions).await;
        let cache = LookupCache::new(&store, &src);
        let mut engine = QuizEngine::new(&store, &cache, StdRng::seed_from_u64(4));

        for name in ["Emotions", " EMOTIONS ", "emotions"] {
            let mut quiz = engine
                .prepare(PoolFilter::Collection(name.into()), None)
                .await
                .unwrap();
            assert_eq!(quiz.filter(), &PoolFilter::Collection("emotions".into()));
            engine.run(&mut quiz, &mut WrongAnswers).unwrap();
        }

        let history = engine.history(10).unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.iter().all(|a| a.pool == "collection:emotions"));
    }

    #[tokio::test]
    async fn duplicate_definitions_are_not_offered_twice() {
        let mut words = WORDS.to_vec();
        words.push(("alacrity", "To lessen in force."));
        let store = Store::in_memory().unwrap();
        let src = source(&words);
        stocked(&store, &src, &words).await;
        let cache = LookupCache::new(&store, &src);

        for seed in 0..20 {
            let mut engine = QuizEngine::new(&store, &cache, StdRng::seed_from_u64(seed));
            let quiz = engine.prepare(PoolFilter::All, None).await.unwrap();
            for q in quiz.questions() {
                let mut options = q.options.clone();
                options.sort();
                options.dedup();
                assert_eq!(options.len(), OPTIONS_PER_QUESTION, "duplicate in {:?}", q.options);
            }
        }
    }

    #[test]
    fn too_few_distinct_distractors_fails() {
        let candidates = vec![
            ("a".to_string(), "Alpha.".to_string()),
            ("b".to_string(), "Beta.".to_string()),
            ("c".to_string(), "Gamma.".to_string()),
            ("d".to_string(), "Gamma.".to_string()),
        ];
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            build_question("a", "Alpha.", &candidates, &mut rng),
            Err(WordstashError::NotEnoughWords {
                found: 3,
                required: 4
            })
        ));
        let q = build_question("c", "Gamma.", &candidates, &mut rng);
        assert!(q.is_err());
    }
}
