//! Line-oriented prompter over stdin/stdout.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use wordstash_core::model::Question;
use wordstash_core::traits::{Prompter, QuizAnswer};

/// Reads answers line by line. End of input declines confirmations and
/// quits quizzes.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Option<String> {
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_lowercase()),
        }
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        let _ = write!(self.output, "{message} [y/N] ");
        matches!(self.read_line().as_deref(), Some("y" | "yes"))
    }

    fn ask(&mut self, index: usize, total: usize, question: &Question) -> QuizAnswer {
        let _ = writeln!(
            self.output,
            "\nQuestion {}/{}: what does '{}' mean?",
            index + 1,
            total,
            question.word
        );
        for (i, option) in question.options.iter().enumerate() {
            let _ = writeln!(self.output, "  {}. {}", i + 1, option);
        }

        let count = question.options.len();
        loop {
            let _ = write!(self.output, "Answer (1-{count}, q to quit): ");
            let Some(line) = self.read_line() else {
                return QuizAnswer::Quit;
            };
            if line == "q" || line == "quit" {
                return QuizAnswer::Quit;
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => return QuizAnswer::Choice(n - 1),
                _ => {
                    let _ = writeln!(self.output, "Please enter a number from 1 to {count}.");
                }
            }
        }
    }

    fn show(&mut self, word: &str, definition: &str) {
        let _ = writeln!(self.output, "\n{word}\n  {definition}");
    }

    fn feedback(&mut self, question: &Question, correct: bool) {
        let _ = if correct {
            writeln!(self.output, "Correct!")
        } else {
            writeln!(
                self.output,
                "Wrong. '{}' means: {}",
                question.word, question.correct_definition
            )
        };
    }
}
