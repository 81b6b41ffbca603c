//! Console session driver and progress reporter.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use leitner_core::error::StoreError;
use leitner_core::model::{Capacity, Card};
use leitner_core::parser::parse_entry;
use leitner_core::scheduler::ProgressReporter;
use leitner_core::traits::{Decision, Entry, SessionDriver};

/// What the learner typed at the decision prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Decide(Decision),
    ShowMeaning,
}

fn parse_choice(input: &str) -> Option<Choice> {
    match input.trim().to_lowercase().as_str() {
        "1" | "r" | "remember" => Some(Choice::Decide(Decision::Remember)),
        "2" | "f" | "forget" => Some(Choice::Decide(Decision::Forget)),
        "3" | "s" | "show" => Some(Choice::ShowMeaning),
        _ => None,
    }
}

/// Reads entries and decisions line by line from `input`, prompting on
/// `output`.
pub struct ConsoleDriver<R, W> {
    input: R,
    output: W,
    sentinel: String,
}

impl<R: BufRead, W: Write> ConsoleDriver<R, W> {
    pub fn new(input: R, output: W, sentinel: impl Into<String>) -> Self {
        Self {
            input,
            output,
            sentinel: sentinel.into(),
        }
    }

    /// Print `prompt` and read one line. `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> SessionDriver for ConsoleDriver<R, W> {
    fn read_entry(&mut self) -> Result<Entry> {
        loop {
            let Some(line) = self.prompt("> ")? else {
                tracing::debug!("input closed during card entry, starting review");
                writeln!(self.output)?;
                return Ok(Entry::ReviewStart);
            };
            match parse_entry(&line, &self.sentinel) {
                Ok(entry) => return Ok(entry),
                Err(e) => {
                    tracing::debug!("rejected entry: {e}");
                    writeln!(self.output, "invalid entry, use word:meaning")?;
                }
            }
        }
    }

    fn ask_decision(&mut self, card: &Card) -> Result<Decision> {
        writeln!(self.output, "\nWord: {}", card.front())?;
        loop {
            let Some(line) = self.prompt("Remember it? (1: remember / 2: forget / 3: show meaning): ")?
            else {
                anyhow::bail!("input closed before a decision on '{}'", card.front());
            };
            match parse_choice(&line) {
                Some(Choice::Decide(decision)) => return Ok(decision),
                Some(Choice::ShowMeaning) => {
                    writeln!(self.output, "\nMeaning: {}", card.back())?;
                }
                None => {
                    writeln!(self.output, "please answer 1, 2 or 3")?;
                }
            }
        }
    }
}

/// Console progress reporter.
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_card_added(&self, card: &Card, intake_len: usize, capacity: Capacity) {
        eprintln!(
            "Added '{}' to box 1 ({intake_len}/{capacity})",
            card.front()
        );
    }

    fn on_intake_pass_complete(&self, pass: usize, remaining: usize) {
        eprintln!("\nIntake pass {pass} done, {remaining} card(s) left in box 1");
    }

    fn on_box_start(&self, index: usize, review_count: usize) {
        eprintln!("\n{}", "=".repeat(30));
        eprintln!(
            "Box {} is full, reviewing the first {review_count} card(s)",
            index + 1
        );
    }

    fn on_box_complete(&self, index: usize, remaining: usize) {
        eprintln!("Box {} done, {remaining} card(s) left", index + 1);
    }

    fn on_card_moved(&self, _: &Card, _: usize, _: usize) {}

    fn on_saved(&self, location: &str) {
        eprintln!("Saved to {location}");
    }

    fn on_save_failed(&self, error: &StoreError) {
        eprintln!("Failed to save: {error}");
    }
}
