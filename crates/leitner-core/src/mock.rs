//! Scripted session driver for testing.

use std::collections::VecDeque;

use crate::model::Card;
use crate::parser::{parse_entry, DEFAULT_REVIEW_SENTINEL};
use crate::traits::{Decision, Entry, SessionDriver};

/// A session driver that replays canned input instead of asking a person.
///
/// Entries are raw `word:meaning` lines; invalid lines are skipped the way a
/// console driver would re-prompt. When the entries run out the driver
/// starts review. Decisions come from a queue, then from an optional rule,
/// then from an optional fallback; with none of those left, asking fails.
pub struct ScriptedDriver {
    entries: VecDeque<String>,
    decisions: VecDeque<Decision>,
    rule: Option<Box<dyn FnMut(&Card) -> Decision>>,
    fallback: Option<Decision>,
    asked: Vec<String>,
    rejected: Vec<String>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            decisions: VecDeque::new(),
            rule: None,
            fallback: None,
            asked: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// A driver that decides every card with `rule`.
    pub fn with_rule<F>(rule: F) -> Self
    where
        F: FnMut(&Card) -> Decision + 'static,
    {
        Self {
            rule: Some(Box::new(rule)),
            ..Self::new()
        }
    }

    pub fn with_entries<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn with_decisions<I: IntoIterator<Item = Decision>>(mut self, decisions: I) -> Self {
        self.decisions.extend(decisions);
        self
    }

    pub fn with_fallback(mut self, decision: Decision) -> Self {
        self.fallback = Some(decision);
        self
    }

    /// Words asked about so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.clone()
    }

    /// Entry lines that were skipped as invalid.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }
}

impl Default for ScriptedDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionDriver for ScriptedDriver {
    fn read_entry(&mut self) -> anyhow::Result<Entry> {
        while let Some(line) = self.entries.pop_front() {
            match parse_entry(&line, DEFAULT_REVIEW_SENTINEL) {
                Ok(entry) => return Ok(entry),
                Err(_) => self.rejected.push(line),
            }
        }
        Ok(Entry::ReviewStart)
    }

    fn ask_decision(&mut self, card: &Card) -> anyhow::Result<Decision> {
        self.asked.push(card.front().to_string());
        if let Some(decision) = self.decisions.pop_front() {
            return Ok(decision);
        }
        if let Some(rule) = self.rule.as_mut() {
            return Ok(rule(card));
        }
        self.fallback.ok_or_else(|| {
            anyhow::anyhow!("no scripted decision left for '{}'", card.front())
        })
    }
}
