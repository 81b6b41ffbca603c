//! Seams between the scheduler and its collaborators.
//!
//! The [`SessionDriver`] is whatever talks to the learner (a console, a
//! script in tests); the [`CascadeStore`] is wherever the cascade is kept
//! between runs. Both are synchronous: every decision blocks the scheduler.

use crate::error::StoreError;
use crate::model::Card;
use crate::store::CascadeSnapshot;

// ---------------------------------------------------------------------------
// Session driver
// ---------------------------------------------------------------------------

/// The learner's verdict on a reviewed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Remember,
    Forget,
}

/// One line of intake input, already validated by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// The learner is done entering cards and wants to start reviewing.
    ReviewStart,
    /// A new card for the intake box.
    Card(Card),
}

/// Trait for the interactive side of a session.
///
/// Invalid input and "show meaning" requests are handled inside the driver;
/// the scheduler only ever sees a finished [`Entry`] or [`Decision`].
pub trait SessionDriver {
    /// Read the next intake entry.
    fn read_entry(&mut self) -> anyhow::Result<Entry>;

    /// Ask the learner whether they remember `card`.
    fn ask_decision(&mut self, card: &Card) -> anyhow::Result<Decision>;
}

// ---------------------------------------------------------------------------
// Persistence gateway
// ---------------------------------------------------------------------------

/// Result of loading persisted state.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded(CascadeSnapshot),
    /// Nothing has been saved yet. Not an error.
    NotFound,
}

/// Trait for loading and saving the full cascade.
pub trait CascadeStore {
    /// Human-readable location, for messages.
    fn location(&self) -> String;

    fn load(&self) -> Result<LoadOutcome, StoreError>;

    fn save(&self, snapshot: &CascadeSnapshot) -> Result<(), StoreError>;
}
