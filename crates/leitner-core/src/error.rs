//! Error types for the box cascade, persistence, and card entry parsing.
//!
//! A missing data file is not represented here: it is the normal first-run
//! condition and surfaces as [`LoadOutcome::NotFound`](crate::traits::LoadOutcome).

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the box cascade itself.
#[derive(Debug, Error)]
pub enum CascadeError {
    /// A card was popped from an empty box. The scheduler bounds every pop
    /// by the current box size, so this indicates a logic bug.
    #[error("attempted to pop from empty box {index}")]
    EmptyBox { index: usize },

    /// The requested box layout cannot form a review pipeline.
    #[error("invalid cascade layout: {0}")]
    InvalidLayout(String),
}

/// Errors that can occur when reading or writing persisted cascade state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file was read but is not a valid cascade document.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The cascade could not be encoded.
    #[error("failed to serialize cascade: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The data file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from parsing a `word:meaning` entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// The entry has no `:` between word and meaning.
    #[error("missing ':' separator in entry '{0}'")]
    MissingSeparator(String),

    /// The word half of the entry is blank.
    #[error("entry '{0}' has an empty word")]
    EmptyWord(String),
}

impl StoreError {
    /// Returns `true` if the error happened while saving rather than loading.
    pub fn is_write(&self) -> bool {
        matches!(self, StoreError::Write { .. } | StoreError::Serialize(_))
    }
}
