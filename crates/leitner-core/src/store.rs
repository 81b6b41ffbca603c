//! Cascade persistence: the snapshot document plus JSON file and
//! in-memory stores.
//!
//! The on-disk document is
//! `{ "saved_at": ..., "boxes": [ { "cards": [[front, back], ...] }, ... ] }`
//! with `saved_at` optional, so files written without it still load.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{BoxCascade, Card};
use crate::traits::{CascadeStore, LoadOutcome};

/// Full cascade contents keyed by box position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeSnapshot {
    /// When the snapshot was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    /// Box contents, index 0 first.
    #[serde(default)]
    pub boxes: Vec<BoxSnapshot>,
}

/// Contents of one box, head first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSnapshot {
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl CascadeSnapshot {
    /// Copy the current contents of every box.
    pub fn capture(cascade: &BoxCascade) -> Self {
        Self {
            saved_at: Some(Utc::now()),
            boxes: cascade
                .boxes()
                .iter()
                .map(|b| BoxSnapshot {
                    cards: b.cards().cloned().collect(),
                })
                .collect(),
        }
    }

    /// Replace box contents in `cascade` with this snapshot.
    ///
    /// Boxes the snapshot does not cover keep their current contents;
    /// snapshot boxes past the end of the cascade are dropped.
    pub fn apply_to(self, cascade: &mut BoxCascade) {
        let extra = self.boxes.len().saturating_sub(cascade.len());
        if extra > 0 {
            tracing::warn!(
                "snapshot has {} more box(es) than the configured cascade, ignoring them",
                extra
            );
        }
        cascade.replace_contents(self.boxes.into_iter().map(|b| b.cards).collect());
    }

    pub fn total_cards(&self) -> usize {
        self.boxes.iter().map(|b| b.cards.len()).sum()
    }
}

/// What happened when a session tried to restore saved state.
#[derive(Debug)]
pub enum Restore {
    /// Saved state was applied.
    Loaded { cards: usize },
    /// No saved state yet; the cascade is left as it was.
    Fresh,
    /// Saved state exists but could not be used; the cascade is left as it
    /// was.
    Failed(StoreError),
}

/// Load saved state into `cascade`, recovering from every failure.
///
/// A missing file and an unreadable file both leave the cascade as it was.
pub fn restore(store: &dyn CascadeStore, cascade: &mut BoxCascade) -> Restore {
    match store.load() {
        Ok(LoadOutcome::Loaded(snapshot)) => {
            snapshot.apply_to(cascade);
            let cards = cascade.total_cards();
            tracing::info!("loaded {cards} card(s) from {}", store.location());
            Restore::Loaded { cards }
        }
        Ok(LoadOutcome::NotFound) => {
            tracing::info!("no saved state at {}, starting fresh", store.location());
            Restore::Fresh
        }
        Err(e) => {
            tracing::warn!("could not load saved state: {e}");
            Restore::Failed(e)
        }
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Stores the cascade as a pretty-printed JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CascadeStore for JsonFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<LoadOutcome, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LoadOutcome::NotFound);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let snapshot: CascadeSnapshot =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(LoadOutcome::Loaded(snapshot))
    }

    fn save(&self, snapshot: &CascadeSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(snapshot).map_err(StoreError::Serialize)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(
            "saved {} card(s) to {}",
            snapshot.total_cards(),
            self.path.display()
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Keeps the last saved snapshot in memory. Used by tests and benches.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: RefCell<Option<CascadeSnapshot>>,
    save_count: RefCell<usize>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose saves always fail with a write error.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Pre-populate the store as if a previous session had saved.
    pub fn with_snapshot(snapshot: CascadeSnapshot) -> Self {
        Self {
            saved: RefCell::new(Some(snapshot)),
            ..Self::default()
        }
    }

    pub fn last_saved(&self) -> Option<CascadeSnapshot> {
        self.saved.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.save_count.borrow()
    }
}

impl CascadeStore for MemoryStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> Result<LoadOutcome, StoreError> {
        Ok(match self.saved.borrow().clone() {
            Some(snapshot) => LoadOutcome::Loaded(snapshot),
            None => LoadOutcome::NotFound,
        })
    }

    fn save(&self, snapshot: &CascadeSnapshot) -> Result<(), StoreError> {
        *self.save_count.borrow_mut() += 1;
        if self.fail_saves {
            return Err(StoreError::Write {
                path: PathBuf::from("memory"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "simulated write failure"),
            });
        }
        *self.saved.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }
}
