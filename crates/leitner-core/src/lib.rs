//! leitner-core: box cascade model, review scheduler and persistence.
//!
//! This crate defines the card and box model, the two review policies that
//! move cards through the cascade, and the seams to the learner and to disk.

pub mod error;
pub mod mock;
pub mod model;
pub mod parser;
pub mod scheduler;
pub mod store;
pub mod traits;

pub use error::{CascadeError, EntryError, StoreError};
pub use model::{BoxCascade, Capacity, Card, CardBox, Occupancy};
pub use scheduler::{NoopReporter, ProgressReporter, ReviewScheduler, SchedulerConfig};
pub use store::{CascadeSnapshot, JsonFileStore, MemoryStore};
pub use traits::{CascadeStore, Decision, Entry, LoadOutcome, SessionDriver};
