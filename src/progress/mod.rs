//! Per-capsule study progress
//!
//! Tracks the best quiz score and the set of flashcards marked as known.
//! Progress is keyed by capsule id only; it holds no reference to the
//! capsule itself.

pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{ProgressError, ProgressTracker};
