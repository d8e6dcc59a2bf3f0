//! Storage operations for study progress
//!
//! One record per capsule under `pc_progress_{id}`. Records are created
//! lazily: reading a capsule with no record yields the default state.

use std::sync::Arc;

use thiserror::Error;

use super::models::{Progress, MAX_SCORE};
use crate::codec::{self, CodecError};
use crate::kv::{KeyValueStore, KvError};

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Store error: {0}")]
    Store(#[from] KvError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Invalid score: {0} (expected 0-100)")]
    InvalidScore(u32),
}

pub type Result<T> = std::result::Result<T, ProgressError>;

/// Tracker for per-capsule study progress
pub struct ProgressTracker<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> ProgressTracker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Get progress for a capsule. Never fails; missing or malformed
    /// records read as the default state.
    pub fn get(&self, capsule_id: &str) -> Progress {
        let text = match self.store.get(&codec::progress_key(capsule_id)) {
            Ok(Some(text)) => text,
            Ok(None) => return Progress::default(),
            Err(e) => {
                log::warn!("Error reading progress for {}: {}", capsule_id, e);
                return Progress::default();
            }
        };

        codec::decode(&text).unwrap_or_else(|e| {
            log::warn!("Malformed progress for {}, resetting: {}", capsule_id, e);
            Progress::default()
        })
    }

    /// Save progress for a capsule
    pub fn save(&self, capsule_id: &str, progress: &Progress) -> Result<()> {
        if progress.best_score > MAX_SCORE {
            return Err(ProgressError::InvalidScore(progress.best_score));
        }

        let text = codec::encode(progress)?;
        self.store
            .set(&codec::progress_key(capsule_id), &text)
            .map_err(|e| {
                log::error!("Error saving progress for {}: {}", capsule_id, e);
                e
            })?;
        Ok(())
    }

    /// Remove the progress record for a capsule
    pub fn remove(&self, capsule_id: &str) -> Result<()> {
        self.store.remove(&codec::progress_key(capsule_id))?;
        Ok(())
    }

    /// Mark a flashcard known or unknown and persist the result.
    ///
    /// Nothing is written when the card is already in the requested state.
    pub fn set_flashcard_known(
        &self,
        capsule_id: &str,
        index: usize,
        known: bool,
    ) -> Result<Progress> {
        let mut progress = self.get(capsule_id);
        let changed = if known {
            progress.mark_known(index)
        } else {
            progress.mark_unknown(index)
        };
        if changed {
            self.save(capsule_id, &progress)?;
        }
        Ok(progress)
    }

    /// Record a finished quiz. Only writes when the score beats the best one.
    pub fn record_quiz_score(&self, capsule_id: &str, score: u32) -> Result<Progress> {
        if score > MAX_SCORE {
            return Err(ProgressError::InvalidScore(score));
        }

        let mut progress = self.get(capsule_id);
        if progress.record_score(score) {
            self.save(capsule_id, &progress)?;
            log::info!("New best score {} for capsule {}", score, capsule_id);
        }
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn create_test_tracker() -> (ProgressTracker<MemoryStore>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ProgressTracker::new(Arc::clone(&store)), store)
    }

    #[test]
    fn test_get_defaults_when_absent() {
        let (tracker, store) = create_test_tracker();
        assert_eq!(tracker.get("none"), Progress::default());
        // Reading does not create a record
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_get_defaults_when_malformed() {
        let (tracker, store) = create_test_tracker();
        store.set(&codec::progress_key("c1"), "not json").unwrap();
        assert_eq!(tracker.get("c1"), Progress::default());

        store
            .set(&codec::progress_key("c2"), r#"{"bestScore":"high"}"#)
            .unwrap();
        assert_eq!(tracker.get("c2"), Progress::default());
    }

    #[test]
    fn test_save_and_get() {
        let (tracker, _store) = create_test_tracker();
        let mut progress = Progress::default();
        progress.mark_known(1);
        progress.mark_known(3);
        progress.record_score(55);

        tracker.save("c1", &progress).unwrap();
        assert_eq!(tracker.get("c1"), progress);
        assert_eq!(tracker.get("c2"), Progress::default());
    }

    #[test]
    fn test_save_rejects_out_of_range_score() {
        let (tracker, _store) = create_test_tracker();
        let progress = Progress {
            best_score: 101,
            ..Default::default()
        };
        assert!(matches!(
            tracker.save("c1", &progress),
            Err(ProgressError::InvalidScore(101))
        ));
    }

    #[test]
    fn test_marking_known_twice_keeps_one_entry() {
        let (tracker, _store) = create_test_tracker();
        tracker.set_flashcard_known("c1", 2, true).unwrap();
        let progress = tracker.set_flashcard_known("c1", 2, true).unwrap();
        assert_eq!(progress.known_flashcards.iter().filter(|&&i| i == 2).count(), 1);
        assert_eq!(tracker.get("c1").known_flashcards.len(), 1);

        let progress = tracker.set_flashcard_known("c1", 2, false).unwrap();
        assert!(progress.known_flashcards.is_empty());
        assert!(tracker.get("c1").known_flashcards.is_empty());
    }

    #[test]
    fn test_record_quiz_score_monotonic() {
        let (tracker, _store) = create_test_tracker();
        tracker.record_quiz_score("c1", 70).unwrap();
        tracker.record_quiz_score("c1", 50).unwrap();
        assert_eq!(tracker.get("c1").best_score, 70);

        tracker.record_quiz_score("c1", 90).unwrap();
        assert_eq!(tracker.get("c1").best_score, 90);

        assert!(tracker.record_quiz_score("c1", 120).is_err());
        assert_eq!(tracker.get("c1").best_score, 90);
    }

    #[test]
    fn test_score_does_not_disturb_known_cards() {
        let (tracker, _store) = create_test_tracker();
        tracker.set_flashcard_known("c1", 0, true).unwrap();
        tracker.record_quiz_score("c1", 40).unwrap();
        let progress = tracker.get("c1");
        assert!(progress.is_known(0));
        assert_eq!(progress.best_score, 40);
    }

    #[test]
    fn test_quota_failure_is_reported() {
        let store = Arc::new(MemoryStore::with_quota(8));
        let tracker = ProgressTracker::new(Arc::clone(&store));
        let err = tracker.record_quiz_score("capsule", 80).unwrap_err();
        assert!(matches!(err, ProgressError::Store(ref e) if e.is_quota_exceeded()));
        assert_eq!(tracker.get("capsule").best_score, 0);
    }

    #[test]
    fn test_remove() {
        let (tracker, _store) = create_test_tracker();
        tracker.record_quiz_score("c1", 10).unwrap();
        tracker.remove("c1").unwrap();
        tracker.remove("c1").unwrap();
        assert_eq!(tracker.get("c1"), Progress::default());
    }
}
