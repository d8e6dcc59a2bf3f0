//! Application-facing entry point
//!
//! [`Classroom`] bundles the capsule repository and the progress tracker
//! over one shared store and exposes the operations front ends call. It is
//! passed around explicitly; there is no global instance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::capsules::sample::sample_capsule;
use crate::capsules::{Capsule, CapsuleRepository, CapsuleStorageError, IndexEntry, IndexReport};
use crate::clock::{Clock, SystemClock};
use crate::codec::CodecError;
use crate::config::{ClassroomConfig, ConfigError};
use crate::display;
use crate::kv::{FileStore, KeyValueStore, KvError};
use crate::progress::{quiz_score, Progress, ProgressError, ProgressTracker};
use crate::transfer::{self, ImportError, ValidationError};

#[derive(Error, Debug)]
pub enum ClassroomError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] KvError),

    #[error("Capsule error: {0}")]
    Capsule(#[from] CapsuleStorageError),
}

/// One capsule as shown in the library listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryCard {
    #[serde(flatten)]
    pub entry: IndexEntry,
    /// `None` when the capsule record could not be read
    pub flashcard_count: Option<usize>,
    pub known_count: usize,
    pub best_score: u32,
}

/// Result of a finished quiz
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub score: u32,
    pub best_score: u32,
    pub new_best: bool,
}

pub struct Classroom<S: KeyValueStore = FileStore> {
    capsules: CapsuleRepository<S>,
    progress: ProgressTracker<S>,
    clock: Arc<dyn Clock>,
}

impl Classroom<FileStore> {
    /// Open the file-backed classroom described by `config`, seeding the
    /// demo capsule into an empty library if configured to.
    pub fn open(config: &ClassroomConfig) -> Result<Self, ClassroomError> {
        let dir = config.store_dir()?;
        let store = FileStore::open_with_quota(dir.clone(), config.quota_bytes)?;
        log::info!("Opened classroom store at {:?}", dir);

        let classroom = Self::new(Arc::new(store));
        if config.seed_sample {
            classroom.seed_sample_if_empty()?;
        }
        Ok(classroom)
    }
}

impl<S: KeyValueStore> Classroom<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            capsules: CapsuleRepository::with_clock(Arc::clone(&store), Arc::clone(&clock)),
            progress: ProgressTracker::new(store),
            clock,
        }
    }

    pub fn capsules(&self) -> &CapsuleRepository<S> {
        &self.capsules
    }

    pub fn progress(&self) -> &ProgressTracker<S> {
        &self.progress
    }

    // ==================== Capsules ====================

    pub fn get_capsules_index(&self) -> Vec<IndexEntry> {
        self.capsules.get_index()
    }

    pub fn get_capsule(&self, id: &str) -> Option<Capsule> {
        self.capsules.get_by_id(id)
    }

    pub fn save_capsule(&self, capsule: &Capsule) -> Result<Capsule, CapsuleStorageError> {
        self.capsules.save(capsule)
    }

    pub fn delete_capsule(&self, id: &str) -> Result<(), CapsuleStorageError> {
        self.capsules.delete(id)
    }

    pub fn generate_id(&self) -> String {
        self.capsules.generate_id()
    }

    /// Library listing, most recently updated first
    pub fn library(&self) -> Vec<LibraryCard> {
        self.capsules
            .get_index_by_recency()
            .into_iter()
            .map(|entry| {
                let progress = self.progress.get(&entry.id);
                let flashcard_count = self.capsules.get_by_id(&entry.id).map(|c| c.flashcards.len());
                LibraryCard {
                    known_count: flashcard_count
                        .map(|n| progress.known_count(n))
                        .unwrap_or(progress.known_flashcards.len()),
                    best_score: progress.best_score,
                    flashcard_count,
                    entry,
                }
            })
            .collect()
    }

    /// Save the demo capsule if the library is empty
    pub fn seed_sample_if_empty(&self) -> Result<Option<Capsule>, CapsuleStorageError> {
        if !self.capsules.get_index().is_empty() {
            return Ok(None);
        }
        let saved = self.capsules.save(&sample_capsule())?;
        log::info!("Sample capsule added");
        Ok(Some(saved))
    }

    pub fn verify_index(&self) -> Result<IndexReport, CapsuleStorageError> {
        self.capsules.verify_index()
    }

    pub fn rebuild_index(&self) -> Result<usize, CapsuleStorageError> {
        self.capsules.rebuild_index()
    }

    // ==================== Progress ====================

    pub fn get_progress(&self, id: &str) -> Progress {
        self.progress.get(id)
    }

    pub fn save_progress(&self, id: &str, progress: &Progress) -> Result<(), ProgressError> {
        self.progress.save(id, progress)
    }

    pub fn set_flashcard_known(
        &self,
        id: &str,
        index: usize,
        known: bool,
    ) -> Result<Progress, ProgressError> {
        self.progress.set_flashcard_known(id, index, known)
    }

    /// Score a finished quiz and keep the best result
    pub fn record_quiz(&self, id: &str, correct: usize, total: usize) -> Result<QuizOutcome, ProgressError> {
        let score = quiz_score(correct, total);
        let previous_best = self.progress.get(id).best_score;
        let progress = self.progress.record_quiz_score(id, score)?;
        Ok(QuizOutcome {
            score,
            best_score: progress.best_score,
            new_best: score > previous_best,
        })
    }

    // ==================== Import / Export ====================

    pub fn validate_capsule(&self, payload: &Value) -> Result<(), ValidationError> {
        transfer::validate(payload)
    }

    pub fn export_capsule(&self, capsule: &Capsule) -> Result<String, CodecError> {
        transfer::export(capsule)
    }

    pub fn import_capsule(&self, payload: &Value) -> Result<Capsule, ImportError> {
        transfer::import_capsule(&self.capsules, payload)
    }

    pub fn import_capsule_json(&self, text: &str) -> Result<Capsule, ImportError> {
        transfer::import_capsule_json(&self.capsules, text)
    }

    // ==================== Display ====================

    pub fn time_ago(&self, timestamp: DateTime<Utc>) -> String {
        display::time_ago(timestamp, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capsules::{Flashcard, Level};
    use crate::clock::FixedClock;
    use crate::kv::MemoryStore;
    use chrono::{Duration, TimeZone};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_classroom() -> (Classroom<MemoryStore>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 2, 10, 8, 30, 0).unwrap(),
        ));
        let classroom = Classroom::with_clock(Arc::new(MemoryStore::new()), clock.clone());
        (classroom, clock)
    }

    fn capsule_with_cards(title: &str, cards: usize) -> Capsule {
        let mut capsule = Capsule::new(title);
        capsule.meta.subject = "Languages".to_string();
        capsule.meta.level = Level::Advanced;
        capsule.flashcards = (0..cards)
            .map(|i| Flashcard::new(format!("word {}", i), format!("meaning {}", i)))
            .collect();
        capsule
    }

    #[test]
    fn test_round_trip_with_fresh_id() {
        let (classroom, clock) = create_test_classroom();
        let mut capsule = capsule_with_cards("Spanish verbs", 2);
        capsule.id = classroom.generate_id();

        let saved = classroom.save_capsule(&capsule).unwrap();
        let loaded = classroom.get_capsule(&capsule.id).unwrap();
        assert_eq!(loaded.meta, capsule.meta);
        assert_eq!(loaded.flashcards, capsule.flashcards);
        assert_eq!(loaded.updated_at, clock.now());
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_delete_cascade() {
        let (classroom, _clock) = create_test_classroom();
        let saved = classroom.save_capsule(&capsule_with_cards("Gone", 3)).unwrap();
        classroom.set_flashcard_known(&saved.id, 1, true).unwrap();
        classroom.record_quiz(&saved.id, 1, 2).unwrap();

        classroom.delete_capsule(&saved.id).unwrap();
        assert!(classroom.get_capsule(&saved.id).is_none());
        assert_eq!(classroom.get_progress(&saved.id), Progress::default());
        assert!(classroom.get_capsules_index().iter().all(|e| e.id != saved.id));
    }

    #[test]
    fn test_library_sorted_by_recency_with_progress() {
        let (classroom, clock) = create_test_classroom();
        let older = classroom.save_capsule(&capsule_with_cards("Older", 3)).unwrap();
        clock.advance(Duration::hours(2));
        let newer = classroom.save_capsule(&capsule_with_cards("Newer", 1)).unwrap();

        classroom.set_flashcard_known(&older.id, 0, true).unwrap();
        classroom.set_flashcard_known(&older.id, 2, true).unwrap();
        classroom.record_quiz(&older.id, 3, 4).unwrap();

        let library = classroom.library();
        assert_eq!(library.len(), 2);
        assert_eq!(library[0].entry.id, newer.id);
        assert_eq!(library[0].best_score, 0);
        assert_eq!(library[1].entry.id, older.id);
        assert_eq!(library[1].flashcard_count, Some(3));
        assert_eq!(library[1].known_count, 2);
        assert_eq!(library[1].best_score, 75);

        assert_eq!(classroom.time_ago(older.updated_at), "2h ago");
        assert_eq!(classroom.time_ago(newer.updated_at), "just now");
    }

    #[test]
    fn test_record_quiz_keeps_best() {
        let (classroom, _clock) = create_test_classroom();
        let outcome = classroom.record_quiz("c", 7, 10).unwrap();
        assert_eq!(outcome, QuizOutcome { score: 70, best_score: 70, new_best: true });

        let outcome = classroom.record_quiz("c", 5, 10).unwrap();
        assert_eq!(outcome, QuizOutcome { score: 50, best_score: 70, new_best: false });

        let outcome = classroom.record_quiz("c", 9, 10).unwrap();
        assert_eq!(outcome.best_score, 90);
        assert_eq!(classroom.get_progress("c").best_score, 90);
    }

    #[test]
    fn test_seed_sample_only_when_empty() {
        let (classroom, _clock) = create_test_classroom();
        let seeded = classroom.seed_sample_if_empty().unwrap().unwrap();
        assert_eq!(seeded.meta.title, "JavaScript Fundamentals");
        assert!(classroom.seed_sample_if_empty().unwrap().is_none());
        assert_eq!(classroom.get_capsules_index().len(), 1);
    }

    #[test]
    fn test_validation_gate_examples() {
        let (classroom, _clock) = create_test_classroom();
        assert!(classroom.validate_capsule(&json!({})).is_err());
        assert!(matches!(
            classroom.validate_capsule(&json!({ "schema": "wrong", "meta": { "title": "x" }, "notes": ["a"] })),
            Err(ValidationError::UnsupportedSchema { .. })
        ));
        assert_eq!(
            classroom.validate_capsule(&json!({ "schema": "pocket-classroom/v1", "meta": { "title": "x" }, "notes": [] })),
            Err(ValidationError::NoContent)
        );
        assert!(classroom
            .validate_capsule(&json!({ "schema": "pocket-classroom/v1", "meta": { "title": "x" }, "notes": ["a"] }))
            .is_ok());
    }

    #[test]
    fn test_export_import_through_facade() {
        let (classroom, _clock) = create_test_classroom();
        let saved = classroom.save_capsule(&capsule_with_cards("Vocab", 2)).unwrap();
        let text = classroom.export_capsule(&saved).unwrap();
        let payload: Value = serde_json::from_str(&text).unwrap();
        assert!(classroom.validate_capsule(&payload).is_ok());

        let imported = classroom.import_capsule_json(&text).unwrap();
        assert_ne!(imported.id, saved.id);
        assert_eq!(classroom.get_capsules_index().len(), 2);
        assert!(classroom.verify_index().unwrap().is_consistent());
    }

    #[test]
    fn test_open_file_backed_classroom() {
        let temp = TempDir::new().unwrap();
        let config = ClassroomConfig {
            data_dir: Some(temp.path().join("store")),
            ..Default::default()
        };

        let id = {
            let classroom = Classroom::open(&config).unwrap();
            let index = classroom.get_capsules_index();
            assert_eq!(index.len(), 1);
            classroom.record_quiz(&index[0].id, 3, 3).unwrap();
            index[0].id.clone()
        };

        // Reopening does not seed again and keeps progress
        let classroom = Classroom::open(&config).unwrap();
        assert_eq!(classroom.get_capsules_index().len(), 1);
        assert_eq!(classroom.get_progress(&id).best_score, 100);
    }

    #[test]
    fn test_open_without_seed() {
        let temp = TempDir::new().unwrap();
        let config = ClassroomConfig {
            data_dir: Some(temp.path().join("store")),
            seed_sample: false,
            ..Default::default()
        };
        let classroom = Classroom::open(&config).unwrap();
        assert!(classroom.get_capsules_index().is_empty());
        assert!(classroom.library().is_empty());
    }
}
