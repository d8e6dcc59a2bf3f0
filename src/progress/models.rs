//! Data models for study progress

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::codec::Record;

/// Highest quiz score, in percent
pub const MAX_SCORE: u32 = 100;

/// Study state for one capsule
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Best quiz score so far, 0-100
    #[serde(default)]
    pub best_score: u32,
    /// Positions of flashcards marked as known
    #[serde(default)]
    pub known_flashcards: BTreeSet<usize>,
}

impl Progress {
    /// Mark a flashcard as known. Returns false if it already was.
    pub fn mark_known(&mut self, index: usize) -> bool {
        self.known_flashcards.insert(index)
    }

    /// Mark a flashcard as not known. Returns false if it wasn't known.
    pub fn mark_unknown(&mut self, index: usize) -> bool {
        self.known_flashcards.remove(&index)
    }

    pub fn is_known(&self, index: usize) -> bool {
        self.known_flashcards.contains(&index)
    }

    /// Record a quiz score. The best score only ever goes up; returns true
    /// if `score` beat it.
    pub fn record_score(&mut self, score: u32) -> bool {
        let score = score.min(MAX_SCORE);
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    /// Number of known cards among the first `flashcard_count` positions
    pub fn known_count(&self, flashcard_count: usize) -> usize {
        self.known_flashcards.range(..flashcard_count).count()
    }
}

impl Record for Progress {
    fn check_shape(&self) -> Result<(), String> {
        if self.best_score > MAX_SCORE {
            return Err(format!(
                "best score {} exceeds {}",
                self.best_score, MAX_SCORE
            ));
        }
        Ok(())
    }
}

/// Percentage of correct answers, rounded half away from zero
pub fn quiz_score(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    ((correct as f64 / total as f64) * 100.0).round() as u32
}
