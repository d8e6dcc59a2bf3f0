//! Data models for study capsules

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::Record;

/// Number of choices every quiz question carries
pub(crate) const CHOICES_PER_QUESTION: usize = 4;

/// Generate a capsule id.
///
/// UUIDv7: a millisecond timestamp followed by 74 random bits, rendered
/// without hyphens.
pub fn generate_id() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Difficulty level of a capsule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(format!("unknown level '{}'", other)),
        }
    }
}

/// Descriptive metadata of a capsule
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleMeta {
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub description: String,
}

/// A flashcard. Its position in the capsule is its identity for progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// A multiple-choice question with exactly four choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub choices: [String; CHOICES_PER_QUESTION],
    /// Index into `choices`, 0..=3
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }
}

/// A self-contained study unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capsule {
    pub id: String,
    pub meta: CapsuleMeta,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
    pub updated_at: DateTime<Utc>,
}

impl Capsule {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            meta: CapsuleMeta {
                title: title.into(),
                ..Default::default()
            },
            notes: Vec::new(),
            flashcards: Vec::new(),
            quiz: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Whether any of notes, flashcards or quiz is non-empty
    pub fn has_content(&self) -> bool {
        !self.notes.is_empty() || !self.flashcards.is_empty() || !self.quiz.is_empty()
    }

    /// Check the invariants a capsule must hold before it is persisted.
    ///
    /// Returns the first problem found.
    pub fn check(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("missing id".to_string());
        }
        if self.meta.title.trim().is_empty() {
            return Err("missing title".to_string());
        }
        if !self.has_content() {
            return Err("capsule must have at least one type of content".to_string());
        }
        if let Some(pos) = self.notes.iter().position(|n| n.trim().is_empty()) {
            return Err(format!("note {} is empty", pos + 1));
        }
        self.check_quiz()
    }

    fn check_quiz(&self) -> Result<(), String> {
        for (i, q) in self.quiz.iter().enumerate() {
            if q.correct_index >= CHOICES_PER_QUESTION {
                return Err(format!(
                    "quiz question {} has correct index {} (expected 0-{})",
                    i + 1,
                    q.correct_index,
                    CHOICES_PER_QUESTION - 1
                ));
            }
        }
        Ok(())
    }
}

impl Record for Capsule {
    fn check_shape(&self) -> Result<(), String> {
        self.check_quiz()
    }
}

/// Summary of a capsule kept in the index for listing without loading records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub level: Level,
    pub updated_at: DateTime<Utc>,
}

impl From<&Capsule> for IndexEntry {
    fn from(capsule: &Capsule) -> Self {
        Self {
            id: capsule.id.clone(),
            title: capsule.meta.title.clone(),
            subject: capsule.meta.subject.clone(),
            level: capsule.meta.level,
            updated_at: capsule.updated_at,
        }
    }
}

impl Record for Vec<IndexEntry> {}
