//! Local persistence and data-integrity core for Pocket Classroom.
//!
//! Capsules (notes, flashcards, quizzes) and per-capsule study progress are
//! kept in a synchronous key-value store. Front ends go through
//! [`Classroom`].

pub mod capsules;
pub mod classroom;
pub mod clock;
pub mod codec;
pub mod config;
pub mod display;
pub mod kv;
pub mod progress;
pub mod transfer;

pub use classroom::{Classroom, ClassroomError, LibraryCard, QuizOutcome};
pub use codec::SCHEMA_VERSION;
pub use config::ClassroomConfig;
