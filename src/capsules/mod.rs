//! Study capsules for Pocket Classroom
//!
//! This module provides:
//! - The capsule data model (metadata, notes, flashcards, quiz)
//! - The capsule index of summaries for listing
//! - Capsule CRUD with eager index maintenance
//! - A demo capsule for empty libraries

pub mod models;
pub mod sample;
pub mod storage;

pub use models::*;
pub use storage::{CapsuleRepository, CapsuleStorageError, IndexReport};
