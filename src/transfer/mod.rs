//! Capsule import and export
//!
//! Exported files are the capsule's full record with the schema identifier
//! as an extra top-level field. Imports go through [`validate`], then have
//! the schema tag dropped and a fresh id assigned before being saved, so an
//! imported file can never overwrite an existing capsule.

pub mod validate;

pub use validate::{validate, ValidationError};

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::capsules::{Capsule, CapsuleMeta, CapsuleRepository, CapsuleStorageError, Flashcard, QuizQuestion};
use crate::codec::{self, CodecError};
use crate::display::slugify;
use crate::kv::KeyValueStore;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to parse capsule file: {0}")]
    Parse(serde_json::Error),

    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("Malformed capsule data: {0}")]
    Malformed(serde_json::Error),

    #[error("Failed to save imported capsule: {0}")]
    Save(#[from] CapsuleStorageError),
}

/// Fields taken from an import payload. Everything else (schema, id,
/// updatedAt, unknown extras) is discarded.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportPayload {
    meta: CapsuleMeta,
    #[serde(default)]
    notes: Vec<String>,
    #[serde(default)]
    flashcards: Vec<Flashcard>,
    #[serde(default)]
    quiz: Vec<QuizQuestion>,
}

/// Serialize a capsule for export, tagged with the schema identifier
pub fn export(capsule: &Capsule) -> Result<String, CodecError> {
    codec::encode_tagged(capsule)
}

/// Suggested file name for an exported capsule
pub fn export_file_name(capsule: &Capsule) -> String {
    let slug = slugify(&capsule.meta.title);
    if slug.is_empty() {
        format!("{}.json", capsule.id)
    } else {
        format!("{}.json", slug)
    }
}

/// Validate a payload and turn it into a capsule under `new_id`.
///
/// The returned capsule has not been stored.
pub fn prepare_import(payload: &Value, new_id: String) -> Result<Capsule, ImportError> {
    validate(payload)?;

    let parsed = ImportPayload::deserialize(payload).map_err(ImportError::Malformed)?;
    Ok(Capsule {
        id: new_id,
        meta: parsed.meta,
        notes: parsed.notes,
        flashcards: parsed.flashcards,
        quiz: parsed.quiz,
        updated_at: Utc::now(),
    })
}

/// Import a parsed payload into the repository under a freshly generated id
pub fn import_capsule<S: KeyValueStore>(
    repo: &CapsuleRepository<S>,
    payload: &Value,
) -> Result<Capsule, ImportError> {
    let capsule = prepare_import(payload, repo.generate_id())?;
    let saved = repo.save(&capsule)?;
    log::info!("Imported capsule '{}' as {}", saved.meta.title, saved.id);
    Ok(saved)
}

/// Import the raw text of an exported capsule file
pub fn import_capsule_json<S: KeyValueStore>(
    repo: &CapsuleRepository<S>,
    text: &str,
) -> Result<Capsule, ImportError> {
    let payload: Value = serde_json::from_str(text).map_err(ImportError::Parse)?;
    import_capsule(repo, &payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capsules::sample::sample_capsule;
    use crate::kv::MemoryStore;
    use crate::SCHEMA_VERSION;
    use serde_json::json;
    use std::sync::Arc;

    fn create_test_repo() -> (CapsuleRepository<MemoryStore>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (CapsuleRepository::new(Arc::clone(&store)), store)
    }

    #[test]
    fn test_export_is_accepted_by_validate() {
        let (repo, _store) = create_test_repo();
        let saved = repo.save(&sample_capsule()).unwrap();

        let text = export(&saved).unwrap();
        let payload: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(validate(&payload), Ok(()));

        assert_eq!(payload["schema"], SCHEMA_VERSION);
        assert_eq!(payload["id"], saved.id.as_str());
        assert_eq!(payload["meta"]["title"], "JavaScript Fundamentals");
        assert_eq!(payload["meta"]["level"], "Beginner");
        assert_eq!(payload["quiz"][0]["correctIndex"], 2);
        assert_eq!(payload["quiz"][0]["choices"].as_array().unwrap().len(), 4);
        assert!(payload["updatedAt"].is_string());
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let (repo, _store) = create_test_repo();
        let original = repo.save(&sample_capsule()).unwrap();

        let imported = import_capsule_json(&repo, &export(&original).unwrap()).unwrap();
        assert_ne!(imported.id, original.id);
        assert_eq!(imported.meta, original.meta);
        assert_eq!(imported.notes, original.notes);
        assert_eq!(imported.flashcards, original.flashcards);
        assert_eq!(imported.quiz, original.quiz);
        assert_eq!(repo.get_index().len(), 2);
    }

    #[test]
    fn test_import_never_reuses_payload_id() {
        let (repo, _store) = create_test_repo();
        let mut existing = sample_capsule();
        existing.meta.title = "Original".to_string();
        let existing = repo.save(&existing).unwrap();

        let payload = json!({
            "schema": SCHEMA_VERSION,
            "id": existing.id,
            "meta": { "title": "Intruder" },
            "notes": ["overwrite?"],
            "updatedAt": "2020-01-01T00:00:00.000Z"
        });
        let imported = import_capsule(&repo, &payload).unwrap();

        assert_ne!(imported.id, existing.id);
        assert_eq!(repo.get_by_id(&existing.id).unwrap(), existing);
        assert_eq!(repo.get_by_id(&imported.id).unwrap().meta.title, "Intruder");
        assert_eq!(repo.get_index().len(), 2);
    }

    #[test]
    fn test_import_without_optional_fields() {
        let (repo, _store) = create_test_repo();
        let payload = json!({ "schema": SCHEMA_VERSION, "meta": { "title": "Minimal" }, "notes": ["a"] });
        let imported = import_capsule(&repo, &payload).unwrap();
        assert_eq!(imported.meta.subject, "");
        assert!(imported.flashcards.is_empty());
    }

    #[test]
    fn test_invalid_import_leaves_store_untouched() {
        let (repo, store) = create_test_repo();

        let err = import_capsule(&repo, &json!({ "schema": "wrong", "meta": { "title": "x" }, "notes": ["a"] }))
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::Invalid(ValidationError::UnsupportedSchema { .. })
        ));

        let err = import_capsule_json(&repo, "{ nope").unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));

        let three_choices = json!({
            "schema": SCHEMA_VERSION, "meta": { "title": "x" },
            "quiz": [{ "question": "q", "choices": ["a", "b", "c"], "correctIndex": 0 }]
        });
        assert!(matches!(
            import_capsule(&repo, &three_choices).unwrap_err(),
            ImportError::Malformed(_)
        ));

        let bad_index = json!({
            "schema": SCHEMA_VERSION, "meta": { "title": "x" },
            "quiz": [{ "question": "q", "choices": ["a", "b", "c", "d"], "correctIndex": 9 }]
        });
        assert!(matches!(
            import_capsule(&repo, &bad_index).unwrap_err(),
            ImportError::Save(CapsuleStorageError::InvalidCapsule(_))
        ));

        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_export_file_name() {
        let mut capsule = sample_capsule();
        assert_eq!(export_file_name(&capsule), "javascript-fundamentals.json");

        capsule.meta.title = "C++ & Rust: A Tale!".to_string();
        assert_eq!(export_file_name(&capsule), "c-rust-a-tale.json");

        capsule.meta.title = "???".to_string();
        assert_eq!(export_file_name(&capsule), format!("{}.json", capsule.id));
    }
}
