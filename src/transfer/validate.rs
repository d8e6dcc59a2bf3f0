//! Structural gate for externally supplied capsule data
//!
//! Checks run in order and stop at the first failure:
//! 1. the payload is a JSON object
//! 2. it carries exactly the supported schema identifier
//! 3. `meta.title` is a non-empty string
//! 4. at least one of `notes`, `flashcards`, `quiz` is a non-empty array

use serde_json::Value;
use thiserror::Error;

use crate::codec::SCHEMA_VERSION;

/// Why a payload was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid data format")]
    InvalidFormat,

    #[error("Unsupported schema version")]
    UnsupportedSchema { found: Option<String> },

    #[error("Missing or invalid title")]
    MissingTitle,

    #[error("Capsule must have at least one type of content")]
    NoContent,
}

const CONTENT_FIELDS: [&str; 3] = ["notes", "flashcards", "quiz"];

/// Validate a payload before it is imported
pub fn validate(payload: &Value) -> Result<(), ValidationError> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationError::InvalidFormat);
    };

    match object.get("schema") {
        Some(Value::String(schema)) if schema == SCHEMA_VERSION => {}
        other => {
            return Err(ValidationError::UnsupportedSchema {
                found: other.map(|v| match v {
                    Value::String(s) => s.clone(),
                    v => v.to_string(),
                }),
            })
        }
    }

    let title = object
        .get("meta")
        .and_then(|meta| meta.get("title"))
        .and_then(Value::as_str);
    if title.map_or(true, |t| t.trim().is_empty()) {
        return Err(ValidationError::MissingTitle);
    }

    let has_content = CONTENT_FIELDS.iter().any(|field| {
        object
            .get(*field)
            .and_then(Value::as_array)
            .map_or(false, |items| !items.is_empty())
    });
    if !has_content {
        return Err(ValidationError::NoContent);
    }

    Ok(())
}
