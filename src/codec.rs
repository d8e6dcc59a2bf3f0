//! Record codec
//!
//! Records are stored as JSON text under three key namespaces:
//! ```text
//! pc_capsules_index      # Array of index entries
//! pc_capsule_{id}        # Full capsule record
//! pc_progress_{id}       # Study progress for a capsule
//! ```
//!
//! Decoding parses the text and then runs the record's shape check, so a
//! value that is valid JSON but not a valid record is still rejected.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Schema identifier carried by exported capsules
pub const SCHEMA_VERSION: &str = "pocket-classroom/v1";

pub const INDEX_KEY: &str = "pc_capsules_index";
pub const CAPSULE_PREFIX: &str = "pc_capsule_";
pub const PROGRESS_PREFIX: &str = "pc_progress_";

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record: {0}")]
    Shape(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// A value that can be persisted through the codec.
pub trait Record: Serialize + DeserializeOwned {
    /// Structural checks serde cannot express (ranges, set semantics, ...).
    fn check_shape(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

pub fn capsule_key(id: &str) -> String {
    format!("{}{}", CAPSULE_PREFIX, id)
}

pub fn progress_key(id: &str) -> String {
    format!("{}{}", PROGRESS_PREFIX, id)
}

/// Compact serialization used for stored records
pub fn encode<T: Record>(record: &T) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

/// Parse and shape-check a stored record
pub fn decode<T: Record>(text: &str) -> Result<T> {
    let record: T = serde_json::from_str(text)?;
    record.check_shape().map_err(CodecError::Shape)?;
    Ok(record)
}

#[derive(Serialize)]
struct Tagged<'a, T: Serialize> {
    schema: &'a str,
    #[serde(flatten)]
    record: &'a T,
}

/// Pretty-printed serialization with the schema identifier as the first field
pub fn encode_tagged<T: Serialize>(record: &T) -> Result<String> {
    let tagged = Tagged {
        schema: SCHEMA_VERSION,
        record,
    };
    Ok(serde_json::to_string_pretty(&tagged)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    impl Record for Counter {
        fn check_shape(&self) -> std::result::Result<(), String> {
            if self.value > 10 {
                return Err(format!("value {} out of range", self.value));
            }
            Ok(())
        }
    }

    #[test]
    fn test_keys() {
        assert_eq!(capsule_key("abc"), "pc_capsule_abc");
        assert_eq!(progress_key("abc"), "pc_progress_abc");
    }

    #[test]
    fn test_decode_rejects_bad_json_and_bad_shape() {
        assert_eq!(decode::<Counter>("{\"value\":3}").unwrap(), Counter { value: 3 });
        assert!(matches!(decode::<Counter>("{not json"), Err(CodecError::Json(_))));
        assert!(matches!(decode::<Counter>("\"text\""), Err(CodecError::Json(_))));
        assert!(matches!(
            decode::<Counter>("{\"value\":42}"),
            Err(CodecError::Shape(_))
        ));
    }

    #[test]
    fn test_encode_tagged_puts_schema_first() {
        let text = encode_tagged(&Counter { value: 1 }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["schema"], SCHEMA_VERSION);
        assert_eq!(value["value"], 1);
        assert!(text.trim_start().starts_with("{\n  \"schema\""));
    }
}
