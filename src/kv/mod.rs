//! Key-value store adapter
//!
//! The persistence core only ever talks to a synchronous, string-keyed,
//! string-valued store. Two backends are provided:
//! - [`MemoryStore`] keeps everything in a map (tests, ephemeral sessions)
//! - [`FileStore`] keeps one file per key under a directory
//!
//! Both can be given a byte quota. Exceeding it is reported as
//! [`KvError::QuotaExceeded`] and nothing is written.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Default capacity, matching the per-origin budget browsers give local storage.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum KvError {
    #[error("Storage quota exceeded writing '{key}': needed {needed} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        needed: u64,
        available: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl KvError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, KvError::QuotaExceeded { .. })
    }
}

pub type Result<T> = std::result::Result<T, KvError>;

/// A synchronous string key-value store.
///
/// Writes either commit fully or fail; a failed `set` leaves the previous
/// value (if any) in place.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Size a key/value pair is charged against a quota.
pub(crate) fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}
