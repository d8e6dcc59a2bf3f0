//! Storage operations for capsules
//!
//! Every capsule is stored as a full record under `pc_capsule_{id}`, and
//! summarized by one entry in the `pc_capsules_index` array. The index is
//! kept eagerly in sync on each save and delete.
//!
//! The store has no multi-key transaction, so `save` and `delete` are two or
//! three separate writes. If one of the later writes fails the operation
//! reports the failure, and the index may disagree with the records until
//! the next successful write or a call to [`CapsuleRepository::rebuild_index`].

use std::sync::Arc;

use thiserror::Error;

use super::models::{generate_id, Capsule, IndexEntry};
use crate::clock::{Clock, SystemClock};
use crate::codec::{self, CodecError, CAPSULE_PREFIX, INDEX_KEY};
use crate::kv::{KeyValueStore, KvError};
use crate::progress::{ProgressError, ProgressTracker};

#[derive(Error, Debug)]
pub enum CapsuleStorageError {
    #[error("Store error: {0}")]
    Store(#[from] KvError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Invalid capsule: {0}")]
    InvalidCapsule(String),

    #[error("Progress error: {0}")]
    Progress(#[from] ProgressError),
}

impl CapsuleStorageError {
    /// Whether the failure was the store running out of space
    pub fn is_quota_exceeded(&self) -> bool {
        match self {
            CapsuleStorageError::Store(e) => e.is_quota_exceeded(),
            CapsuleStorageError::Progress(ProgressError::Store(e)) => e.is_quota_exceeded(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CapsuleStorageError>;

/// Differences between the index and the stored capsule records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexReport {
    /// Index entries whose capsule record is missing or unreadable
    pub orphan_entries: Vec<String>,
    /// Capsule records with no index entry
    pub unindexed_records: Vec<String>,
    /// Index entries whose summary differs from the record
    pub stale_entries: Vec<String>,
    /// Ids listed more than once in the index
    pub duplicate_entries: Vec<String>,
}

impl IndexReport {
    pub fn is_consistent(&self) -> bool {
        self.orphan_entries.is_empty()
            && self.unindexed_records.is_empty()
            && self.stale_entries.is_empty()
            && self.duplicate_entries.is_empty()
    }
}

/// Repository for capsule records and the capsule index
pub struct CapsuleRepository<S: KeyValueStore> {
    store: Arc<S>,
    progress: ProgressTracker<S>,
    clock: Arc<dyn Clock>,
}

impl<S: KeyValueStore> CapsuleRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            progress: ProgressTracker::new(Arc::clone(&store)),
            store,
            clock,
        }
    }

    /// Generate a fresh capsule id
    pub fn generate_id(&self) -> String {
        generate_id()
    }

    // ==================== Index Operations ====================

    /// Get the capsule index in stored order.
    ///
    /// Never fails: an absent, unreadable or malformed index is an empty one.
    pub fn get_index(&self) -> Vec<IndexEntry> {
        let text = match self.store.get(INDEX_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("Error reading capsules index: {}", e);
                return Vec::new();
            }
        };

        match codec::decode::<Vec<IndexEntry>>(&text) {
            Ok(index) => index,
            Err(e) => {
                log::warn!("Malformed capsules index, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Get the capsule index, most recently updated first
    pub fn get_index_by_recency(&self) -> Vec<IndexEntry> {
        let mut index = self.get_index();
        index.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        index
    }

    /// Load the index for a read-modify-write.
    ///
    /// Unlike [`get_index`](Self::get_index), a store failure is returned so
    /// nothing gets written over an index that could not be read. A malformed
    /// index is regenerated from the capsule records instead of being
    /// treated as empty.
    fn load_index(&self) -> Result<Vec<IndexEntry>> {
        let text = match self.store.get(INDEX_KEY)? {
            Some(text) => text,
            None => return Ok(Vec::new()),
        };

        match codec::decode::<Vec<IndexEntry>>(&text) {
            Ok(index) => Ok(index),
            Err(e) => {
                log::warn!("Malformed capsules index, regenerating from records: {}", e);
                self.index_from_records(Vec::new())
            }
        }
    }

    fn save_index(&self, index: Vec<IndexEntry>) -> Result<()> {
        let text = codec::encode(&index)?;
        self.store.set(INDEX_KEY, &text).map_err(|e| {
            log::error!("Error saving capsules index: {}", e);
            e
        })?;
        Ok(())
    }

    // ==================== Capsule Operations ====================

    /// Get a capsule by id. Absent, unreadable and malformed records are all `None`.
    pub fn get_by_id(&self, id: &str) -> Option<Capsule> {
        let text = match self.store.get(&codec::capsule_key(id)) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Error reading capsule {}: {}", id, e);
                return None;
            }
        };

        match codec::decode::<Capsule>(&text) {
            Ok(capsule) if capsule.id == id => Some(capsule),
            Ok(capsule) => {
                log::warn!(
                    "Capsule record {} carries mismatched id {}, ignoring",
                    id,
                    capsule.id
                );
                None
            }
            Err(e) => {
                log::warn!("Malformed capsule record {}: {}", id, e);
                None
            }
        }
    }

    /// Save a capsule, stamping `updatedAt` with the current time.
    ///
    /// Writes the full record and then upserts its index entry. Returns the
    /// capsule as persisted.
    pub fn save(&self, capsule: &Capsule) -> Result<Capsule> {
        capsule.check().map_err(CapsuleStorageError::InvalidCapsule)?;
        let mut index = self.load_index()?;

        let mut saved = capsule.clone();
        saved.updated_at = self.clock.now();

        let text = codec::encode(&saved)?;
        self.store
            .set(&codec::capsule_key(&saved.id), &text)
            .map_err(|e| {
                log::error!("Error saving capsule {}: {}", saved.id, e);
                e
            })?;

        let entry = IndexEntry::from(&saved);
        match index.iter().position(|e| e.id == saved.id) {
            Some(pos) => index[pos] = entry,
            None => index.push(entry),
        }
        self.save_index(index)?;

        log::info!("Saved capsule '{}' ({})", saved.meta.title, saved.id);
        Ok(saved)
    }

    /// Delete a capsule, its progress and its index entry.
    ///
    /// Deleting an id that does not exist succeeds.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut index = self.load_index()?;

        self.store.remove(&codec::capsule_key(id))?;
        self.progress.remove(id)?;

        let before = index.len();
        index.retain(|e| e.id != id);
        if index.len() != before {
            self.save_index(index)?;
        }

        log::info!("Deleted capsule {}", id);
        Ok(())
    }

    // ==================== Consistency ====================

    /// Ids of every stored capsule record
    fn record_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter_map(|k| k.strip_prefix(CAPSULE_PREFIX).map(str::to_string))
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Compare the index with the stored capsule records
    pub fn verify_index(&self) -> Result<IndexReport> {
        let index = self.get_index();
        let mut report = IndexReport::default();

        let mut seen = std::collections::HashSet::new();
        for entry in &index {
            if !seen.insert(entry.id.as_str()) {
                report.duplicate_entries.push(entry.id.clone());
                continue;
            }
            match self.get_by_id(&entry.id) {
                None => report.orphan_entries.push(entry.id.clone()),
                Some(capsule) if IndexEntry::from(&capsule) != *entry => {
                    report.stale_entries.push(entry.id.clone())
                }
                Some(_) => {}
            }
        }

        for id in self.record_ids()? {
            if !seen.contains(id.as_str()) {
                report.unindexed_records.push(id);
            }
        }

        Ok(report)
    }

    /// Regenerate the index from the stored capsule records.
    ///
    /// Entries keep their existing order; records missing from the index are
    /// appended oldest first. Unreadable records are left out. Returns the
    /// number of entries written.
    pub fn rebuild_index(&self) -> Result<usize> {
        let rebuilt = self.index_from_records(self.get_index())?;
        let count = rebuilt.len();
        self.save_index(rebuilt)?;
        log::info!("Rebuilt capsules index with {} entries", count);
        Ok(count)
    }

    /// Index entries for every readable record, ordered as in `existing`
    /// with the rest appended oldest first
    fn index_from_records(&self, existing: Vec<IndexEntry>) -> Result<Vec<IndexEntry>> {
        let mut remaining: Vec<Capsule> = self
            .record_ids()?
            .iter()
            .filter_map(|id| self.get_by_id(id))
            .collect();

        let mut rebuilt = Vec::with_capacity(remaining.len());
        for entry in existing {
            if let Some(pos) = remaining.iter().position(|c| c.id == entry.id) {
                let capsule = remaining.swap_remove(pos);
                rebuilt.push(IndexEntry::from(&capsule));
            }
        }

        remaining.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));
        rebuilt.extend(remaining.iter().map(IndexEntry::from));
        Ok(rebuilt)
    }
}
