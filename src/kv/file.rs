//! File-backed store
//!
//! Directory structure:
//! ```text
//! {root}/
//! ├── pc_capsules_index.kv
//! ├── pc_capsule_{id}.kv
//! └── pc_progress_{id}.kv
//! ```
//!
//! Keys are escaped into file names: ASCII alphanumerics, `-` and `_` pass
//! through, every other byte becomes `%XX`.

use std::fs;
use std::path::PathBuf;

use super::{entry_size, KeyValueStore, KvError, Result};

const EXTENSION: &str = "kv";
const TEMP_EXTENSION: &str = "kv.tmp";

/// Store keeping one file per key under a root directory
pub struct FileStore {
    root: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            quota_bytes: None,
        })
    }

    /// Open a store that refuses writes beyond `quota_bytes`.
    pub fn open_with_quota(root: PathBuf, quota_bytes: u64) -> Result<Self> {
        let mut store = Self::open(root)?;
        store.quota_bytes = Some(quota_bytes);
        Ok(store)
    }

    /// Get the file path for a key
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(KvError::InvalidKey("empty key".to_string()));
        }
        Ok(self.root.join(format!("{}.{}", escape_key(key), EXTENSION)))
    }

    /// Bytes used by every key except `skip`
    fn used_bytes_except(&self, skip: &str) -> Result<u64> {
        let mut used = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != EXTENSION) {
                continue;
            }
            let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(unescape_key)
            else {
                continue;
            };
            if key == skip {
                continue;
            }
            used += key.len() as u64 + entry.metadata()?.len();
        }
        Ok(used)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;

        if let Some(quota) = self.quota_bytes {
            let needed = entry_size(key, value);
            let available = quota.saturating_sub(self.used_bytes_except(key)?);
            if needed > available {
                return Err(KvError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available,
                });
            }
        }

        // Write beside the target then rename, so a failed write keeps the old value
        let temp_path = path.with_extension(TEMP_EXTENSION);
        fs::write(&temp_path, value)?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == EXTENSION) {
                if let Some(key) = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(unescape_key)
                {
                    keys.push(key);
                }
            }
        }
        Ok(keys)
    }
}

fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn unescape_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
