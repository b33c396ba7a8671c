//! Local device storage for the guest cart and the session snapshot.
//!
//! Storage is read and written wholesale (one JSON blob per key) so a
//! partial write can never leave a half-updated cart behind. Malformed
//! payloads are logged and treated as absent, never surfaced as errors.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key under which the guest cart blob is persisted
pub const CART_STORAGE_KEY: &str = "leopardo_cart";

/// Key under which the session's user snapshot is persisted
pub const USER_STORAGE_KEY: &str = "leopardo_user";

/// Whole-value key/value storage, the client's stand-in for the browser's
/// local storage
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage, used in tests and for sessions that should not
/// persist anything
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().unwrap().remove(key);
    }
}

/// File-backed storage: one file per key under a directory. Writes go to a
/// temporary file first and are renamed into place, keeping the whole-value
/// guarantee on disk.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            log::warn!("storage: cannot create {}: {}", self.dir.display(), err);
            return;
        }
        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        if let Err(err) = fs::write(&tmp, value).and_then(|_| fs::rename(&tmp, &target)) {
            log::warn!("storage: write of {} failed: {}", key, err);
        }
    }

    fn remove(&self, key: &str) {
        if let Err(err) = fs::remove_file(self.path_for(key)) {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::warn!("storage: remove of {} failed: {}", key, err);
            }
        }
    }
}

/// Read and deserialize a stored blob. A missing key or a corrupt payload
/// both come back as `None`; corruption is logged.
pub fn read_json<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Option<T> {
    let raw = storage.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("storage: discarding corrupt payload under {}: {}", key, err);
            None
        }
    }
}

/// Serialize and store a value wholesale under a key
pub fn write_json<T: Serialize>(storage: &dyn KeyValueStorage, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => storage.set(key, &raw),
        Err(err) => log::warn!("storage: serialization for {} failed: {}", key, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        storage.set("k", "v");
        assert_eq!(storage.get("k").as_deref(), Some("v"));
        storage.remove("k");
        assert_eq!(storage.get("k"), None);
    }

    #[test]
    fn corrupt_payload_reads_as_absent() {
        let storage = MemoryStorage::new();
        storage.set(CART_STORAGE_KEY, "{not json");
        let read: Option<Vec<u32>> = read_json(&storage, CART_STORAGE_KEY);
        assert!(read.is_none());
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        write_json(&storage, USER_STORAGE_KEY, &vec![1, 2, 3]);
        let read: Option<Vec<u32>> = read_json(&storage, USER_STORAGE_KEY);
        assert_eq!(read, Some(vec![1, 2, 3]));
        storage.remove(USER_STORAGE_KEY);
        assert_eq!(storage.get(USER_STORAGE_KEY), None);
        // Removing twice is fine.
        storage.remove(USER_STORAGE_KEY);
    }
}
