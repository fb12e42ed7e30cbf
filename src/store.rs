//! Local key/value persistence for form fields
//!
//! Best-effort convenience state: values survive restarts but nothing here
//! is transactional or kept consistent with the chain.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{AirdropError, Result};

/// String key/value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store, used when persistence is disabled and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| AirdropError::Storage("store lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| AirdropError::Storage("store lock poisoned".to_string()))?
            .remove(key);
        Ok(())
    }
}

/// JSON file backed store.
///
/// The whole file is rewritten on every change. A missing or unreadable file
/// starts out empty.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                debug!("Ignoring unreadable store file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AirdropError::Storage("store lock poisoned".to_string()))?;
        apply(&mut entries);

        let content = serde_json::to_string_pretty(&*entries)
            .map_err(|e| AirdropError::Storage(format!("Failed to serialize store: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| AirdropError::Storage(format!("Failed to create {}: {}", parent.display(), e)))?;
        }
        std::fs::write(&self.path, content)
            .map_err(|e| AirdropError::Storage(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("lastAmounts"), None);

        store.set("lastAmounts", "100, 200").unwrap();
        assert_eq!(store.get("lastAmounts").as_deref(), Some("100, 200"));
        assert_eq!(store.len(), 1);

        store.remove("lastAmounts").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("form.json");

        let store = FileStore::open(&path);
        store.set("lastTokenAddress", "0xabc").unwrap();
        store.set("lastRecipients", "0x1\n0x2").unwrap();
        store.remove("lastTokenAddress").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("lastTokenAddress"), None);
        assert_eq!(reopened.get("lastRecipients").as_deref(), Some("0x1\n0x2"));
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("lastAmounts"), None);

        store.set("lastAmounts", "1").unwrap();
        assert_eq!(FileStore::open(&path).get("lastAmounts").as_deref(), Some("1"));
    }
}
