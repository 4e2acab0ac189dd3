//! Persisted key-value port.
//!
//! The engine's entire durability contract is a synchronous dictionary of
//! string keys to string values (get/set/remove), the shape of browser local
//! storage. This crate defines that port plus two implementations: an
//! in-memory map for tests and a JSON-file-backed store for real use.

pub mod file;

use std::collections::HashMap;

use thiserror::Error;

pub use file::FileStore;

/// Infrastructure failure while reading or writing the backing medium.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous string key-value store.
///
/// One writer, one reader, no cross-process coordination: if two processes
/// open the same backing medium, the last writer wins.
pub trait KeyValueStore {
    /// Read a value. Absence is an ordinary answer, not an error.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value, if present.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k"), None);

        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v1"));

        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v2"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }
}
