//! JSON-file-backed key-value store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{KeyValueStore, StoreError};

/// Key-value store persisted as a single JSON object in one file.
///
/// Local-storage semantics: the whole map is loaded once at open and the
/// file is rewritten in full on every write. Small single-user data sets
/// only; there is no locking against other processes.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open (or create) a store at the default per-user data location.
    pub fn open_default() -> Result<Self, StoreError> {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::open(base.join("khata").join("store.json"))
    }

    /// Open (or create) a store backed by `path`.
    ///
    /// A missing file is an empty store. A corrupt file is also treated as
    /// empty, logged at `warn`; its content will be overwritten by the next
    /// write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "corrupt store file, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
