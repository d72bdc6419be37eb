//! Durable Key/Value Storage
//!
//! The client equivalent of the browser's local storage: string keys mapped
//! to string values, surviving restarts when file-backed.
//!
//! Batch operations (`get_many`, `set_many`, `remove_many`) are atomic with
//! respect to each other, so a reader never observes half of a batch write.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use kernel::error::app_error::AppError;
use parking_lot::Mutex;
use thiserror::Error;

/// Storage backend error
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is not a JSON string map: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::internal("Local session storage is unavailable").with_source(err)
    }
}

/// Key/value storage backend
pub trait KeyValueStorage: Send + Sync {
    /// Read one key
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Read several keys from a single consistent snapshot
    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StorageError>;

    /// Write several keys in one atomic step
    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError>;

    /// Remove several keys in one atomic step
    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StorageError> {
        (**self).get_many(keys)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        (**self).set_many(entries)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        (**self).remove_many(keys)
    }
}

// ============================================================================
// In-memory storage
// ============================================================================

/// Process-local storage, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated storage
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Copy of every entry
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StorageError> {
        let entries = self.entries.lock();
        Ok(keys.iter().map(|k| entries.get(*k).cloned()).collect())
    }

    fn set_many(&self, batch: &[(&str, String)]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        for (key, value) in batch {
            entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

// ============================================================================
// File-backed storage
// ============================================================================

/// Storage persisted as a JSON object file.
///
/// Every write replaces the file through a sibling temp file and a rename,
/// so a crash mid-write leaves either the old or the new content.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let body = serde_json::to_vec_pretty(entries).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let mut file = fs::File::create(&tmp_path).map_err(io_err)?;
        file.write_all(&body).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(io_err)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StorageError> {
        let _guard = self.lock.lock();
        let entries = self.load()?;
        Ok(keys.iter().map(|k| entries.get(*k).cloned()).collect())
    }

    fn set_many(&self, batch: &[(&str, String)]) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        for (key, value) in batch {
            entries.insert((*key).to_string(), value.clone());
        }
        self.persist(&entries)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        let before = entries.len();
        for key in keys {
            entries.remove(*key);
        }
        if entries.len() == before {
            return Ok(());
        }
        self.persist(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_set_and_get_many() {
        let storage = MemoryStorage::new();
        storage
            .set_many(&[("a", "1".to_string()), ("b", "2".to_string())])
            .unwrap();

        assert_eq!(storage.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(
            storage.get_many(&["a", "b", "c"]).unwrap(),
            vec![Some("1".to_string()), Some("2".to_string()), None]
        );
    }

    #[test]
    fn test_memory_remove_many_leaves_other_keys() {
        let storage = MemoryStorage::with_entries([("a", "1"), ("b", "2"), ("theme", "dark")]);
        storage.remove_many(&["a", "b"]).unwrap();

        assert_eq!(storage.snapshot().len(), 1);
        assert_eq!(storage.get("theme").unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        FileStorage::new(&path)
            .set_many(&[("email", "a@x.com".to_string())])
            .unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("email").unwrap(), Some("a@x.com".to_string()));
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("absent.json"));

        assert_eq!(storage.get("email").unwrap(), None);
        storage.remove_many(&["email"]).unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_file_storage_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("session.json"));

        storage.set_many(&[("k", "v".to_string())]).unwrap();
        assert!(storage.path().exists());
    }

    #[test]
    fn test_file_storage_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get("email"),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_file_storage_remove_many() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        storage
            .set_many(&[("a", "1".to_string()), ("b", "2".to_string())])
            .unwrap();

        storage.remove_many(&["a"]).unwrap();

        assert_eq!(
            storage.get_many(&["a", "b"]).unwrap(),
            vec![None, Some("2".to_string())]
        );
    }
}
