//! # Session Stores
//!
//! A tiny string key-value store standing in for browser local storage.
//! The demo keeps exactly one key in it (the signed-in email), but the
//! store doesn't care.
//!
//! [`MemorySessionStore`] forgets everything on exit. [`FileSessionStore`]
//! keeps a JSON object on disk and writes it through on every mutation, so
//! a restarted server still knows who was signed in.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

/// Errors raised by a session store backend.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Reading or writing the backing file failed.
    #[error("session store I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object of strings.
    #[error("corrupt session file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage for session flags.
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), SessionStoreError>;

    /// Makes sure everything written so far is durable.
    fn flush(&self) -> Result<(), SessionStoreError> {
        Ok(())
    }
}

/// Process-lifetime store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// A store persisted as a JSON object in a single file.
///
/// The whole map is rewritten on each mutation. Fine for one key.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// Opens (or lazily creates) the store at `path`. A missing file is an
    /// empty store; a corrupt one is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionStoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
                SessionStoreError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(SessionStoreError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "session store opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionStoreError> {
        let io_err = |source: std::io::Error| SessionStoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        // Serializing a map of strings cannot fail.
        let body = serde_json::to_vec_pretty(entries).unwrap_or_default();
        std::fs::write(&self.path, body).map_err(io_err)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), SessionStoreError> {
        let entries = self.entries.lock();
        self.persist(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("session.json");

        {
            let store = FileSessionStore::open(&path).unwrap();
            assert_eq!(store.get("auth_email").unwrap(), None);
            store.set("auth_email", "alice@example.com").unwrap();
        }

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("auth_email").unwrap().as_deref(),
            Some("alice@example.com")
        );

        reopened.remove("auth_email").unwrap();
        let again = FileSessionStore::open(&path).unwrap();
        assert_eq!(again.get("auth_email").unwrap(), None);
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();

        let result = FileSessionStore::open(&path);
        assert!(matches!(result, Err(SessionStoreError::Corrupt { .. })));
    }

    #[test]
    fn file_store_treats_empty_file_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"").unwrap();

        let store = FileSessionStore::open(&path).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
        store.flush().unwrap();
        assert!(path.exists());
    }
}
