//! Durable draft storage.
//!
//! A [`DraftStore`] is a flat key-value slot for serialized form drafts: one
//! opaque string per key, no versioning. Readers must tolerate an absent key
//! (no saved draft). The autosave channel is the only writer of a given slot
//! and the form initializer its only reader, so per-slot access needs no
//! locking beyond what the backend provides.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Errors raised by draft storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid draft key: {0:?}")]
    InvalidKey(String),
}

/// A flat key-value slot for serialized drafts.
pub trait DraftStore: Send + Sync {
    /// Read a slot. `Ok(None)` means no draft has been saved under this key.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite a slot.
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a slot. Removing an absent key is not an error.
    fn clear(&self, key: &str) -> Result<(), StoreError>;
}

/// File-backed store: one document per key under a directory.
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let well_formed = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !well_formed {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(body) => Ok(Some(body)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::write(&path, value)?;
        debug!("saved draft {key} ({} bytes)", value.len());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryDraftStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_a_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path()).unwrap();

        assert_eq!(store.load("saved-login-form").unwrap(), None);

        store
            .save("saved-login-form", r#"{"email":"a@b.com"}"#)
            .unwrap();
        assert_eq!(
            store.load("saved-login-form").unwrap().as_deref(),
            Some(r#"{"email":"a@b.com"}"#)
        );

        store.clear("saved-login-form").unwrap();
        assert_eq!(store.load("saved-login-form").unwrap(), None);
        // Clearing again stays quiet.
        store.clear("saved-login-form").unwrap();
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path()).unwrap();

        for key in ["", "../escape", "a/b", "dot.dot"] {
            assert!(matches!(
                store.load(key),
                Err(StoreError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn memory_store_round_trips_a_slot() {
        let store = MemoryDraftStore::new();
        store.save("k", "v").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v"));
        store.clear("k").unwrap();
        assert_eq!(store.load("k").unwrap(), None);
    }
}
