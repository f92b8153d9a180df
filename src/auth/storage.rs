//! Persistence of the bearer token across restarts

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, warn};

use crate::error::{Error, Result};

/// Somewhere to keep a single opaque token between runs
pub trait TokenStore: Send + Sync {
    /// The stored token, if any
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored token
    fn save(&self, token: &str) -> Result<()>;

    /// Forget the stored token
    fn clear(&self) -> Result<()>;
}

/// Token store backed by a small JSON document of `key -> token` entries.
///
/// Other keys in the document are left untouched, so several clients can
/// share one file under different keys.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, key: &str) -> Self {
        Self {
            path: path.into(),
            key: key.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Entries to rewrite from, and whether the document had to be dropped.
    /// A corrupt document must not block every later save or clear.
    fn entries_for_update(&self) -> Result<(BTreeMap<String, String>, bool)> {
        match self.read_entries() {
            Ok(entries) => Ok((entries, false)),
            Err(Error::Json(err)) => {
                warn!(
                    "token file {} is unreadable ({err}); starting it over",
                    self.path.display()
                );
                Ok((BTreeMap::new(), true))
            }
            Err(err) => Err(err),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(&self.key))
    }

    fn save(&self, token: &str) -> Result<()> {
        let (mut entries, _) = self.entries_for_update()?;
        entries.insert(self.key.clone(), token.to_string());
        self.write_entries(&entries)?;
        debug!("persisted token under '{}' in {}", self.key, self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let (mut entries, corrupt) = self.entries_for_update()?;
        if entries.remove(&self.key).is_some() || corrupt {
            self.write_entries(&entries)?;
            debug!("cleared token '{}' from {}", self.key, self.path.display());
        }
        Ok(())
    }
}

/// Token store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already "persisted"
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trip_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let other = FileTokenStore::new(&path, "other_app");
        other.save("other-token").unwrap();

        let store = FileTokenStore::new(&path, "storefront_token");
        assert_eq!(store.load().unwrap(), None);

        store.save("abc").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));
        assert_eq!(other.load().unwrap().as_deref(), Some("other-token"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(other.load().unwrap().as_deref(), Some("other-token"));
    }

    #[test]
    fn clearing_last_key_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileTokenStore::new(&path, "storefront_token");

        store.save("abc").unwrap();
        assert!(path.exists());
        store.clear().unwrap();
        assert!(!path.exists());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_replaced_on_save_and_reset_on_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileTokenStore::new(&path, "storefront_token");

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(store.load(), Err(Error::Json(_))));
        store.save("tok-1").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("tok-1"));

        fs::write(&path, "{not json").unwrap();
        store.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn memory_store() {
        let store = MemoryTokenStore::with_token("t1");
        assert_eq!(store.load().unwrap().as_deref(), Some("t1"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
