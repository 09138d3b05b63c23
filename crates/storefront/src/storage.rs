//! Persisted session storage.
//!
//! A small string key/value store that survives between runs. The session
//! keeps two entries in it: the bearer token and the last known user profile.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::models::User;

/// Storage keys for persisted session data.
pub mod keys {
    /// Bearer token of the signed-in user.
    pub const AUTH_TOKEN: &str = "authToken";

    /// JSON-encoded [`User`](crate::models::User) profile.
    pub const USER_DATA: &str = "userData";
}

/// Errors from reading or writing session storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Storage format error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage.
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared storage, so a caller can keep a handle on what the storefront writes.
impl<S: SessionStorage + ?Sized> SessionStorage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// Storage backed by a single JSON object on disk.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so a crash never leaves a half-written session behind.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// File this storage reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        change(&mut entries);
        self.store(&entries)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// Storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

// =============================================================================
// Session persistence
// =============================================================================

/// Token and user as last persisted.
#[derive(Debug, Default)]
pub struct StoredSession {
    pub token: Option<SecretString>,
    pub user: Option<User>,
}

/// Read the persisted session.
///
/// A stored user that no longer parses is treated as absent.
///
/// # Errors
///
/// Returns `StorageError` if the storage itself cannot be read.
pub fn load_session(storage: &dyn SessionStorage) -> Result<StoredSession, StorageError> {
    let token = storage
        .get(keys::AUTH_TOKEN)?
        .filter(|token| !token.trim().is_empty())
        .map(SecretString::from);

    let user = match storage.get(keys::USER_DATA)? {
        Some(raw) => match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable stored user");
                None
            }
        },
        None => None,
    };

    Ok(StoredSession { token, user })
}

/// Persist the bearer token.
///
/// # Errors
///
/// Returns `StorageError` if the storage cannot be written.
pub fn save_token(storage: &dyn SessionStorage, token: &SecretString) -> Result<(), StorageError> {
    storage.set(keys::AUTH_TOKEN, token.expose_secret())
}

/// Persist the user profile.
///
/// # Errors
///
/// Returns `StorageError` if the user cannot be encoded or stored.
pub fn save_user(storage: &dyn SessionStorage, user: &User) -> Result<(), StorageError> {
    storage.set(keys::USER_DATA, &serde_json::to_string(user)?)
}

/// Remove both session entries.
///
/// # Errors
///
/// Returns `StorageError` if the storage cannot be written.
pub fn clear_session(storage: &dyn SessionStorage) -> Result<(), StorageError> {
    storage.remove(keys::AUTH_TOKEN)?;
    storage.remove(keys::USER_DATA)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use hawk_leather_core::UserId;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir()
            .join(format!("hawk-storage-{}-{n}", std::process::id()))
            .join(name)
    }

    fn user() -> User {
        User {
            id: UserId::new("u1"),
            name: "Asha Rao".to_string(),
            occupation: "Architect".to_string(),
            email: "asha@example.com".to_string(),
            phone_number: Some(9_876_543_210),
            street_address: "4 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: Some(560_001),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_file_storage_creates_parent_and_persists() {
        let path = temp_path("nested/session.json");
        let storage = FileStorage::new(&path);

        assert_eq!(storage.get("missing").unwrap(), None);
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));

        reopened.remove("a").unwrap();
        reopened.remove("never-set").unwrap();
        assert_eq!(storage.get("a").unwrap(), None);
        assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));

        fs::remove_dir_all(path.parent().unwrap().parent().unwrap()).ok();
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let path = temp_path("session.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(storage.get("a"), Err(StorageError::Json(_))));

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_session_round_trip_and_clear() {
        let storage = MemoryStorage::new();
        save_token(&storage, &SecretString::from("tok-123")).unwrap();
        save_user(&storage, &user()).unwrap();

        let session = load_session(&storage).unwrap();
        assert_eq!(session.token.unwrap().expose_secret(), "tok-123");
        assert_eq!(session.user, Some(user()));

        clear_session(&storage).unwrap();
        let session = load_session(&storage).unwrap();
        assert!(session.token.is_none());
        assert!(session.user.is_none());
    }

    #[test]
    fn test_unreadable_user_is_absent() {
        let storage = MemoryStorage::new();
        storage.set(keys::USER_DATA, "{\"broken\":true}").unwrap();
        storage.set(keys::AUTH_TOKEN, "tok").unwrap();

        let session = load_session(&storage).unwrap();
        assert!(session.user.is_none());
        assert!(session.token.is_some());
    }
}
