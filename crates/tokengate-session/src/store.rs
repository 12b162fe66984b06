//! Persistent key/value storage for the cached session.
//!
//! The client keeps exactly two string slots, [`TOKEN_KEY`] and
//! [`EMAIL_KEY`]. The [`SessionStore`] trait is deliberately as small as
//! browser local storage: get, set, remove. Reads never fail; a slot
//! that cannot be read is simply absent.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Slot holding the session token.
pub const TOKEN_KEY: &str = "sessionToken";

/// Slot holding the email the token was issued for.
pub const EMAIL_KEY: &str = "sessionEmail";

/// A write to the store failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode store contents: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String-keyed persistent slots.
///
/// Methods take `&self`: stores are shared behind the session guard and
/// use interior mutability.
pub trait SessionStore: Send + Sync + 'static {
    /// Returns the value in `key`, or `None` if the slot is empty.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes `value` into `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Empties `key`. Removing an empty slot is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock leaves a plain map behind, which is
    // still usable.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// A store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with a token and email.
    pub fn with_session(token: &str, email: &str) -> Self {
        let store = Self::new();
        {
            let mut slots = lock(&store.slots);
            slots.insert(TOKEN_KEY.to_string(), token.to_string());
            slots.insert(EMAIL_KEY.to_string(), email.to_string());
        }
        store
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.slots).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        lock(&self.slots).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.slots).remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// A store backed by a small JSON file (`{"sessionToken": "..."}`).
///
/// The whole file is read once on [`open`](Self::open) and rewritten on
/// every change. It holds two short strings, so there is nothing to gain
/// from anything cleverer.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    slots: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens (or prepares to create) the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and also treated as empty; the next write replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let slots = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(slots) => slots,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "session store is corrupt, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "session store is unreadable, starting empty"
                );
                BTreeMap::new()
            }
        };
        Self {
            path,
            slots: Mutex::new(slots),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, slots: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(slots)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, bytes).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.slots).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut slots = lock(&self.slots);
        slots.insert(key.to_string(), value.to_string());
        self.flush(&slots)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut slots = lock(&self.slots);
        if slots.remove(key).is_some() {
            self.flush(&slots)?;
        }
        Ok(())
    }
}
