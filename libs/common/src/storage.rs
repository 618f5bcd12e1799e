//! Durable key-value storage for the portal
//!
//! This module defines the synchronous key-value surface the portal stores
//! persist their snapshots to, together with an in-memory backend and a
//! file-backed backend that keeps one file per key.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::cache::{RedisConfig, RedisStore};
use crate::error::{StorageError, StorageResult};

/// A string-keyed durable slot store.
///
/// Every call completes synchronously and overwrites a single key wholesale.
/// There are no transactions spanning several keys.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`; deleting an absent key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// In-process key-value store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// A poisoned lock only means another thread panicked mid-write of a single
// HashMap operation, which leaves the map itself intact.
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// File-backed key-value store
///
/// Each key lives in `<dir>/<key>.json`. Writes go to a temporary sibling
/// file first and are then renamed over the target, so a reader never sees
/// a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a file store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        info!("File store opened at {}", dir.display());
        Ok(Self { dir })
    }

    /// Directory holding the key files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote key {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

/// Which backend the portal persists to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Nothing survives a restart
    Memory,
    /// One file per key under the given directory
    File(PathBuf),
    /// Redis strings
    Redis(RedisConfig),
}

/// Configuration for the durable key-value surface
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

impl StorageConfig {
    /// Create a new StorageConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PORTAL_STORAGE`: `memory`, `file` or `redis` (default: "file")
    /// - `PORTAL_DATA_DIR`: directory for the file backend (default: "./data")
    /// - `REDIS_URL` / `REDIS_KEY_PREFIX`: see [`RedisConfig::from_env`]
    pub fn from_env() -> StorageResult<Self> {
        let kind = std::env::var("PORTAL_STORAGE").unwrap_or_else(|_| "file".to_string());

        let backend = match kind.to_ascii_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "file" => {
                let dir = std::env::var("PORTAL_DATA_DIR").unwrap_or_else(|_| "./data".to_string());
                StorageBackend::File(PathBuf::from(dir))
            }
            "redis" => StorageBackend::Redis(RedisConfig::from_env()?),
            other => {
                return Err(StorageError::Configuration(format!(
                    "Unknown storage backend: {}",
                    other
                )));
            }
        };

        Ok(StorageConfig { backend })
    }

    /// Open the configured backend
    pub fn open(&self) -> StorageResult<Arc<dyn KeyValueStore>> {
        let store: Arc<dyn KeyValueStore> = match &self.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Arc::new(MemoryStore::new())
            }
            StorageBackend::File(dir) => Arc::new(FileStore::open(dir.clone())?),
            StorageBackend::Redis(config) => Arc::new(RedisStore::new(config)?),
        };
        Ok(store)
    }
}
