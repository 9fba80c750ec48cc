//! Document store for per-owner JSON documents
//!
//! Each key owns exactly one JSON file under the store root, read and
//! written as a whole. There are no partial or field-level writes: a save
//! replaces the entire document. Callers performing a read-modify-write
//! cycle must hold the key's guard from [`DocumentStore::acquire`] across
//! the load and the save, which serializes concurrent writers per key.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Document store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the document files
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Create a new StoreConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PLAYDECK_DATA_DIR`: Root directory for persisted documents (default: `./data`)
    pub fn from_env() -> StoreResult<Self> {
        let data_dir = env::var("PLAYDECK_DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
        })
    }
}

/// Per-key JSON document store
///
/// Cloning is cheap; clones share the same lock registry, so guards taken
/// through any clone serialize against each other.
#[derive(Clone)]
pub struct DocumentStore {
    root: PathBuf,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl DocumentStore {
    /// Open a document store rooted at `root`, creating the directory if needed
    pub async fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;

        Ok(Self {
            root,
            locks: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Acquire the write guard for a key
    ///
    /// Hold the returned guard across a load/save pair; two concurrent
    /// read-modify-write cycles for the same key otherwise race and the
    /// second writer silently clobbers the first.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }

    /// Load the document for a key
    ///
    /// Returns `T::default()` when nothing has been persisted yet.
    pub async fn load<T>(&self, key: &str) -> StoreResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path_for(key);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No document for key '{}', returning default", key);
                return Ok(T::default());
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })
    }

    /// Save the document for a key, replacing any previous contents
    ///
    /// The document is written to a temporary file and renamed into place,
    /// so a failed write leaves the prior document intact.
    pub async fn save<T>(&self, key: &str, value: &T) -> StoreResult<()>
    where
        T: Serialize,
    {
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{}.json.tmp", key));

        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;

        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!("Saved document for key '{}' ({} bytes)", key, bytes.len());
        Ok(())
    }
}
