//! JSON file key-value backend
//!
//! Keeps the key space in memory and rewrites the whole file on every `set`.
//! The file is small (one history document and one theme name), so a full
//! rewrite is simpler than any incremental format.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, trace};

use super::{BackendError, KeyValueStore};
use crate::{Error, Result};

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// On-disk layout of a [`JsonFile`].
#[derive(Serialize, Deserialize)]
struct SerializableStore {
    /// File format version for compatibility checking
    #[serde(rename = "_v", default, skip_serializing_if = "is_v0")]
    version: u8,
    #[serde(default)]
    values: BTreeMap<String, String>,
}

/// A [`KeyValueStore`] persisted to a single JSON file.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFile {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl JsonFile {
    /// Opens the store at `path`.
    ///
    /// If the file does not exist, an empty store is returned and the file is
    /// created on the first write.
    ///
    /// # Returns
    /// An error if the file exists but cannot be read or decoded.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match tokio::fs::read_to_string(&path).await {
            Ok(json) => decode(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Store file not found, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(BackendError::FileIo { source: e }.into()),
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Creates an empty store at `path` without reading it.
    ///
    /// Anything already in the file is replaced on the first write.
    pub fn empty<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            values: RwLock::new(BTreeMap::new()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_file(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let serializable = SerializableStore {
            version: PERSISTENCE_VERSION,
            values: values.clone(),
        };
        let json = serde_json::to_string_pretty(&serializable)
            .map_err(|e| -> Error { BackendError::SerializationFailed { source: e }.into() })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })
    }
}

fn decode(json: &str) -> Result<BTreeMap<String, String>> {
    let stored: SerializableStore = serde_json::from_str(json)
        .map_err(|e| -> Error { BackendError::DeserializationFailed { source: e }.into() })?;
    if stored.version != PERSISTENCE_VERSION {
        return Err(BackendError::UnsupportedVersion {
            found: stored.version,
            expected: PERSISTENCE_VERSION,
        }
        .into());
    }
    Ok(stored.values)
}

#[async_trait]
impl KeyValueStore for JsonFile {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        // Held across the write so concurrent sets reach the disk in order.
        let mut values = self.values.write().await;
        let mut next = values.clone();
        next.insert(key.to_string(), value);
        self.write_file(&next).await?;
        *values = next;
        trace!(key = %key, path = %self.path.display(), "Persisted key");
        Ok(())
    }
}
