//! Bounded, durable message history.
//!
//! [`HistoryStore`] keeps the ordered sequence of [`Entry`] values in memory
//! and writes the whole sequence through to one key-value slot after every
//! mutation. Storage problems never surface to callers: a slot that cannot be
//! read or decoded loads as an empty history, and a failed write is logged
//! while the in-memory sequence stays authoritative for the session.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::backend::{BackendError, KeyValueStore};
use crate::entry::{Entry, EntryId};
use crate::{Error, Result};

/// The current history document format version.
const HISTORY_VERSION: u8 = 0;

fn is_v0(v: &u8) -> bool {
    *v == 0
}

#[derive(Serialize)]
struct HistoryDocument<'a> {
    #[serde(rename = "_v", skip_serializing_if = "is_v0")]
    version: u8,
    entries: &'a [Entry],
}

/// Accepted shapes of a stored history.
///
/// Entries are kept as raw JSON values so one malformed entry does not spoil
/// the rest of the document.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredHistory {
    Document {
        #[serde(rename = "_v", default)]
        version: u8,
        #[serde(default)]
        entries: Vec<serde_json::Value>,
    },
    Bare(Vec<serde_json::Value>),
}

/// Serializes a sequence of entries into the stored document format.
pub fn encode_history(entries: &[Entry]) -> Result<String> {
    let document = HistoryDocument {
        version: HISTORY_VERSION,
        entries,
    };
    serde_json::to_string(&document)
        .map_err(|e| -> Error { BackendError::SerializationFailed { source: e }.into() })
}

/// Parses a stored history document.
///
/// Entries that do not match the [`Entry`] shape, and repeats of an id already
/// seen, are dropped. The document itself being unparseable is an error.
pub fn decode_history(raw: &str) -> Result<Vec<Entry>> {
    let stored: StoredHistory = serde_json::from_str(raw)
        .map_err(|e| -> Error { BackendError::DeserializationFailed { source: e }.into() })?;
    let values = match stored {
        StoredHistory::Document { version, entries } => {
            if version != HISTORY_VERSION {
                return Err(BackendError::UnsupportedVersion {
                    found: version,
                    expected: HISTORY_VERSION,
                }
                .into());
            }
            entries
        }
        StoredHistory::Bare(entries) => entries,
    };

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<Entry>(value) {
            Ok(entry) if seen.insert(entry.id.clone()) => entries.push(entry),
            Ok(entry) => debug!(index, id = %entry.id, "Dropping entry with repeated id"),
            Err(e) => debug!(index, error = %e, "Dropping malformed entry"),
        }
    }
    Ok(entries)
}

/// An ordered, capacity-bounded sequence of entries mirrored to a key-value slot.
pub struct HistoryStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    capacity: usize,
    entries: Vec<Entry>,
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("key", &self.key)
            .field("capacity", &self.capacity)
            .field("len", &self.entries.len())
            .finish()
    }
}

impl HistoryStore {
    /// Loads the history stored under `key`.
    ///
    /// Never fails. Missing, unreadable or corrupt slots give an empty history;
    /// a stored sequence longer than `capacity` keeps only its newest entries.
    /// A `capacity` of zero is treated as one.
    pub async fn load(
        backend: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        capacity: usize,
    ) -> Self {
        let key = key.into();
        let capacity = capacity.max(1);

        let entries = match backend.get(&key).await {
            Ok(Some(raw)) => decode_history(&raw).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "Stored history is unreadable, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read history, starting empty");
                Vec::new()
            }
        };

        let mut store = Self {
            backend,
            key,
            capacity,
            entries,
        };
        store.evict_overflow();
        debug!(key = %store.key, count = store.entries.len(), "Loaded history");
        store
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Appends `entry`, evicts the oldest entries beyond capacity, and persists.
    pub async fn append(&mut self, entry: Entry) -> &[Entry] {
        trace!(id = %entry.id, sender = ?entry.sender, "Appending entry");
        self.entries.push(entry);
        self.evict_overflow();
        self.save().await;
        &self.entries
    }

    /// Removes the entry with `id`, if any, and persists.
    pub async fn remove(&mut self, id: &EntryId) -> &[Entry] {
        match self.entries.iter().position(|e| &e.id == id) {
            Some(index) => {
                self.entries.remove(index);
            }
            None => debug!(id = %id, "No entry to remove"),
        }
        self.save().await;
        &self.entries
    }

    /// Removes every entry and persists.
    pub async fn clear(&mut self) -> &[Entry] {
        self.entries.clear();
        self.save().await;
        &self.entries
    }

    /// Writes the full sequence to the slot, logging any failure.
    ///
    /// The in-memory sequence is left untouched when the write fails.
    pub async fn save(&self) {
        if let Err(e) = self.try_save().await {
            warn!(
                key = %self.key,
                error = %e,
                "Failed to persist history; keeping in-memory state"
            );
        }
    }

    /// Writes the full sequence to the slot.
    pub async fn try_save(&self) -> Result<()> {
        let raw = encode_history(&self.entries)?;
        self.backend.set(&self.key, raw).await
    }

    fn evict_overflow(&mut self) {
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
            trace!(evicted = excess, "Evicted oldest entries");
        }
    }
}
