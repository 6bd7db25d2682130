use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use banter::{
    ChatConfig, Conversation, Entry, FixedClock, HistoryStore, Result,
    backend::{BackendError, InMemory, JsonFile, KeyValueStore},
    reply::CannedResponder,
};
use tempfile::TempDir;

// ==========================
// CORE TEST FACTORIES
// ==========================

/// Creates a test backend based on TEST_BACKEND env var.
///
/// Supported values:
/// - "inmemory" or unset: InMemory backend (default)
/// - "jsonfile": JsonFile backend in a fresh temporary directory
///
/// The returned `TempDir` must be kept alive for as long as the backend is used.
///
/// # Example
/// ```bash
/// # Run tests with InMemory (default)
/// cargo test
///
/// # Run tests against the JSON file backend
/// TEST_BACKEND=jsonfile cargo test
/// ```
pub fn test_backend() -> (Arc<dyn KeyValueStore>, Option<TempDir>) {
    match std::env::var("TEST_BACKEND").as_deref() {
        Ok("jsonfile") => {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let store = JsonFile::empty(dir.path().join("banter.json"));
            (Arc::new(store), Some(dir))
        }
        Ok("inmemory") | Ok("") | Err(_) => (Arc::new(InMemory::new()), None),
        Ok(other) => {
            panic!("Unknown TEST_BACKEND value: {other}. Supported: inmemory, jsonfile")
        }
    }
}

/// Loads a history with the default key from `backend`.
pub async fn load_history(backend: &Arc<dyn KeyValueStore>, capacity: usize) -> HistoryStore {
    HistoryStore::load(Arc::clone(backend), banter::constants::HISTORY_KEY, capacity).await
}

/// Opens a conversation with the default configuration.
pub async fn open_conversation(backend: Arc<dyn KeyValueStore>) -> Conversation {
    Conversation::open(backend, ChatConfig::default()).await
}

/// Opens a conversation stamped by `clock` instead of the system clock.
///
/// Uses a [`FixedClock`] so tests can pin or advance entry timestamps.
pub async fn open_conversation_with_clock(
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<FixedClock>,
) -> Conversation {
    Conversation::open_with(
        backend,
        ChatConfig::default(),
        Arc::new(CannedResponder::default()),
        clock,
    )
    .await
}

/// Outbound entry whose text records its position in a test sequence.
pub fn numbered(n: usize) -> Entry {
    Entry::outbound(format!("message #{n}"), n as u64)
}

pub fn texts(entries: &[Entry]) -> Vec<String> {
    entries.iter().map(|e| e.text.clone()).collect()
}

// ==========================
// FAULT INJECTION
// ==========================

/// An in-memory store whose reads and writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: InMemory,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Reads a value regardless of the failure switches.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.expect("InMemory reads cannot fail")
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BackendError::FileIo {
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read blocked"),
            }
            .into());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::WriteRejected {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            }
            .into());
        }
        self.inner.set(key, value).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
