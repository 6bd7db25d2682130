//! HistoryStore tests
//!
//! Capacity and eviction, removal by id, write-through persistence and
//! recovery from unreadable or unwritable storage.

use std::sync::Arc;

use banter::{
    Entry, EntryId, FileRef, HistoryStore,
    backend::{InMemory, KeyValueStore},
    constants::HISTORY_KEY,
    history::{decode_history, encode_history},
};

use crate::helpers::*;

#[tokio::test]
async fn test_append_keeps_most_recent_within_capacity() {
    let (backend, _dir) = test_backend();
    let mut history = load_history(&backend, 50).await;

    for n in 1..=60 {
        let entries = history.append(numbered(n)).await;
        assert_eq!(entries.len(), n.min(50));
    }

    let expected: Vec<String> = (11..=60).map(|n| format!("message #{n}")).collect();
    assert_eq!(texts(history.entries()), expected);
}

#[tokio::test]
async fn test_append_below_capacity_keeps_everything_in_order() {
    let (backend, _dir) = test_backend();
    let mut history = load_history(&backend, 5).await;

    for n in 1..=3 {
        history.append(numbered(n)).await;
    }
    assert_eq!(
        texts(history.entries()),
        ["message #1", "message #2", "message #3"]
    );
}

#[tokio::test]
async fn test_every_mutation_is_persisted() {
    let (backend, _dir) = test_backend();
    let mut history = load_history(&backend, 3).await;

    for n in 1..=5 {
        history.append(numbered(n)).await;
        let stored = backend.get(HISTORY_KEY).await.unwrap().unwrap();
        assert_eq!(decode_history(&stored).unwrap(), history.entries());
    }

    let middle = history.entries()[1].id.clone();
    history.remove(&middle).await;
    let stored = backend.get(HISTORY_KEY).await.unwrap().unwrap();
    assert_eq!(texts(&decode_history(&stored).unwrap()), ["message #3", "message #5"]);
}

#[tokio::test]
async fn test_remove_by_id() {
    let (backend, _dir) = test_backend();
    let mut history = load_history(&backend, 10).await;
    for n in 1..=3 {
        history.append(numbered(n)).await;
    }

    let target = history.entries()[0].id.clone();
    let entries = history.remove(&target).await;
    assert_eq!(texts(entries), ["message #2", "message #3"]);
    assert!(history.get(&target).is_none());
}

#[tokio::test]
async fn test_remove_unknown_id_is_a_no_op() {
    let (backend, _dir) = test_backend();
    let mut history = load_history(&backend, 10).await;
    for n in 1..=3 {
        history.append(numbered(n)).await;
    }

    let before = history.entries().to_vec();
    let after = history.remove(&EntryId::from("does-not-exist")).await;
    assert_eq!(after, before.as_slice());
}

#[tokio::test]
async fn test_reload_reproduces_saved_history() {
    let (backend, _dir) = test_backend();
    let saved = {
        let mut history = load_history(&backend, 10).await;
        for n in 1..=4 {
            history.append(numbered(n)).await;
        }
        history.entries().to_vec()
    };

    let reloaded = load_history(&backend, 10).await;
    assert_eq!(reloaded.entries(), saved.as_slice());

    // Saving the unchanged result writes the same document again.
    let before = backend.get(HISTORY_KEY).await.unwrap();
    reloaded.save().await;
    assert_eq!(backend.get(HISTORY_KEY).await.unwrap(), before);
}

#[tokio::test]
async fn test_reload_drops_malformed_entries() {
    let good = numbered(1);
    let raw = format!(
        r#"{{"entries": [{}, {{"id": 5, "sender": "outbound"}}]}}"#,
        serde_json::to_string(&good).unwrap()
    );
    let backend: Arc<dyn KeyValueStore> = Arc::new(InMemory::with_values([(HISTORY_KEY, raw)]));

    let history = load_history(&backend, 10).await;
    assert_eq!(history.entries(), [good]);
}

#[tokio::test]
async fn test_corrupt_slot_loads_empty() {
    let backend: Arc<dyn KeyValueStore> =
        Arc::new(InMemory::with_values([(HISTORY_KEY, "{{{ definitely not json")]));
    let history = load_history(&backend, 10).await;
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_unreadable_store_loads_empty() {
    let store = Arc::new(FlakyStore::new());
    store.fail_reads(true);

    let history = HistoryStore::load(store.clone(), HISTORY_KEY, 10).await;
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_write_failure_keeps_in_memory_state() {
    let store = Arc::new(FlakyStore::new());
    let mut history = HistoryStore::load(store.clone(), HISTORY_KEY, 10).await;
    history.append(numbered(1)).await;
    assert_eq!(store.write_count(), 1);

    store.fail_writes(true);
    history.append(numbered(2)).await;
    assert_eq!(texts(history.entries()), ["message #1", "message #2"]);
    assert!(history.try_save().await.is_err());

    // The slot still holds the last successful write.
    let stored = store.raw(HISTORY_KEY).await.unwrap();
    assert_eq!(texts(&decode_history(&stored).unwrap()), ["message #1"]);

    store.fail_writes(false);
    history.append(numbered(3)).await;
    let stored = store.raw(HISTORY_KEY).await.unwrap();
    assert_eq!(decode_history(&stored).unwrap().len(), 3);
}

#[tokio::test]
async fn test_load_trims_to_capacity() {
    let entries: Vec<_> = (1..=8).map(numbered).collect();
    let raw = encode_history(&entries).unwrap();
    let backend: Arc<dyn KeyValueStore> = Arc::new(InMemory::with_values([(HISTORY_KEY, raw)]));

    let history = load_history(&backend, 3).await;
    assert_eq!(
        texts(history.entries()),
        ["message #6", "message #7", "message #8"]
    );
}

#[tokio::test]
async fn test_clear_persists_empty_history() {
    let (backend, _dir) = test_backend();
    let mut history = load_history(&backend, 10).await;
    history.append(numbered(1)).await;
    history.clear().await;

    assert!(history.is_empty());
    assert!(load_history(&backend, 10).await.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_attachment_with_non_utf8_path_is_persisted() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let (backend, _dir) = test_backend();
    let mut history = load_history(&backend, 10).await;

    let file = FileRef::from_path(OsStr::from_bytes(b"/tmp/\xffphoto.png")).unwrap();
    history.append(Entry::attachment(file, 1)).await;
    assert!(history.try_save().await.is_ok());
    history.append(numbered(2)).await;
    history.append(numbered(3)).await;

    let stored = backend.get(HISTORY_KEY).await.unwrap().unwrap();
    let persisted = decode_history(&stored).unwrap();
    assert_eq!(persisted.len(), 3);
    assert_eq!(persisted[0].text, "📎 \u{fffd}photo.png");
    assert_eq!(texts(&persisted[1..]), ["message #2", "message #3"]);
}
