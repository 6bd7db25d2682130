//! Key-value backend tests
//!
//! Covers the JSON file store's behaviour across reopen, plus a full
//! conversation persisted through it.

use std::{fs, io::Write, sync::Arc};

use banter::{
    ChatConfig, Conversation, Theme,
    backend::{JsonFile, KeyValueStore},
};

#[tokio::test]
async fn test_json_file_missing_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never-written.json");

    let store = JsonFile::open(&path).await.unwrap();
    assert_eq!(store.get("anything").await.unwrap(), None);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_json_file_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let store = JsonFile::open(&path).await.unwrap();
        store.set("a", "1".to_string()).await.unwrap();
        store.set("b", "2".to_string()).await.unwrap();
        store.set("a", "3".to_string()).await.unwrap();
    }
    assert!(path.exists());

    let reopened = JsonFile::open(&path).await.unwrap();
    assert_eq!(reopened.get("a").await.unwrap().as_deref(), Some("3"));
    assert_eq!(reopened.get("b").await.unwrap().as_deref(), Some("2"));
    assert_eq!(reopened.path(), path.as_path());
}

#[tokio::test]
async fn test_json_file_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let store = JsonFile::open(&path).await.unwrap();
    store.set("k", "v".to_string()).await.unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["store.json"]);
}

#[tokio::test]
async fn test_json_file_invalid_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invalid.json");
    {
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{{invalid json").unwrap();
    }

    let err = JsonFile::open(&path).await.unwrap_err();
    assert!(err.is_serialization_error());
    assert_eq!(err.module(), "backend");
}

#[tokio::test]
async fn test_json_file_write_failure_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("store.json");

    let store = JsonFile::empty(&path);
    let err = store.set("k", "v".to_string()).await.unwrap_err();
    assert!(err.is_io_error());
    // A failed write does not change what the store reports.
    assert_eq!(store.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn test_conversation_persists_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("banter.json");

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFile::open(&path).await.unwrap());
        let chat = Conversation::open(store, ChatConfig::default()).await;
        chat.send(Some("saved to disk"), None).await;
        chat.toggle_theme().await;
        chat.close();
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFile::open(&path).await.unwrap());
    let chat = Conversation::open(store, ChatConfig::default()).await;
    let entries = chat.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "saved to disk");
    assert_eq!(chat.theme().await, Theme::Dark);
}
