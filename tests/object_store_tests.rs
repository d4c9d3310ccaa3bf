use bytes::Bytes;
use sori_archive::object_store::{LocalStore, ObjectStore, ObjectStoreError};

#[tokio::test]
async fn test_local_store_put_get() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    let data = Bytes::from("webm bytes");
    store.put("clip.webm", data.clone()).await.unwrap();

    let retrieved = store.get("clip.webm").await.unwrap();
    assert_eq!(retrieved, data);
}

#[tokio::test]
async fn test_local_store_exists() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    assert!(!store.exists("missing.webm").await.unwrap());

    store.put("present.webm", Bytes::from("data")).await.unwrap();
    assert!(store.exists("present.webm").await.unwrap());
}

#[tokio::test]
async fn test_local_store_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    store.put("to-delete.ogg", Bytes::from("data")).await.unwrap();
    store.delete("to-delete.ogg").await.unwrap();
    assert!(!store.exists("to-delete.ogg").await.unwrap());
}

#[tokio::test]
async fn test_local_store_delete_nonexistent() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    // Deleting a nonexistent key should not error
    store.delete("nonexistent.webm").await.unwrap();
}

#[tokio::test]
async fn test_local_store_get_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    let result = store.get("missing.webm").await;
    assert!(matches!(result, Err(ObjectStoreError::NotFound(_))));
}

#[tokio::test]
async fn test_local_store_rejects_traversal_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path().join("uploads")).unwrap();

    let result = store.put("../outside.webm", Bytes::from("x")).await;
    assert!(matches!(result, Err(ObjectStoreError::InvalidKey(_))));
    assert!(!dir.path().join("outside.webm").exists());

    let result = store.get("..").await;
    assert!(matches!(result, Err(ObjectStoreError::InvalidKey(_))));
}
