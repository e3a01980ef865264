//! File-backed JSON document
//!
//! One `DocumentStore` owns one file. Reads load and parse the whole file,
//! writes replace it in full. Writers are serialized per document; the last
//! writer to finish wins.

use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use super::atomic;
use super::error::{StoreError, StoreResult};
use super::kind::DocumentKind;

pub struct DocumentStore {
    kind: DocumentKind,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    pub fn new(kind: DocumentKind, path: PathBuf) -> Self {
        Self {
            kind,
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub const fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and parse the current document
    pub async fn read(&self) -> StoreResult<Value> {
        let raw = fs::read(&self.path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StoreError::NotFound {
                    kind: self.kind,
                    path: self.path.clone(),
                }
            } else {
                StoreError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        serde_json::from_slice(&raw).map_err(|source| StoreError::Parse {
            kind: self.kind,
            source,
        })
    }

    /// Replace the document with `doc`, pretty-printed
    pub async fn write(&self, doc: &Value) -> StoreResult<usize> {
        let encoded = serde_json::to_vec_pretty(doc).map_err(|source| StoreError::Encode {
            kind: self.kind,
            source,
        })?;

        let _guard = self.write_lock.lock().await;
        atomic::write(&self.path, &encoded)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(encoded.len())
    }

    /// Write `default` only when no file exists yet.
    /// Returns whether the document was created.
    pub async fn seed(&self, default: &Value) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let exists = fs::try_exists(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        if exists {
            return Ok(false);
        }

        let encoded = serde_json::to_vec(default).map_err(|source| StoreError::Encode {
            kind: self.kind,
            source,
        })?;
        atomic::write(&self.path, &encoded)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(true)
    }

    /// Create the directory holding the document file
    pub async fn ensure_parent(&self) -> StoreResult<()> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(parent)
            .await
            .map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn store_in(dir: &Path, kind: DocumentKind) -> DocumentStore {
        DocumentStore::new(kind, dir.join(kind.file_name()))
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), DocumentKind::Teams);
        let doc = json!({
            "teams": [
                { "name": "Лисы", "region": "RU-MOW", "players": [7, 11] },
                { "name": "Owls", "region": null, "players": [] }
            ],
            "updated": 1.5
        });

        store.write(&doc).await.unwrap();
        assert_eq!(store.read().await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_array_document_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), DocumentKind::Schedule);
        let doc = json!([{ "time": "10:00", "home": "A", "away": "B" }]);

        store.write(&doc).await.unwrap();
        assert_eq!(store.read().await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), DocumentKind::Olympic);

        let err = store.read().await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: DocumentKind::Olympic,
                ..
            }
        ));
        assert_eq!(err.status_code(), hyper::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), DocumentKind::Buttons);
        std::fs::write(store.path(), b"{\"buttons\": [").unwrap();

        let err = store.read().await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert_eq!(err.status_code(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_write_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), DocumentKind::Advertisement);

        store.write(&json!({ "text": "Final at 18:00" })).await.unwrap();
        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(on_disk, "{\n  \"text\": \"Final at 18:00\"\n}");
    }

    #[tokio::test]
    async fn test_write_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), DocumentKind::NetInfo);

        store.write(&json!({ "a": 1, "b": 2 })).await.unwrap();
        store.write(&json!({ "c": 3 })).await.unwrap();
        assert_eq!(store.read().await.unwrap(), json!({ "c": 3 }));
    }

    #[tokio::test]
    async fn test_write_without_parent_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), DocumentKind::Videos);

        let err = store.write(&json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[tokio::test]
    async fn test_seed_only_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), DocumentKind::Videos);
        store.ensure_parent().await.unwrap();
        let default = DocumentKind::Videos.default_value().unwrap();

        assert!(store.seed(&default).await.unwrap());
        assert_eq!(store.read().await.unwrap(), default);

        let edited = json!({ "groups": [{ "id": "g1" }], "activeGroupId": "g1" });
        store.write(&edited).await.unwrap();
        assert!(!store.seed(&default).await.unwrap());
        assert_eq!(store.read().await.unwrap(), edited);
    }

    #[tokio::test]
    async fn test_concurrent_writers_last_one_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(dir.path(), DocumentKind::Olympic));

        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.write(&json!({ "writer": i })).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let doc = store.read().await.unwrap();
        let writer = doc["writer"].as_i64().unwrap();
        assert!((0..16).contains(&writer));
        // Only the document itself remains; no staging files are left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
