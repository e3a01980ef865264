//! JSON document persistence
//!
//! Every administered document lives in its own file under the storage root
//! and is accessed through a [`DocumentStore`]. The [`DocumentRegistry`]
//! holds one store per [`DocumentKind`].

pub mod atomic;
mod document;
mod error;
mod kind;

use std::path::Path;

pub use document::DocumentStore;
pub use error::{StoreError, StoreResult};
pub use kind::{DocumentKind, WriteAck};

/// One store per document kind, indexed by [`DocumentKind::index`]
pub struct DocumentRegistry {
    stores: [DocumentStore; DocumentKind::COUNT],
}

impl DocumentRegistry {
    pub fn new(root: &Path) -> Self {
        Self {
            stores: DocumentKind::ALL
                .map(|kind| DocumentStore::new(kind, root.join(kind.file_name()))),
        }
    }

    pub fn get(&self, kind: DocumentKind) -> &DocumentStore {
        &self.stores[kind.index()]
    }

    /// Create document directories and seed defaults. Idempotent.
    /// Returns the kinds that were seeded by this call.
    pub async fn ensure_ready(&self) -> StoreResult<Vec<DocumentKind>> {
        let mut seeded = Vec::new();
        for store in &self.stores {
            store.ensure_parent().await?;
            if let Some(default) = store.kind().default_value() {
                if store.seed(&default).await? {
                    seeded.push(store.kind());
                }
            }
        }
        Ok(seeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_paths() {
        let registry = DocumentRegistry::new(Path::new("/srv/site"));
        assert_eq!(
            registry.get(DocumentKind::Schedule).path(),
            Path::new("/srv/site/schedule.json")
        );
        assert_eq!(
            registry.get(DocumentKind::Videos).path(),
            Path::new("/srv/site/data/videos.json")
        );
        for kind in DocumentKind::ALL {
            assert_eq!(registry.get(kind).kind(), kind);
        }
    }

    #[tokio::test]
    async fn test_ensure_ready_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DocumentRegistry::new(dir.path());

        assert_eq!(registry.ensure_ready().await.unwrap(), vec![DocumentKind::Videos]);
        assert!(registry.ensure_ready().await.unwrap().is_empty());

        let videos = registry.get(DocumentKind::Videos).read().await.unwrap();
        assert_eq!(videos, json!({ "groups": [], "activeGroupId": null }));
        assert!(matches!(
            registry.get(DocumentKind::Teams).read().await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
