//! In-memory storage backend.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::canvas::CanvasDocument;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory storage for tests and ephemeral canvases.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<BTreeMap<String, CanvasDocument>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with documents keyed by their own ids.
    pub fn with_documents(documents: impl IntoIterator<Item = CanvasDocument>) -> Self {
        let map = documents.into_iter().map(|d| (d.id.clone(), d)).collect();
        Self {
            documents: RwLock::new(map),
        }
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, BTreeMap<String, CanvasDocument>>> {
        self.documents
            .read()
            .map_err(|e| StorageError::Other(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, BTreeMap<String, CanvasDocument>>> {
        self.documents
            .write()
            .map_err(|e| StorageError::Other(format!("lock poisoned: {e}")))
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, document: &CanvasDocument) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let document = document.clone();
        Box::pin(async move {
            self.write()?.insert(id, document);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<CanvasDocument>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self.read()?;
            docs.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.write()?.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move { Ok(self.read()?.keys().cloned().collect()) })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move { Ok(self.read()?.contains_key(&id)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::block_on;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let mut doc = CanvasDocument::new();
        doc.title = "Board".into();

        block_on(storage.save("test", &doc)).unwrap();
        let loaded = block_on(storage.load("test")).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(id)) if id == "nonexistent"));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        let doc = CanvasDocument::new();

        assert!(!block_on(storage.exists("test")).unwrap());
        block_on(storage.save("test", &doc)).unwrap();
        assert!(block_on(storage.exists("test")).unwrap());
        block_on(storage.delete("test")).unwrap();
        assert!(!block_on(storage.exists("test")).unwrap());
        // Deleting again is fine.
        block_on(storage.delete("test")).unwrap();
    }

    #[test]
    fn test_list_sorted() {
        let storage = MemoryStorage::with_documents([
            CanvasDocument::empty("doc2"),
            CanvasDocument::empty("doc1"),
        ]);
        let list = block_on(storage.list()).unwrap();
        assert_eq!(list, vec!["doc1".to_string(), "doc2".to_string()]);
    }
}
