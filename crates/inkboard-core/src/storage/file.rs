//! JSON file storage for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::canvas::CanvasDocument;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores each document as `<id>.json` in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create file storage rooted at `base_path`, creating the directory if
    /// needed.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(|source| StorageError::Io {
            path: base_path.clone(),
            source,
        })?;
        Ok(Self { base_path })
    }

    /// File storage under the platform data directory
    /// (e.g. `~/.local/share/inkboard/documents`).
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Other("could not determine data directory".to_string()))?;
        Self::new(base.join("inkboard").join("documents"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File path for a document id. Characters outside `[A-Za-z0-9_-]` are
    /// replaced so ids can never escape the base directory.
    fn document_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, document: &CanvasDocument) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(id);
        let json = document.to_json();
        Box::pin(async move {
            let json = json?;
            let temp_path = path.with_extension("json.tmp");
            fs::write(&temp_path, json).map_err(io_error(&temp_path))?;
            fs::rename(&temp_path, &path).map_err(io_error(&path))?;
            log::debug!("wrote {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<CanvasDocument>> {
        let path = self.document_path(id);
        let id = id.to_string();
        Box::pin(async move {
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) if e.kind() == ErrorKind::NotFound => return Err(StorageError::NotFound(id)),
                Err(e) => return Err(io_error(&path)(e)),
            };
            Ok(CanvasDocument::from_json(&json)?)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(id);
        Box::pin(async move {
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_error(&path)(e)),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let entries = fs::read_dir(&self.base_path).map_err(io_error(&self.base_path))?;
            let mut ids: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.document_path(id);
        Box::pin(async move { Ok(path.is_file()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Element, ElementStyle, Geometry, Stroke};
    use crate::storage::block_on;
    use kurbo::Point;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_keeps_elements() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        let mut doc = CanvasDocument::empty("board-1");
        doc.title = "Test Document".to_string();
        doc.elements.push(Element::new(
            Geometry::Stroke(Stroke::from_points(vec![Point::ZERO, Point::new(5.0, 5.0)])),
            ElementStyle::default(),
        ));

        block_on(storage.save("board-1", &doc)).unwrap();
        let loaded = block_on(storage.load("board-1")).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        fs::write(dir.path().join("bad.json"), "{ nope").unwrap();
        let result = block_on(storage.load("bad"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_list_and_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let doc = CanvasDocument::new();
        block_on(storage.save("doc2", &doc)).unwrap();
        block_on(storage.save("doc1", &doc)).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(block_on(storage.list()).unwrap(), vec!["doc1", "doc2"]);

        block_on(storage.delete("doc1")).unwrap();
        assert!(!block_on(storage.exists("doc1")).unwrap());
        block_on(storage.delete("doc1")).unwrap();
    }

    #[test]
    fn test_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let doc = CanvasDocument::new();

        block_on(storage.save("../doc:with*special", &doc)).unwrap();
        let loaded = block_on(storage.load("../doc:with*special")).unwrap();
        assert_eq!(loaded.id, doc.id);
        assert!(storage.document_path("../x").starts_with(dir.path()));
    }
}
