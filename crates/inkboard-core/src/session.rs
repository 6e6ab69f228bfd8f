//! A document being edited: editor plus persistence.
//!
//! [`Session`] loads a document from a [`Storage`] backend, forwards every
//! committed editor change (including undo and redo) to the autosave
//! debouncer and performs the saves it issues. The host drives time by
//! calling [`Session::tick`] from its event loop.

use crate::canvas::{CanvasDocument, UNTITLED, now_millis};
use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::input::Modifiers;
use crate::shortcuts::Action;
use crate::storage::{AutoSaveManager, IssuedSave, SaveStatus, Storage, StorageResult};

/// An open document bound to a storage backend.
pub struct Session<S: Storage> {
    storage: S,
    editor: Editor,
    /// Document metadata. `elements` stays empty; the editor owns them.
    meta: CanvasDocument,
    autosave: AutoSaveManager,
    /// Editor revision last handed to the debouncer.
    seen_revision: u64,
}

impl<S: Storage> Session<S> {
    /// Open document `id`.
    ///
    /// A missing document starts empty and "Untitled". Any other load
    /// failure also starts empty, but the save status reports the failure.
    pub async fn open(storage: S, id: impl Into<String>, config: EditorConfig) -> Self {
        let id = id.into();
        let mut autosave = AutoSaveManager::new(config.autosave_debounce_ms);
        let mut meta = match storage.load(&id).await {
            Ok(document) => document,
            Err(e) if e.is_not_found() => {
                log::info!("document {id} not found, starting empty");
                CanvasDocument::empty(id.clone())
            }
            Err(e) => {
                log::warn!("failed to load document {id}: {e}");
                autosave.set_failed(e.to_string());
                CanvasDocument::empty(id.clone())
            }
        };
        meta.id = id;

        let mut editor = Editor::new(config);
        editor.load_elements(std::mem::take(&mut meta.elements));
        let seen_revision = editor.revision();
        Self {
            storage,
            editor,
            meta,
            autosave,
            seen_revision,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Mutable access for pointer and command handling. Call
    /// [`Session::sync`] or [`Session::tick`] afterwards so commits reach the
    /// debouncer.
    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }

    pub fn title(&self) -> &str {
        &self.meta.title
    }

    pub fn status(&self) -> &SaveStatus {
        self.autosave.status()
    }

    pub fn autosave(&self) -> &AutoSaveManager {
        &self.autosave
    }

    /// The committed document as it would be saved.
    pub fn snapshot(&self) -> CanvasDocument {
        CanvasDocument {
            elements: self.editor.committed_elements().to_vec(),
            updated_at: now_millis(),
            ..self.meta.clone()
        }
    }

    /// Schedule an autosave if the editor committed since the last call.
    /// Returns true if a save was (re)scheduled.
    pub fn sync(&mut self, now_ms: u64) -> bool {
        let revision = self.editor.revision();
        if revision == self.seen_revision {
            return false;
        }
        self.seen_revision = revision;
        self.autosave.schedule(self.snapshot(), now_ms);
        true
    }

    /// Pick up new commits and perform the pending save once it is due.
    ///
    /// Returns the save result when a save ran.
    pub async fn tick(&mut self, now_ms: u64) -> Option<StorageResult<()>> {
        self.sync(now_ms);
        let issued = self.autosave.take_due(now_ms)?;
        Some(self.perform(issued).await)
    }

    /// Save the committed document immediately, superseding any pending
    /// autosave.
    pub async fn save_now(&mut self) -> StorageResult<()> {
        self.seen_revision = self.editor.revision();
        let issued = self.autosave.issue_now(self.snapshot());
        self.perform(issued).await
    }

    /// Commit a new title and save immediately. A blank title becomes
    /// "Untitled".
    pub async fn rename(&mut self, title: &str) -> StorageResult<()> {
        let title = title.trim();
        self.meta.title = if title.is_empty() { UNTITLED } else { title }.to_string();
        self.save_now().await
    }

    /// Route a key press through the editor. [`Action::Save`] saves
    /// immediately; other actions are forwarded to the debouncer.
    pub async fn handle_key(&mut self, key: &str, modifiers: Modifiers, now_ms: u64) -> Option<Action> {
        let action = self.editor.handle_key(key, modifiers)?;
        if action == Action::Save {
            if let Err(e) = self.save_now().await {
                log::warn!("manual save of {} failed: {e}", self.meta.id);
            }
        } else {
            self.sync(now_ms);
        }
        Some(action)
    }

    async fn perform(&mut self, issued: IssuedSave) -> StorageResult<()> {
        let IssuedSave { seq, document } = issued;
        let result = self.storage.save(&document.id, &document).await;
        if self.autosave.complete(seq, &result) && result.is_ok() {
            self.meta.updated_at = document.updated_at;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Element, ElementStyle, Geometry, Rectangle};
    use crate::storage::{BoxFuture, MemoryStorage, StorageError, block_on};
    use crate::tools::{ShapeKind, ToolKind};
    use kurbo::Point;

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn save(&self, _id: &str, _document: &CanvasDocument) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Err(StorageError::Other("disk full".into())) })
        }

        fn load(&self, _id: &str) -> BoxFuture<'_, StorageResult<CanvasDocument>> {
            Box::pin(async { Err(StorageError::Other("connection refused".into())) })
        }

        fn delete(&self, _id: &str) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn exists(&self, _id: &str) -> BoxFuture<'_, StorageResult<bool>> {
            Box::pin(async { Ok(false) })
        }
    }

    fn open_memory(storage: MemoryStorage) -> Session<MemoryStorage> {
        block_on(Session::open(storage, "board", EditorConfig::default()))
    }

    fn draw_rect(session: &mut Session<impl Storage>) {
        let editor = session.editor_mut();
        editor.set_tool(ToolKind::Shape(ShapeKind::Rectangle));
        editor.pointer_down(Point::new(10.0, 10.0), Modifiers::NONE);
        editor.pointer_up(Point::new(60.0, 60.0));
    }

    fn stored(session: &Session<MemoryStorage>) -> Option<CanvasDocument> {
        block_on(session.storage().load("board")).ok()
    }

    #[test]
    fn test_open_missing_document_starts_untitled() {
        let session = open_memory(MemoryStorage::new());
        assert_eq!(session.id(), "board");
        assert_eq!(session.title(), UNTITLED);
        assert!(session.editor().elements().is_empty());
        assert_eq!(session.status(), &SaveStatus::Idle);
    }

    #[test]
    fn test_open_loads_elements() {
        let mut doc = CanvasDocument::empty("board");
        doc.title = "Plans".into();
        doc.elements.push(Element::new(
            Geometry::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0)),
            ElementStyle::default(),
        ));
        let session = open_memory(MemoryStorage::with_documents([doc]));
        assert_eq!(session.title(), "Plans");
        assert_eq!(session.editor().elements().len(), 1);
        assert!(!session.editor().can_undo());
        assert_eq!(session.snapshot().elements.len(), 1);
    }

    #[test]
    fn test_load_failure_starts_empty_with_failed_status() {
        let session = block_on(Session::open(BrokenStorage, "board", EditorConfig::default()));
        assert!(session.editor().elements().is_empty());
        assert!(matches!(session.status(), SaveStatus::Failed(msg) if msg.contains("connection refused")));
    }

    #[test]
    fn test_commit_is_autosaved_after_quiet_period() {
        let mut session = open_memory(MemoryStorage::new());
        draw_rect(&mut session);

        assert!(block_on(session.tick(1_000)).is_none());
        assert_eq!(session.status(), &SaveStatus::Pending);
        assert!(block_on(session.tick(2_999)).is_none());
        assert!(stored(&session).is_none());

        let result = block_on(session.tick(3_000)).unwrap();
        assert!(result.is_ok());
        assert_eq!(session.status(), &SaveStatus::Saved);
        assert_eq!(stored(&session).unwrap().elements.len(), 1);

        // Nothing new to save.
        assert!(block_on(session.tick(10_000)).is_none());
    }

    #[test]
    fn test_undo_is_persisted() {
        let mut session = open_memory(MemoryStorage::new());
        draw_rect(&mut session);
        block_on(session.tick(0));
        block_on(session.tick(2_000));
        assert_eq!(stored(&session).unwrap().elements.len(), 1);

        session.editor_mut().undo();
        assert!(session.sync(5_000));
        block_on(session.tick(7_000));
        assert!(stored(&session).unwrap().elements.is_empty());
    }

    #[test]
    fn test_saves_committed_state_not_live_drag() {
        let mut session = open_memory(MemoryStorage::new());
        draw_rect(&mut session);
        block_on(session.tick(0));

        let editor = session.editor_mut();
        editor.set_tool(ToolKind::Select);
        editor.pointer_down(Point::new(30.0, 30.0), Modifiers::NONE);
        editor.pointer_move(Point::new(130.0, 30.0));

        block_on(session.tick(2_000));
        let saved = stored(&session).unwrap();
        assert_eq!(saved.elements[0].origin(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_manual_save_shortcut() {
        let mut session = open_memory(MemoryStorage::new());
        draw_rect(&mut session);
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        let action = block_on(session.handle_key("s", ctrl, 100));
        assert_eq!(action, Some(Action::Save));
        assert_eq!(stored(&session).unwrap().elements.len(), 1);
        assert_eq!(session.status(), &SaveStatus::Saved);
        // The manual save already covered this revision.
        assert!(block_on(session.tick(60_000)).is_none());
    }

    #[test]
    fn test_undo_shortcut_schedules_save() {
        let mut session = open_memory(MemoryStorage::new());
        draw_rect(&mut session);
        block_on(session.save_now()).unwrap();
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        assert_eq!(block_on(session.handle_key("z", ctrl, 0)), Some(Action::Undo));
        assert!(session.autosave().is_pending());
    }

    #[test]
    fn test_rename_saves_immediately() {
        let mut session = open_memory(MemoryStorage::new());
        block_on(session.rename("  Roadmap ")).unwrap();
        assert_eq!(session.title(), "Roadmap");
        assert_eq!(stored(&session).unwrap().title, "Roadmap");

        block_on(session.rename("   ")).unwrap();
        assert_eq!(stored(&session).unwrap().title, UNTITLED);
    }

    #[test]
    fn test_failed_manual_save_shortcut_sets_status() {
        let mut session = block_on(Session::open(BrokenStorage, "board", EditorConfig::default()));
        draw_rect(&mut session);
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        assert_eq!(block_on(session.handle_key("s", ctrl, 0)), Some(Action::Save));
        assert!(matches!(session.status(), SaveStatus::Failed(msg) if msg.contains("disk full")));
        assert!(!session.autosave().is_pending());
    }

    #[test]
    fn test_save_failure_is_reported() {
        let mut session = block_on(Session::open(BrokenStorage, "board", EditorConfig::default()));
        draw_rect(&mut session);
        let result = block_on(session.save_now());
        assert!(result.is_err());
        assert!(matches!(session.status(), SaveStatus::Failed(msg) if msg.contains("disk full")));
    }
}
