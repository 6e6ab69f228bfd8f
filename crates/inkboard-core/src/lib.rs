//! Inkboard Core Library
//!
//! Platform-agnostic scene model, undo history and interaction engine for the
//! inkboard infinite canvas. Rendering, text-overlay widgets and image
//! rasterization are left to the host.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod editor;
pub mod eraser;
pub mod export;
pub mod history;
pub mod input;
pub mod selection;
pub mod session;
pub mod shapes;
pub mod shortcuts;
pub mod snap;
pub mod storage;
pub mod tools;

pub use camera::Camera;
pub use canvas::CanvasDocument;
pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, Mode, OverlayKey, StylePatch, TextEditRequest, TransformCommit};
pub use export::{ExportArea, ExportFormat, ExportRequest, Exporter};
pub use history::History;
pub use input::{KeyCombo, Modifiers, PointerEvent};
pub use selection::{Alignment, DistributeAxis, Selection};
pub use session::Session;
pub use shapes::{Element, ElementId, ElementStyle, Geometry};
pub use shortcuts::{Action, ShortcutError, ShortcutRegistry};
pub use snap::{GRID_SIZE, snap_point, snap_to_grid};
pub use storage::{MemoryStorage, SaveStatus, Storage, StorageError, StorageResult};
pub use tools::{ShapeKind, ToolKind};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
