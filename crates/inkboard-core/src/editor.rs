//! Editing engine: pointer state machine, selection and transform commands.
//!
//! The [`Editor`] owns the live element list, the undo history, the
//! selection, the clipboard and the camera. Live edits (drag frames, eraser
//! passes) mutate the element list directly; an interaction becomes an undo
//! step only when it ends, through a single commit path that pushes the
//! element list onto the history.

use crate::camera::Camera;
use crate::canvas;
use crate::config::EditorConfig;
use crate::eraser::{self, eraser_radius};
use crate::export::{ExportFormat, ExportRequest};
use crate::history::History;
use crate::input::{KeyCombo, Modifiers, PointerEvent};
use crate::selection::{self, Alignment, DistributeAxis, Selection};
use crate::shapes::{
    Element, ElementId, ElementStyle, FontStyle, Geometry, GeometryTrait, Image, SerializableColor,
    Shadow, TextAlign,
};
use crate::shortcuts::{Action, ShortcutRegistry};
use crate::snap::snap_point;
use crate::tools::{Draft, FontSettings, ToolKind, create_text};
use kurbo::{Point, Rect, Size, Vec2};

/// Smallest width or height a transform can leave on a box shape.
pub const MIN_SHAPE_SIZE: f64 = 10.0;

/// Smallest font size a transform can leave on text.
pub const MIN_FONT_SIZE: f64 = 8.0;

/// Content of newly placed text.
pub const TEXT_PLACEHOLDER: &str = "Double-click to edit";

/// Viewport assumed until the host reports one.
pub const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 800.0);

/// Interaction state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// Pen, eraser or shape drag in progress.
    Drawing(Draft),
    /// Moving the selection with the select tool.
    Dragging(Drag),
    /// An external text overlay is editing this element.
    TextEditing { id: ElementId },
}

/// State of a selection drag.
#[derive(Debug, Clone, PartialEq)]
pub struct Drag {
    /// Element under the pointer; snapping is computed on it.
    anchor: ElementId,
    /// Unlocked selected elements being moved.
    ids: Vec<ElementId>,
    last: Point,
    moved: bool,
    /// The press landed on an element that was already part of the
    /// selection; a release without movement selects it alone.
    collapse_on_click: bool,
}

/// Result of a resize/rotate handle interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformCommit {
    /// New origin of the element.
    pub position: Point,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in degrees, any range.
    pub rotation: f64,
}

/// What the host needs to position a text-edit overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditRequest {
    pub id: ElementId,
    pub text: String,
    /// Element bounds in screen space.
    pub screen_rect: Rect,
    /// Font size in screen pixels at the current zoom.
    pub font_size_px: f64,
    pub font_family: String,
    pub rotation: f64,
}

/// How a key pressed inside the text overlay should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKey {
    Commit,
    Newline,
    Cancel,
    /// Regular typing, handled by the overlay itself.
    Passthrough,
}

/// Map a key pressed in the text overlay: Enter commits, Shift+Enter inserts
/// a newline, Escape cancels.
pub fn overlay_key(key: &str, modifiers: Modifiers) -> OverlayKey {
    match key {
        "Enter" if modifiers.shift => OverlayKey::Newline,
        "Enter" => OverlayKey::Commit,
        "Escape" => OverlayKey::Cancel,
        _ => OverlayKey::Passthrough,
    }
}

/// Style changes applied to the selection and to newly created elements.
///
/// `None` leaves a field alone. `fill` and `shadow` use a nested option so
/// they can be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    pub stroke: Option<SerializableColor>,
    pub stroke_width: Option<f64>,
    pub fill: Option<Option<SerializableColor>>,
    pub opacity: Option<f64>,
    pub shadow: Option<Option<Shadow>>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_style: Option<FontStyle>,
    pub align: Option<TextAlign>,
}

impl StylePatch {
    /// Apply to one element. Returns true if anything changed.
    pub fn apply_to(&self, element: &mut Element) -> bool {
        let before = element.clone();
        self.apply_style(&mut element.style);
        if let Some(opacity) = self.opacity {
            element.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(shadow) = &self.shadow {
            element.shadow = shadow.clone();
        }
        if let Some(text) = element.as_text_mut() {
            if let Some(size) = self.font_size {
                text.font_size = size.max(MIN_FONT_SIZE);
            }
            if let Some(family) = &self.font_family {
                text.font_family = family.clone();
            }
            if let Some(style) = self.font_style {
                text.font_style = style;
            }
            if let Some(align) = self.align {
                text.align = align;
            }
        }
        *element != before
    }

    fn apply_style(&self, style: &mut ElementStyle) {
        if let Some(stroke) = self.stroke {
            style.stroke = stroke;
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width.max(0.0);
        }
        if let Some(fill) = self.fill {
            style.fill = fill;
        }
    }

    fn apply_font(&self, font: &mut FontSettings) {
        if let Some(size) = self.font_size {
            font.font_size = size.max(MIN_FONT_SIZE);
        }
        if let Some(family) = &self.font_family {
            font.font_family = family.clone();
        }
        if let Some(style) = self.font_style {
            font.font_style = style;
        }
        if let Some(align) = self.align {
            font.align = align;
        }
    }
}

/// The canvas editing engine.
#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    history: History<Vec<Element>>,
    /// Live element list; equals the history's current snapshot except
    /// during a drag or eraser interaction.
    elements: Vec<Element>,
    selection: Selection,
    clipboard: Option<Element>,
    camera: Camera,
    viewport: Size,
    tool: ToolKind,
    mode: Mode,
    style: ElementStyle,
    font: FontSettings,
    snap_enabled: bool,
    shortcuts: ShortcutRegistry,
    /// Bumped on every commit, undo and redo.
    revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            history: History::new(Vec::new()).with_limit(Some(config.history_limit)),
            elements: Vec::new(),
            selection: Selection::new(),
            clipboard: None,
            camera: Camera::new(),
            viewport: DEFAULT_VIEWPORT,
            tool: ToolKind::default(),
            mode: Mode::Idle,
            style: config.default_style.clone(),
            font: config.font.clone(),
            snap_enabled: config.snap_to_grid,
            shortcuts: ShortcutRegistry::default(),
            revision: 0,
            config,
        }
    }

    // --- accessors ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Live elements in paint order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Elements of the current undo step (excludes in-progress edits).
    pub fn committed_elements(&self) -> &[Element] {
        self.history.current()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        canvas::find(&self.elements, id)
    }

    pub fn history(&self) -> &History<Vec<Element>> {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> Option<&Element> {
        self.clipboard.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Pan and zoom go straight to the camera; they are not undoable.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_text_editing(&self) -> bool {
        matches!(self.mode, Mode::TextEditing { .. })
    }

    /// Style given to new elements.
    pub fn style(&self) -> &ElementStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ElementStyle {
        &mut self.style
    }

    pub fn font(&self) -> &FontSettings {
        &self.font
    }

    pub fn font_mut(&mut self) -> &mut FontSettings {
        &mut self.font
    }

    pub fn is_snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn toggle_snap(&mut self) {
        self.snap_enabled = !self.snap_enabled;
        log::debug!("snap to grid {}", if self.snap_enabled { "on" } else { "off" });
    }

    pub fn shortcuts(&self) -> &ShortcutRegistry {
        &self.shortcuts
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutRegistry {
        &mut self.shortcuts
    }

    /// Counter that changes whenever the committed document changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replace the document with loaded elements. Not an undo step.
    pub fn load_elements(&mut self, elements: Vec<Element>) {
        self.abandon_interaction();
        log::info!("loaded {} element(s)", elements.len());
        self.history.replace(elements.clone());
        self.elements = elements;
        self.selection.clear();
    }

    /// Switch tools, abandoning any in-progress interaction.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.abandon_interaction();
        self.tool = tool;
    }

    /// Element the pending draft would produce, for preview rendering.
    pub fn preview_element(&self) -> Option<Element> {
        match &self.mode {
            Mode::Drawing(draft) => draft
                .clone()
                .into_element(&self.style, self.config.corner_radius),
            _ => None,
        }
    }

    // --- commit path ---

    fn commit(&mut self, what: &str) {
        self.history.push(self.elements.clone());
        self.revision += 1;
        self.check_selection();
        log::debug!(
            "commit {what}: {} element(s), step {}/{}",
            self.elements.len(),
            self.history.cursor() + 1,
            self.history.len()
        );
    }

    fn check_selection(&self) {
        debug_assert!(
            self.selection
                .ids()
                .iter()
                .all(|id| canvas::find(&self.elements, *id).is_some()),
            "selection references a missing element"
        );
    }

    /// Drop live edits back to the committed snapshot.
    fn revert_live(&mut self) {
        self.elements = self.history.current().clone();
        self.selection.retain_selectable(&self.elements);
    }

    /// End whatever interaction is in progress without committing it.
    fn abandon_interaction(&mut self) {
        match std::mem::take(&mut self.mode) {
            Mode::Drawing(_) | Mode::Dragging(_) => self.revert_live(),
            Mode::TextEditing { id } => log::trace!("text edit of {id} abandoned"),
            Mode::Idle => {}
        }
    }

    pub fn undo(&mut self) -> bool {
        self.abandon_interaction();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.elements = snapshot.clone();
        self.selection.clear();
        self.revision += 1;
        log::debug!("undo to step {}/{}", self.history.cursor() + 1, self.history.len());
        true
    }

    pub fn redo(&mut self) -> bool {
        self.abandon_interaction();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.elements = snapshot.clone();
        self.selection.clear();
        self.revision += 1;
        log::debug!("redo to step {}/{}", self.history.cursor() + 1, self.history.len());
        true
    }

    // --- pointer state machine ---

    fn tolerance(&self) -> f64 {
        self.config.hit_tolerance / self.camera.scale()
    }

    fn hit(&self, point: Point) -> Option<&Element> {
        canvas::element_at(&self.elements, point, self.tolerance())
    }

    /// Dispatch a host pointer event. Returns an overlay request when a
    /// double click starts text editing.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<TextEditRequest> {
        match event {
            PointerEvent::Down { position, modifiers } => self.pointer_down(position, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(position),
            PointerEvent::DoubleClick { position } => return self.double_click(position),
            PointerEvent::Wheel { position, delta } => self.camera.zoom_wheel(position, delta.y),
        }
        None
    }

    /// Pointer pressed at a screen position.
    ///
    /// Ignored unless idle, so duplicate presses and presses during text
    /// editing are absorbed.
    pub fn pointer_down(&mut self, screen: Point, modifiers: Modifiers) {
        if self.mode != Mode::Idle {
            log::trace!("pointer down ignored while {:?}", self.mode);
            return;
        }
        let point = self.camera.to_model(screen);
        match self.tool {
            ToolKind::Select => self.select_at(point, modifiers),
            ToolKind::Text => self.place_text(point),
            ToolKind::Image => {}
            tool @ (ToolKind::Pen | ToolKind::Eraser | ToolKind::Shape(_)) => {
                self.mode = Mode::Drawing(Draft::begin(tool, point));
            }
        }
    }

    fn select_at(&mut self, point: Point, modifiers: Modifiers) {
        let Some((id, locked)) = self.hit(point).map(|e| (e.id, e.locked)) else {
            self.selection.clear();
            return;
        };
        if locked {
            return;
        }
        if modifiers.is_additive() {
            self.selection.toggle(id);
            return;
        }
        let already_selected = self.selection.contains(id);
        if !already_selected {
            self.selection.set_single(id);
        }
        self.mode = Mode::Dragging(Drag {
            anchor: id,
            ids: self.selected_unlocked_ids(),
            last: point,
            moved: false,
            collapse_on_click: already_selected && self.selection.len() > 1,
        });
    }

    fn place_text(&mut self, point: Point) {
        if self.hit(point).is_some() {
            return;
        }
        let element = create_text(point, TEXT_PLACEHOLDER.to_string(), &self.font, &self.style);
        self.add_and_select(element, "add text");
        self.tool = ToolKind::Select;
    }

    /// Pointer moved to a screen position. Only meaningful while drawing or
    /// dragging.
    pub fn pointer_move(&mut self, screen: Point) {
        let point = self.camera.to_model(screen);
        let mut erase = false;
        match &mut self.mode {
            Mode::Drawing(draft) => {
                draft.extend(point);
                erase = draft.tool() == ToolKind::Eraser;
            }
            Mode::Dragging(drag) => {
                let delta = point - drag.last;
                drag.last = point;
                if delta != Vec2::ZERO {
                    drag.moved = true;
                    for element in self.elements.iter_mut().filter(|e| drag.ids.contains(&e.id)) {
                        element.translate(delta);
                    }
                }
            }
            Mode::Idle | Mode::TextEditing { .. } => {}
        }
        if erase {
            self.erase_at(point);
        }
    }

    fn erase_at(&mut self, point: Point) {
        let radius = eraser_radius(self.style.stroke_width);
        if let Some(next) = eraser::erase(&self.elements, point, radius) {
            self.elements = next;
            self.selection.retain_selectable(&self.elements);
        }
    }

    /// Pointer released at a screen position. A release without a press is
    /// a no-op.
    pub fn pointer_up(&mut self, screen: Point) {
        let point = self.camera.to_model(screen);
        match std::mem::take(&mut self.mode) {
            Mode::Drawing(mut draft) => {
                if draft.tool() != ToolKind::Eraser {
                    draft.finish_at(point);
                }
                self.finish_draft(draft);
            }
            Mode::Dragging(drag) => self.finish_drag(drag),
            mode @ Mode::TextEditing { .. } => self.mode = mode,
            Mode::Idle => {}
        }
    }

    fn finish_draft(&mut self, draft: Draft) {
        if !draft.is_committable() {
            log::trace!("discarding {}-point draft", draft.len());
            self.revert_live();
            return;
        }
        if draft.tool() == ToolKind::Eraser {
            if self.elements != *self.history.current() {
                self.commit("erase");
            }
            return;
        }
        if let Some(element) = draft.into_element(&self.style, self.config.corner_radius) {
            log::debug!("drew {}", element.geometry.kind_name());
            self.elements.push(element);
            self.commit("draw");
        }
    }

    fn finish_drag(&mut self, drag: Drag) {
        if !drag.moved {
            if drag.collapse_on_click {
                self.selection.set_single(drag.anchor);
            }
            return;
        }
        if self.snap_enabled {
            if let Some(origin) = self.element(drag.anchor).map(Element::origin) {
                let correction = snap_point(origin, true, self.config.grid_size) - origin;
                for element in self.elements.iter_mut().filter(|e| drag.ids.contains(&e.id)) {
                    element.translate(correction);
                }
            }
        }
        if self.elements != *self.history.current() {
            self.commit("move");
        }
    }

    /// Double click at a screen position: start editing the text under it.
    pub fn double_click(&mut self, screen: Point) -> Option<TextEditRequest> {
        self.abandon_interaction();
        let point = self.camera.to_model(screen);
        let id = self
            .hit(point)
            .filter(|e| e.is_interactive() && e.as_text().is_some())?
            .id;
        self.begin_text_edit(id)
    }

    // --- text editing ---

    /// Enter text-editing mode for a text element.
    pub fn begin_text_edit(&mut self, id: ElementId) -> Option<TextEditRequest> {
        self.abandon_interaction();
        let element = self.element(id).filter(|e| e.is_interactive())?;
        let text = element.as_text()?;
        let request = TextEditRequest {
            id,
            text: text.content.clone(),
            screen_rect: self.camera.screen_rect(element.bounds()),
            font_size_px: text.font_size * self.camera.scale(),
            font_family: text.font_family.clone(),
            rotation: element.rotation,
        };
        self.mode = Mode::TextEditing { id };
        self.selection.set_single(id);
        Some(request)
    }

    /// Write the overlay's text into the element. Returns true if the text
    /// changed and was committed.
    pub fn commit_text_edit(&mut self, text: &str) -> bool {
        let Mode::TextEditing { id } = self.mode else {
            return false;
        };
        self.mode = Mode::Idle;
        let Some(target) = canvas::find_mut(&mut self.elements, id).and_then(|e| e.as_text_mut()) else {
            return false;
        };
        if target.content == text {
            return false;
        }
        target.content = text.to_string();
        self.commit("edit text");
        true
    }

    /// Leave text-editing mode without changes.
    pub fn cancel_text_edit(&mut self) {
        if self.is_text_editing() {
            self.mode = Mode::Idle;
        }
    }

    /// Handle a key pressed inside the overlay holding `text`.
    pub fn handle_overlay_key(&mut self, key: &str, modifiers: Modifiers, text: &str) -> OverlayKey {
        let outcome = overlay_key(key, modifiers);
        match outcome {
            OverlayKey::Commit => {
                self.commit_text_edit(text);
            }
            OverlayKey::Cancel => self.cancel_text_edit(),
            OverlayKey::Newline | OverlayKey::Passthrough => {}
        }
        outcome
    }

    // --- keyboard ---

    /// Resolve a key press through the shortcut registry and perform it.
    ///
    /// Suppressed while text editing. [`Action::Save`] is returned for the
    /// caller to perform.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Option<Action> {
        if self.is_text_editing() {
            return None;
        }
        let action = self.shortcuts.resolve(&KeyCombo::from_event(key, modifiers))?;
        self.perform(action);
        Some(action)
    }

    /// Perform an action. Returns true if the editor state changed.
    pub fn perform(&mut self, action: Action) -> bool {
        match action {
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
            Action::Save => false,
            Action::Copy => self.copy(),
            Action::Paste => self.paste().is_some(),
            Action::Duplicate => self.duplicate().is_some(),
            Action::DeleteSelected => self.delete_selected(),
            Action::BringForward => self.bring_forward(),
            Action::SendBackward => self.send_backward(),
            Action::BringToFront => self.bring_to_front(),
            Action::SendToBack => self.send_to_back(),
            Action::ToggleSnap => {
                self.toggle_snap();
                true
            }
            Action::SelectAll => {
                self.select_all();
                true
            }
            Action::Cancel => {
                self.abandon_interaction();
                self.selection.clear();
                true
            }
        }
    }

    // --- selection commands ---

    fn selected_unlocked_ids(&self) -> Vec<ElementId> {
        self.selection
            .ids()
            .iter()
            .copied()
            .filter(|id| self.element(*id).is_some_and(|e| !e.locked))
            .collect()
    }

    fn primary_element(&self) -> Option<&Element> {
        self.selected_unlocked_ids()
            .first()
            .and_then(|id| self.element(*id))
    }

    fn add_and_select(&mut self, element: Element, what: &str) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        self.selection.set_single(id);
        self.commit(what);
        id
    }

    /// Select an element by id. Locked or hidden elements are refused.
    pub fn select(&mut self, id: ElementId, additive: bool) -> bool {
        if !self.element(id).is_some_and(Element::is_interactive) {
            return false;
        }
        if additive {
            self.selection.toggle(id);
        } else {
            self.selection.set_single(id);
        }
        true
    }

    pub fn select_all(&mut self) {
        self.selection
            .set_all(self.elements.iter().filter(|e| e.is_interactive()).map(|e| e.id));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn delete_selected(&mut self) -> bool {
        self.abandon_interaction();
        let ids = self.selected_unlocked_ids();
        if ids.is_empty() {
            return false;
        }
        self.elements.retain(|e| !ids.contains(&e.id));
        self.selection.clear();
        self.commit("delete");
        true
    }

    /// Remove every element.
    pub fn clear_canvas(&mut self) -> bool {
        self.abandon_interaction();
        if self.elements.is_empty() {
            return false;
        }
        self.elements.clear();
        self.selection.clear();
        self.commit("clear canvas");
        true
    }

    /// Copy the primary selected element to the clipboard.
    pub fn copy(&mut self) -> bool {
        let Some(element) = self.primary_element().cloned() else {
            return false;
        };
        self.clipboard = Some(element);
        true
    }

    /// Paste the clipboard element at the paste offset from its source.
    pub fn paste(&mut self) -> Option<ElementId> {
        self.abandon_interaction();
        let offset = Vec2::new(self.config.paste_offset, self.config.paste_offset);
        let element = self.clipboard.as_ref()?.clone_with_new_id(offset);
        Some(self.add_and_select(element, "paste"))
    }

    /// Copy the primary selected element in place, offset by the paste offset.
    pub fn duplicate(&mut self) -> Option<ElementId> {
        self.abandon_interaction();
        let offset = Vec2::new(self.config.paste_offset, self.config.paste_offset);
        let element = self.primary_element()?.clone_with_new_id(offset);
        Some(self.add_and_select(element, "duplicate"))
    }

    fn reorder(&mut self, what: &str, op: impl FnOnce(&mut Vec<Element>, &[ElementId]) -> bool) -> bool {
        self.abandon_interaction();
        let ids = self.selected_unlocked_ids();
        if ids.is_empty() || !op(&mut self.elements, &ids) {
            return false;
        }
        self.commit(what);
        true
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.reorder("bring to front", |elements, ids| canvas::bring_to_front(elements, ids))
    }

    pub fn send_to_back(&mut self) -> bool {
        self.reorder("send to back", |elements, ids| canvas::send_to_back(elements, ids))
    }

    pub fn bring_forward(&mut self) -> bool {
        self.reorder("bring forward", |elements, ids| canvas::bring_forward(elements, ids))
    }

    pub fn send_backward(&mut self) -> bool {
        self.reorder("send backward", |elements, ids| canvas::send_backward(elements, ids))
    }

    /// Align the selection.
    ///
    /// A single element aligns to the fixed frame around the viewport centre;
    /// two or more align to their combined bounds.
    pub fn align(&mut self, alignment: Alignment) -> bool {
        self.abandon_interaction();
        let ids = self.selected_unlocked_ids();
        let changed = match ids.as_slice() {
            [] => false,
            [id] => {
                let anchor = self.camera.viewport_center(self.viewport);
                let offset = self.config.align_offset;
                canvas::find_mut(&mut self.elements, *id)
                    .is_some_and(|e| selection::align_single(e, alignment, anchor, offset))
            }
            _ => selection::align_elements(&mut self.elements, &ids, alignment),
        };
        if changed {
            self.commit("align");
        }
        changed
    }

    /// Evenly space three or more selected elements.
    pub fn distribute(&mut self, axis: DistributeAxis) -> bool {
        self.abandon_interaction();
        let ids = self.selected_unlocked_ids();
        let changed = selection::distribute_elements(&mut self.elements, &ids, axis);
        if changed {
            self.commit("distribute");
        }
        changed
    }

    /// Show or hide an element. Hidden elements leave the selection.
    pub fn toggle_visibility(&mut self, id: ElementId) -> bool {
        self.abandon_interaction();
        let Some(element) = canvas::find_mut(&mut self.elements, id) else {
            return false;
        };
        element.visible = !element.visible;
        if !element.visible {
            self.selection.remove(id);
        }
        self.commit("toggle visibility");
        true
    }

    /// Lock or unlock an element. Locked elements leave the selection.
    pub fn toggle_lock(&mut self, id: ElementId) -> bool {
        self.abandon_interaction();
        let Some(element) = canvas::find_mut(&mut self.elements, id) else {
            return false;
        };
        element.locked = !element.locked;
        if element.locked {
            self.selection.remove(id);
        }
        self.commit("toggle lock");
        true
    }

    /// Update the style for new elements and apply it to the selection.
    pub fn apply_style(&mut self, patch: &StylePatch) -> bool {
        self.abandon_interaction();
        patch.apply_style(&mut self.style);
        patch.apply_font(&mut self.font);

        let ids = self.selected_unlocked_ids();
        let mut changed = false;
        for element in self.elements.iter_mut().filter(|e| ids.contains(&e.id)) {
            changed |= patch.apply_to(element);
        }
        if changed {
            self.commit("style");
        }
        changed
    }

    /// Bake a resize/rotate handle result into an element.
    ///
    /// Box sizes are multiplied by the scale factors with a floor of
    /// [`MIN_SHAPE_SIZE`]; text scales its font by the vertical factor with a
    /// floor of [`MIN_FONT_SIZE`]; strokes and connectors scale their points
    /// about the origin. Rotation is normalized to `[0, 360)`.
    pub fn commit_transform(&mut self, id: ElementId, transform: TransformCommit) -> bool {
        self.abandon_interaction();
        let Some(element) = canvas::find_mut(&mut self.elements, id).filter(|e| e.is_interactive()) else {
            return false;
        };
        let (sx, sy) = (transform.scale_x, transform.scale_y);
        match &mut element.geometry {
            Geometry::Rectangle(r) => {
                r.width = (r.width * sx).max(MIN_SHAPE_SIZE);
                r.height = (r.height * sy).max(MIN_SHAPE_SIZE);
            }
            Geometry::Polygon(p) => {
                p.width = (p.width * sx).max(MIN_SHAPE_SIZE);
                p.height = (p.height * sy).max(MIN_SHAPE_SIZE);
            }
            Geometry::Image(i) => {
                i.width = (i.width * sx).max(MIN_SHAPE_SIZE);
                i.height = (i.height * sy).max(MIN_SHAPE_SIZE);
            }
            Geometry::Text(t) => t.font_size = (t.font_size * sy).max(MIN_FONT_SIZE),
            Geometry::Stroke(s) => s.scale(sx, sy),
            Geometry::Line(c) | Geometry::Arrow(c) => c.scale(sx, sy),
        }
        element.rotation = normalize_degrees(transform.rotation);
        element.move_origin_to(transform.position);
        self.commit("transform");
        true
    }

    /// Insert an uploaded image, fitted to the max image width and centred in
    /// the viewport. Images without a usable natural size are rejected.
    pub fn insert_image(&mut self, url: impl Into<String>, natural: Size) -> Option<ElementId> {
        self.abandon_interaction();
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(natural.width) || !valid(natural.height) {
            log::warn!("rejecting image with natural size {natural:?}");
            return None;
        }
        let center = self.camera.viewport_center(self.viewport);
        let image = Image::centered(url.into(), natural, self.config.max_image_width, center);
        let element = Element::new(Geometry::Image(image), self.style.clone());
        Some(self.add_and_select(element, "insert image"))
    }

    /// Package the committed, visible document and the view for export.
    pub fn export_request(&self, pixel_ratio: f64, format: ExportFormat) -> ExportRequest {
        ExportRequest::new(self.committed_elements(), self.camera, self.viewport)
            .with_pixel_ratio(pixel_ratio)
            .with_format(format)
    }
}

fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if normalized >= 360.0 { 0.0 } else { normalized }
}
