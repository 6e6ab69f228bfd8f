//! Canvas document and element-list operations.
//!
//! The element list is ordered: index 0 is painted first (bottom of the
//! stack) and the last element is on top.

use crate::shapes::{Element, ElementId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// Title given to new or unloadable documents.
pub const UNTITLED: &str = "Untitled";

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A persisted canvas document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document title.
    pub title: String,
    /// Owner, assigned by the hosting backend.
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
    /// Elements in paint order.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasDocument {
    /// Create a new empty document with a fresh id.
    pub fn new() -> Self {
        Self::empty(Uuid::new_v4().to_string())
    }

    /// Create an empty "Untitled" document with the given id.
    pub fn empty(id: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: id.into(),
            title: UNTITLED.to_string(),
            owner_id: None,
            created_at: now,
            updated_at: now,
            elements: Vec::new(),
        }
    }

    /// Check if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Position of an element in paint order.
pub fn index_of(elements: &[Element], id: ElementId) -> Option<usize> {
    elements.iter().position(|e| e.id == id)
}

/// Get an element by id.
pub fn find(elements: &[Element], id: ElementId) -> Option<&Element> {
    elements.iter().find(|e| e.id == id)
}

/// Get a mutable element by id.
pub fn find_mut(elements: &mut [Element], id: ElementId) -> Option<&mut Element> {
    elements.iter_mut().find(|e| e.id == id)
}

/// Topmost visible element under a model-space point.
pub fn element_at(elements: &[Element], point: Point, tolerance: f64) -> Option<&Element> {
    elements.iter().rev().find(|e| e.hit_test(point, tolerance))
}

/// Union of the bounding boxes of the given elements.
pub fn combined_bounds<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Rect> {
    elements
        .into_iter()
        .map(Element::bounds)
        .reduce(|acc, b| acc.union(b))
}

/// Move the given elements to the top of the stack, keeping their relative
/// order. Returns true if the order changed.
pub fn bring_to_front(elements: &mut Vec<Element>, ids: &[ElementId]) -> bool {
    let before: Vec<ElementId> = elements.iter().map(|e| e.id).collect();
    let (mut moved, rest): (Vec<Element>, Vec<Element>) =
        elements.drain(..).partition(|e| ids.contains(&e.id));
    elements.extend(rest);
    elements.append(&mut moved);
    order_changed(elements, &before)
}

/// Move the given elements to the bottom of the stack, keeping their
/// relative order. Returns true if the order changed.
pub fn send_to_back(elements: &mut Vec<Element>, ids: &[ElementId]) -> bool {
    let before: Vec<ElementId> = elements.iter().map(|e| e.id).collect();
    let (mut moved, rest): (Vec<Element>, Vec<Element>) =
        elements.drain(..).partition(|e| ids.contains(&e.id));
    moved.extend(rest);
    *elements = moved;
    order_changed(elements, &before)
}

/// Swap each given element with its upper neighbour. Elements already on
/// top, or blocked by another moved element, stay put.
pub fn bring_forward(elements: &mut [Element], ids: &[ElementId]) -> bool {
    let mut changed = false;
    for i in (0..elements.len().saturating_sub(1)).rev() {
        if ids.contains(&elements[i].id) && !ids.contains(&elements[i + 1].id) {
            elements.swap(i, i + 1);
            changed = true;
        }
    }
    changed
}

/// Swap each given element with its lower neighbour. Elements already at
/// the bottom, or blocked by another moved element, stay put.
pub fn send_backward(elements: &mut [Element], ids: &[ElementId]) -> bool {
    let mut changed = false;
    for i in 1..elements.len() {
        if ids.contains(&elements[i].id) && !ids.contains(&elements[i - 1].id) {
            elements.swap(i, i - 1);
            changed = true;
        }
    }
    changed
}

fn order_changed(elements: &[Element], before: &[ElementId]) -> bool {
    elements.iter().map(|e| e.id).ne(before.iter().copied())
}
