//! Selection set, alignment and distribution.

use crate::shapes::{Element, ElementId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Offset of the single-element alignment frame from the viewport centre,
/// in model units.
pub const SINGLE_ALIGN_OFFSET: f64 = 200.0;

/// Selected element ids, in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    /// The first selected element, used by single-element operations.
    pub fn primary(&self) -> Option<ElementId> {
        self.ids.first().copied()
    }

    /// Make `id` the sole selection.
    pub fn set_single(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Add or remove `id` (additive select).
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: ElementId) {
        self.ids.retain(|&s| s != id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the selection with the given ids.
    pub fn set_all(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Drop ids that are no longer selectable in `elements`.
    pub fn retain_selectable(&mut self, elements: &[Element]) {
        self.ids
            .retain(|id| elements.iter().any(|e| e.id == *id && e.is_interactive()));
    }
}

/// Edge or centre line to align on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Axis along which elements are distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistributeAxis {
    Horizontal,
    Vertical,
}

/// Align one element to the fixed frame around `anchor`.
///
/// The frame spans `anchor ± offset` on both axes: `Left` puts the box's left
/// edge at `anchor.x - offset`, `Right` its right edge at `anchor.x + offset`,
/// `Center` its centre on `anchor.x`, and likewise vertically.
pub fn align_single(element: &mut Element, alignment: Alignment, anchor: Point, offset: f64) -> bool {
    let b = element.bounds();
    let delta = match alignment {
        Alignment::Left => Vec2::new(anchor.x - offset - b.x0, 0.0),
        Alignment::Right => Vec2::new(anchor.x + offset - b.x1, 0.0),
        Alignment::Center => Vec2::new(anchor.x - b.center().x, 0.0),
        Alignment::Top => Vec2::new(0.0, anchor.y - offset - b.y0),
        Alignment::Bottom => Vec2::new(0.0, anchor.y + offset - b.y1),
        Alignment::Middle => Vec2::new(0.0, anchor.y - b.center().y),
    };
    apply_delta(element, delta)
}

/// Align two or more elements relative to their combined bounds.
///
/// Returns true if anything moved.
pub fn align_elements(elements: &mut [Element], ids: &[ElementId], alignment: Alignment) -> bool {
    let boxes: Vec<Rect> = targets(elements, ids).map(|e| e.bounds()).collect();
    if boxes.len() < 2 {
        return false;
    }
    let min_x = boxes.iter().map(|b| b.x0).fold(f64::INFINITY, f64::min);
    let max_x = boxes.iter().map(|b| b.x1).fold(f64::NEG_INFINITY, f64::max);
    let min_y = boxes.iter().map(|b| b.y0).fold(f64::INFINITY, f64::min);
    let max_y = boxes.iter().map(|b| b.y1).fold(f64::NEG_INFINITY, f64::max);
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;

    let mut changed = false;
    for element in targets_mut(elements, ids) {
        let b = element.bounds();
        let delta = match alignment {
            Alignment::Left => Vec2::new(min_x - b.x0, 0.0),
            Alignment::Right => Vec2::new(max_x - b.x1, 0.0),
            Alignment::Center => Vec2::new(mid_x - b.center().x, 0.0),
            Alignment::Top => Vec2::new(0.0, min_y - b.y0),
            Alignment::Bottom => Vec2::new(0.0, max_y - b.y1),
            Alignment::Middle => Vec2::new(0.0, mid_y - b.center().y),
        };
        changed |= apply_delta(element, delta);
    }
    changed
}

/// Space three or more elements evenly along an axis.
///
/// Elements are ordered by their leading edge, the gap is the combined span
/// minus the sum of extents divided by `n - 1`, and elements are laid out
/// from the minimum edge.
pub fn distribute_elements(elements: &mut [Element], ids: &[ElementId], axis: DistributeAxis) -> bool {
    let mut spans: Vec<(ElementId, f64, f64)> = targets(elements, ids)
        .map(|e| {
            let b = e.bounds();
            match axis {
                DistributeAxis::Horizontal => (e.id, b.x0, b.width()),
                DistributeAxis::Vertical => (e.id, b.y0, b.height()),
            }
        })
        .collect();
    if spans.len() < 3 {
        return false;
    }
    spans.sort_by(|a, b| a.1.total_cmp(&b.1));

    let start = spans[0].1;
    let end = spans
        .iter()
        .map(|(_, pos, extent)| pos + extent)
        .fold(f64::NEG_INFINITY, f64::max);
    let total_extent: f64 = spans.iter().map(|(_, _, extent)| extent).sum();
    let gap = (end - start - total_extent) / (spans.len() - 1) as f64;

    let mut changed = false;
    let mut cursor = start;
    for (id, pos, extent) in spans {
        let shift = cursor - pos;
        if let Some(element) = elements.iter_mut().find(|e| e.id == id) {
            let delta = match axis {
                DistributeAxis::Horizontal => Vec2::new(shift, 0.0),
                DistributeAxis::Vertical => Vec2::new(0.0, shift),
            };
            changed |= apply_delta(element, delta);
        }
        cursor += extent + gap;
    }
    changed
}

fn targets<'a>(elements: &'a [Element], ids: &'a [ElementId]) -> impl Iterator<Item = &'a Element> {
    elements
        .iter()
        .filter(|e| ids.contains(&e.id) && !e.locked)
}

fn targets_mut<'a>(
    elements: &'a mut [Element],
    ids: &'a [ElementId],
) -> impl Iterator<Item = &'a mut Element> {
    elements
        .iter_mut()
        .filter(|e| ids.contains(&e.id) && !e.locked)
}

fn apply_delta(element: &mut Element, delta: Vec2) -> bool {
    if delta.hypot2() < f64::EPSILON * f64::EPSILON {
        return false;
    }
    element.translate(delta);
    true
}
