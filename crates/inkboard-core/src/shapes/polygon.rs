//! Circle, triangle, star, hexagon and pentagon geometry.

use super::{ElementStyle, GeometryTrait, hit_box};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Which regular figure a [`Polygon`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PolygonKind {
    Circle,
    Triangle,
    Star,
    Hexagon,
    Pentagon,
}

impl PolygonKind {
    pub fn name(self) -> &'static str {
        match self {
            PolygonKind::Circle => "circle",
            PolygonKind::Triangle => "triangle",
            PolygonKind::Star => "star",
            PolygonKind::Hexagon => "hexagon",
            PolygonKind::Pentagon => "pentagon",
        }
    }
}

/// A figure inscribed in a square box.
///
/// `width`/`height` record the drag box; the figure itself fills the square of
/// side `min(width, height)` anchored at `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    pub kind: PolygonKind,
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

impl Polygon {
    pub fn new(kind: PolygonKind, position: Point, width: f64, height: f64) -> Self {
        Self {
            kind,
            position,
            width,
            height,
        }
    }

    /// Side length of the square box.
    pub fn side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Centre of the square box.
    pub fn center(&self) -> Point {
        let half = self.side() / 2.0;
        Point::new(self.position.x + half, self.position.y + half)
    }
}

impl GeometryTrait for Polygon {
    fn bounds(&self) -> Rect {
        let side = self.side();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + side,
            self.position.y + side,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64, style: &ElementStyle) -> bool {
        if self.kind != PolygonKind::Circle {
            return hit_box(self.bounds(), point, tolerance, style);
        }
        let radius = self.side() / 2.0;
        let dist = (point - self.center()).hypot();
        let reach = tolerance + style.stroke_width / 2.0;
        if style.fill.is_some() {
            dist <= radius + reach
        } else {
            (dist - radius).abs() <= reach
        }
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn origin(&self) -> Point {
        self.position
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.width *= sx;
        self.height *= sy;
    }
}
