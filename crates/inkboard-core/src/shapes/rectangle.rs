//! Rectangle geometry.

use super::{ElementStyle, GeometryTrait, hit_box, rect_from_corners};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A rectangle with optional rounded corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Corner radius (0 = sharp corners).
    #[serde(default)]
    pub corner_radius: f64,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
            corner_radius: 0.0,
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let rect = rect_from_corners(p1, p2);
        Self::new(Point::new(rect.x0, rect.y0), rect.width(), rect.height())
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

impl GeometryTrait for Rectangle {
    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64, style: &ElementStyle) -> bool {
        hit_box(self.as_rect(), point, tolerance, style)
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
