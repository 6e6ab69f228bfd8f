//! Straight line and arrow geometry.

use super::{ElementStyle, GeometryTrait, point_to_segment_dist};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A straight segment between two true endpoints.
///
/// Used by both plain lines and arrows; the arrow head is a rendering concern
/// and points from `start` to `end`. Records that store a legacy
/// `x, y, width, height` box instead of endpoints are accepted on load and
/// converted with [`Connector::from_box`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ConnectorRepr")]
pub struct Connector {
    pub start: Point,
    pub end: Point,
}

/// Accepted on-disk shapes of a connector.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConnectorRepr {
    Endpoints { start: Point, end: Point },
    Box { x: f64, y: f64, width: f64, height: f64 },
}

impl From<ConnectorRepr> for Connector {
    fn from(repr: ConnectorRepr) -> Self {
        match repr {
            ConnectorRepr::Endpoints { start, end } => Connector::new(start, end),
            ConnectorRepr::Box { x, y, width, height } => Connector::from_box(x, y, width, height),
        }
    }
}

impl Connector {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Build from a legacy `x, y, width, height` box: the diagonal from the
    /// top-left corner to the opposite corner.
    pub fn from_box(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(x, y), Point::new(x + width, y + height))
    }

    /// Endpoints flattened as `[x1, y1, x2, y2]`.
    pub fn flat_points(&self) -> [f64; 4] {
        [self.start.x, self.start.y, self.end.x, self.end.y]
    }

    /// Get the length of the segment.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }
}

impl GeometryTrait for Connector {
    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64, style: &ElementStyle) -> bool {
        point_to_segment_dist(point, self.start, self.end) <= tolerance + style.stroke_width / 2.0
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        let origin = self.origin();
        for p in [&mut self.start, &mut self.end] {
            p.x = origin.x + (p.x - origin.x) * sx;
            p.y = origin.y + (p.y - origin.y) * sy;
        }
    }
}
