//! Freehand pen stroke geometry.

use super::{ElementStyle, GeometryTrait, point_to_segment_dist};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Line cap rendering hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

fn default_tension() -> f64 {
    Stroke::DEFAULT_TENSION
}

/// A freehand drawing (series of points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    /// Points in drawing order.
    pub points: Vec<Point>,
    /// Curve smoothing hint for the renderer.
    #[serde(default = "default_tension")]
    pub tension: f64,
    #[serde(default)]
    pub line_cap: LineCap,
}

impl Stroke {
    pub const DEFAULT_TENSION: f64 = 0.5;

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            points,
            tension: Self::DEFAULT_TENSION,
            line_cap: LineCap::default(),
        }
    }

    /// Copy of this stroke with the same rendering hints but other points.
    pub fn with_points(&self, points: Vec<Point>) -> Self {
        Self {
            points,
            tension: self.tension,
            line_cap: self.line_cap,
        }
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl GeometryTrait for Stroke {
    fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
    }

    fn hit_test(&self, point: Point, tolerance: f64, style: &ElementStyle) -> bool {
        let reach = tolerance + style.stroke_width / 2.0;
        match self.points.as_slice() {
            [] => false,
            [only] => (point - *only).hypot() <= reach,
            points => points
                .windows(2)
                .any(|w| point_to_segment_dist(point, w[0], w[1]) <= reach),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        let origin = self.origin();
        for point in &mut self.points {
            point.x = origin.x + (point.x - origin.x) * sx;
            point.y = origin.y + (point.y - origin.y) * sy;
        }
    }
}
