//! Image geometry.
//!
//! Only the reference to the uploaded asset is stored; decoding and drawing
//! the bitmap is the renderer's job.

use super::{ElementStyle, GeometryTrait};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// A placed raster image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Top-left corner position.
    pub position: Point,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
    /// Resolved asset URL.
    pub url: String,
}

impl Image {
    pub fn new(position: Point, width: f64, height: f64, url: String) -> Self {
        Self {
            position,
            width,
            height,
            url,
        }
    }

    /// Display size that fits `natural` within `max_width`, preserving aspect.
    pub fn fit_size(natural: Size, max_width: f64) -> Size {
        if natural.width <= 0.0 || natural.height <= 0.0 {
            return Size::new(max_width, max_width);
        }
        if natural.width <= max_width {
            return natural;
        }
        let ratio = max_width / natural.width;
        Size::new(max_width, natural.height * ratio)
    }

    /// Create an image of the fitted size centred on `center`.
    pub fn centered(url: String, natural: Size, max_width: f64, center: Point) -> Self {
        let size = Self::fit_size(natural, max_width);
        Self::new(
            Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
            size.width,
            size.height,
            url,
        )
    }
}

impl GeometryTrait for Image {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64, _style: &ElementStyle) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
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
