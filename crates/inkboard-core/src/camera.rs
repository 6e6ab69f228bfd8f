//! Camera module for pan/zoom transforms.
//!
//! The camera maps model space (document coordinates) to screen space
//! (pointer/viewport pixels) with a uniform scale followed by a translation:
//! `screen = model * scale + offset`.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed scale.
pub const MAX_SCALE: f64 = 5.0;

/// Zoom factor applied per mouse wheel notch (cursor-anchored).
pub const WHEEL_ZOOM_FACTOR: f64 = 1.1;
/// Zoom factor applied by the zoom in/out buttons (not anchored).
pub const BUTTON_ZOOM_FACTOR: f64 = 1.2;

/// Camera manages the view transform for the canvas.
///
/// It is only written by pan/zoom/reset/wheel operations and read by every
/// coordinate conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current uniform scale, always within `[MIN_SCALE, MAX_SCALE]`.
    #[serde(deserialize_with = "deserialize_scale")]
    scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Camera {
    /// Create a new camera at scale 1 with no pan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with the given offset and scale (scale is clamped).
    pub fn with(offset: Vec2, scale: f64) -> Self {
        Self {
            offset,
            scale: clamp_scale(scale),
        }
    }

    /// Current scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the scale directly, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = clamp_scale(scale);
    }

    /// Model-to-screen affine transform, for renderers.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Screen-to-model affine transform, for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    /// Convert a pointer (screen) point to model space.
    pub fn to_model(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.offset.x) / self.scale,
            (screen_point.y - self.offset.y) / self.scale,
        )
    }

    /// Convert a model point to screen space.
    pub fn to_screen(&self, model_point: Point) -> Point {
        Point::new(
            model_point.x * self.scale + self.offset.x,
            model_point.y * self.scale + self.offset.y,
        )
    }

    /// Convert a model-space rectangle to screen space.
    pub fn screen_rect(&self, model_rect: Rect) -> Rect {
        Rect::from_points(
            self.to_screen(Point::new(model_rect.x0, model_rect.y0)),
            self.to_screen(Point::new(model_rect.x1, model_rect.y1)),
        )
    }

    /// Model-space point at the centre of a viewport of the given size.
    pub fn viewport_center(&self, viewport: Size) -> Point {
        self.to_model(Point::new(viewport.width / 2.0, viewport.height / 2.0))
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping the model point under `screen_point` fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let anchor = self.to_model(screen_point);
        self.scale = clamp_scale(self.scale * factor);
        self.offset = Vec2::new(
            screen_point.x - anchor.x * self.scale,
            screen_point.y - anchor.y * self.scale,
        );
    }

    /// Wheel zoom: scrolling up (negative delta) zooms in, anchored at the cursor.
    pub fn zoom_wheel(&mut self, screen_point: Point, delta_y: f64) {
        let factor = if delta_y < 0.0 {
            WHEEL_ZOOM_FACTOR
        } else {
            1.0 / WHEEL_ZOOM_FACTOR
        };
        self.zoom_at(screen_point, factor);
    }

    /// Button zoom in. Changes scale only; the offset is untouched.
    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale * BUTTON_ZOOM_FACTOR);
    }

    /// Button zoom out. Changes scale only; the offset is untouched.
    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale / BUTTON_ZOOM_FACTOR);
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn deserialize_scale<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_scale)
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}
