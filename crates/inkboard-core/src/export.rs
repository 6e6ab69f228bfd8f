//! Export requests handed to a rasterizing host.
//!
//! The core only packages the visible document and the view; turning it
//! into PNG or JPEG bytes is the job of an [`Exporter`].

use crate::camera::Camera;
use crate::canvas::combined_bounds;
use crate::shapes::{Element, SerializableColor};
use kurbo::{Affine, Rect, Size};
use serde::{Deserialize, Serialize};

/// Padding around content-fitted exports, in model units.
pub const EXPORT_PADDING: f64 = 20.0;

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }
}

/// Which part of the canvas to rasterize.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportArea {
    /// What is currently on screen.
    #[default]
    Viewport,
    /// The bounds of all visible elements plus [`EXPORT_PADDING`].
    Content,
}

/// Everything an exporter needs to rasterize the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    /// Visible elements in paint order.
    pub elements: Vec<Element>,
    pub camera: Camera,
    /// Viewport size in screen pixels.
    pub viewport: Size,
    /// Device pixels per screen pixel.
    pub pixel_ratio: f64,
    pub format: ExportFormat,
    pub area: ExportArea,
    /// Background fill; JPEG has no alpha so it always needs one.
    pub background: SerializableColor,
}

impl ExportRequest {
    /// Build a request from the document; hidden elements are dropped.
    pub fn new(elements: &[Element], camera: Camera, viewport: Size) -> Self {
        Self {
            elements: elements.iter().filter(|e| e.visible).cloned().collect(),
            camera,
            viewport,
            pixel_ratio: 1.0,
            format: ExportFormat::default(),
            area: ExportArea::default(),
            background: SerializableColor::white(),
        }
    }

    /// Set the pixel ratio (values below 0.1 are raised to 0.1).
    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = if pixel_ratio.is_finite() {
            pixel_ratio.max(0.1)
        } else {
            1.0
        };
        self
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_area(mut self, area: ExportArea) -> Self {
        self.area = area;
        self
    }

    pub fn with_background(mut self, background: SerializableColor) -> Self {
        self.background = background;
        self
    }

    /// Model-space region being exported, or `None` for an empty content
    /// export.
    pub fn model_region(&self) -> Option<Rect> {
        match self.area {
            ExportArea::Viewport => {
                let screen = Rect::from_origin_size((0.0, 0.0), self.viewport);
                Some(self.camera.inverse_transform().transform_rect_bbox(screen))
            }
            ExportArea::Content => combined_bounds(&self.elements)
                .map(|b| b.inflate(EXPORT_PADDING, EXPORT_PADDING)),
        }
    }

    /// Model-to-output-pixel transform.
    pub fn transform(&self) -> Option<Affine> {
        match self.area {
            ExportArea::Viewport => {
                Some(Affine::scale(self.pixel_ratio) * self.camera.transform())
            }
            ExportArea::Content => {
                let region = self.model_region()?;
                Some(Affine::scale(self.pixel_ratio) * Affine::translate((-region.x0, -region.y0)))
            }
        }
    }

    /// Output image size in device pixels.
    pub fn output_size(&self) -> Option<(u32, u32)> {
        let size = match self.area {
            ExportArea::Viewport => self.viewport,
            ExportArea::Content => self.model_region()?.size(),
        };
        let width = (size.width * self.pixel_ratio).round().max(1.0) as u32;
        let height = (size.height * self.pixel_ratio).round().max(1.0) as u32;
        Some((width, height))
    }
}

/// Rasterizing backend implemented by the host.
pub trait Exporter {
    type Error;

    /// Encode the request as image bytes in `request.format`.
    fn export(&self, request: &ExportRequest) -> Result<Vec<u8>, Self::Error>;
}
