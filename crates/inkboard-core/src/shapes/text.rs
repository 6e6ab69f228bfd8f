//! Text geometry.

use super::{ElementStyle, GeometryTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Font style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "bold")]
    Bold,
    #[serde(rename = "italic")]
    Italic,
    #[serde(rename = "bold italic")]
    BoldItalic,
}

impl FontStyle {
    /// CSS-like name, as the renderer expects it.
    pub fn name(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Bold => "bold",
            FontStyle::Italic => "italic",
            FontStyle::BoldItalic => "bold italic",
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A text block. Its color is the element's fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    /// Position (top-left corner of text bounding box).
    pub position: Point,
    /// The text content.
    #[serde(rename = "text")]
    pub content: String,
    /// Font size in model units.
    pub font_size: f64,
    pub font_family: String,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub align: TextAlign,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";
    /// Approximate glyph advance as a fraction of the font size.
    pub const AVG_CHAR_WIDTH_RATIO: f64 = 0.6;
    /// Line height as a multiple of the font size.
    pub const LINE_HEIGHT_RATIO: f64 = 1.2;

    /// Create a new text block with default font settings.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_style: FontStyle::default(),
            align: TextAlign::default(),
        }
    }

    /// Approximate layout size. Exact glyph metrics belong to the renderer.
    pub fn approximate_size(&self) -> (f64, f64) {
        let longest = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let lines = self.content.lines().count().max(1);
        (
            self.font_size * Self::AVG_CHAR_WIDTH_RATIO * longest as f64,
            self.font_size * Self::LINE_HEIGHT_RATIO * lines as f64,
        )
    }
}

impl GeometryTrait for Text {
    fn bounds(&self) -> Rect {
        let (w, h) = self.approximate_size();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + w,
            self.position.y + h,
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

    fn scale(&mut self, _sx: f64, sy: f64) {
        self.font_size *= sy;
    }
}
