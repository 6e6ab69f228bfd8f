//! Drawable element definitions.
//!
//! An [`Element`] carries the fields every drawable shares (identity,
//! visibility, lock, opacity, rotation, style, shadow) and a [`Geometry`]
//! payload for the variant-specific data. Paint order is not stored on the
//! element: it is the element's position in the document's element list.

mod connector;
mod image;
mod polygon;
mod rectangle;
mod stroke;
mod text;

pub use connector::Connector;
pub use image::Image;
pub use polygon::{Polygon, PolygonKind};
pub use rectangle::Rectangle;
pub use stroke::{LineCap, Stroke};
pub use text::{FontStyle, Text, TextAlign};

use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
///
/// UUID v7: time-ordered, with counter and random bits, so ids minted in the
/// same millisecond (e.g. eraser segments) never collide.
pub type ElementId = Uuid;

/// Mint a fresh element id.
pub fn new_element_id() -> ElementId {
    Uuid::now_v7()
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` string.
    pub fn from_hex(color: &str) -> Option<Self> {
        if color == "transparent" {
            return Some(Self::transparent());
        }
        let hex = color.trim().strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke and fill shared by every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    /// Stroke color.
    pub stroke: SerializableColor,
    /// Stroke width in model units.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    #[serde(default)]
    pub fill: Option<SerializableColor>,
}

impl ElementStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke_color(&self) -> Color {
        self.stroke.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill_color(&self) -> Option<Color> {
        self.fill.map(Into::into)
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke: SerializableColor::black(),
            stroke_width: 2.0,
            fill: None,
        }
    }
}

/// Drop shadow rendering hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: SerializableColor,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Geometry shared behaviour, implemented by every payload type.
pub trait GeometryTrait {
    /// Axis-aligned bounding box in model space (rotation ignored).
    fn bounds(&self) -> Rect;

    /// Check if a model-space point hits this geometry.
    fn hit_test(&self, point: Point, tolerance: f64, style: &ElementStyle) -> bool;

    /// Move by a model-space delta.
    fn translate(&mut self, delta: Vec2);

    /// Anchor used for dragging and snapping.
    fn origin(&self) -> Point {
        let b = self.bounds();
        Point::new(b.x0, b.y0)
    }

    /// Scale by independent factors about `origin()`.
    fn scale(&mut self, sx: f64, sy: f64);
}

/// Variant-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Geometry {
    Stroke(Stroke),
    Rectangle(Rectangle),
    Polygon(Polygon),
    Line(Connector),
    Arrow(Connector),
    Text(Text),
    Image(Image),
}

impl Geometry {
    fn as_trait(&self) -> &dyn GeometryTrait {
        match self {
            Geometry::Stroke(g) => g,
            Geometry::Rectangle(g) => g,
            Geometry::Polygon(g) => g,
            Geometry::Line(g) | Geometry::Arrow(g) => g,
            Geometry::Text(g) => g,
            Geometry::Image(g) => g,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn GeometryTrait {
        match self {
            Geometry::Stroke(g) => g,
            Geometry::Rectangle(g) => g,
            Geometry::Polygon(g) => g,
            Geometry::Line(g) | Geometry::Arrow(g) => g,
            Geometry::Text(g) => g,
            Geometry::Image(g) => g,
        }
    }

    /// Short lowercase name of the variant, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Geometry::Stroke(_) => "stroke",
            Geometry::Rectangle(_) => "rectangle",
            Geometry::Polygon(p) => p.kind.name(),
            Geometry::Line(_) => "line",
            Geometry::Arrow(_) => "arrow",
            Geometry::Text(_) => "text",
            Geometry::Image(_) => "image",
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

/// A drawable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(default)]
    pub style: ElementStyle,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    /// Overall opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Rotation in degrees, normalized to `[0, 360)` on transform commit.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub shadow: Option<Shadow>,
}

impl Element {
    /// Create a visible, unlocked, opaque element with a fresh id.
    pub fn new(geometry: Geometry, style: ElementStyle) -> Self {
        Self {
            id: new_element_id(),
            geometry,
            style,
            visible: true,
            locked: false,
            opacity: 1.0,
            rotation: 0.0,
            shadow: None,
        }
    }

    /// Bounding box in model space.
    ///
    /// Circles, stars and the regular polygons report a square box from
    /// `min(width, height)`; text uses an approximate glyph box.
    pub fn bounds(&self) -> Rect {
        self.geometry.as_trait().bounds()
    }

    /// Check if a model-space point hits this element.
    ///
    /// Hidden elements are never hit. Box-like elements honour rotation about
    /// their origin.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if !self.visible {
            return false;
        }
        let point = if self.rotation != 0.0 && self.rotates_about_origin() {
            rotate_about(point, self.origin(), -self.rotation.to_radians())
        } else {
            point
        };
        self.geometry.as_trait().hit_test(point, tolerance, &self.style)
    }

    fn rotates_about_origin(&self) -> bool {
        matches!(
            self.geometry,
            Geometry::Rectangle(_) | Geometry::Polygon(_) | Geometry::Text(_) | Geometry::Image(_)
        )
    }

    /// Move by a model-space delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.geometry.as_trait_mut().translate(delta);
    }

    /// Anchor used for dragging and snapping.
    pub fn origin(&self) -> Point {
        self.geometry.as_trait().origin()
    }

    /// Move the element so that its origin lands on `target`.
    pub fn move_origin_to(&mut self, target: Point) {
        let delta = target - self.origin();
        self.translate(delta);
    }

    /// Deep copy with a fresh id, moved by `offset`.
    pub fn clone_with_new_id(&self, offset: Vec2) -> Self {
        let mut copy = self.clone();
        copy.id = new_element_id();
        copy.translate(offset);
        copy
    }

    /// Whether this element is a freehand pen stroke.
    pub fn is_stroke(&self) -> bool {
        matches!(self.geometry, Geometry::Stroke(_))
    }

    /// Get the text payload, if this element is text.
    pub fn as_text(&self) -> Option<&Text> {
        match &self.geometry {
            Geometry::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get the mutable text payload, if this element is text.
    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match &mut self.geometry {
            Geometry::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Whether the element can be picked by pointer interaction.
    pub fn is_interactive(&self) -> bool {
        self.visible && !self.locked
    }
}

/// Rotate `point` about `center` by `radians`.
pub(crate) fn rotate_about(point: Point, center: Point, radians: f64) -> Point {
    let (sin, cos) = radians.sin_cos();
    let d = point - center;
    Point::new(
        center.x + d.x * cos - d.y * sin,
        center.y + d.x * sin + d.y * cos,
    )
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Normalized rectangle spanned by two drag corners.
pub(crate) fn rect_from_corners(p1: Point, p2: Point) -> Rect {
    Rect::from_points(p1, p2)
}

/// Hit test a box outline or, when filled, its interior.
pub(crate) fn hit_box(rect: Rect, point: Point, tolerance: f64, style: &ElementStyle) -> bool {
    let reach = tolerance + style.stroke_width / 2.0;
    if style.fill.is_some() {
        rect.inflate(reach, reach).contains(point)
    } else {
        let outer = rect.inflate(reach, reach);
        let inner = rect.inflate(-reach, -reach);
        outer.contains(point) && !(inner.width() > 0.0 && inner.height() > 0.0 && inner.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_element(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new(
            Geometry::Rectangle(Rectangle::new(Point::new(x, y), w, h)),
            ElementStyle::default(),
        )
    }

    #[test]
    fn test_hex_roundtrip() {
        let c = SerializableColor::from_hex("#ff8000").unwrap();
        assert_eq!(c, SerializableColor::new(255, 128, 0, 255));
        assert_eq!(c.to_hex(), "#ff8000");
        assert_eq!(
            SerializableColor::from_hex("#fff"),
            Some(SerializableColor::white())
        );
        assert_eq!(
            SerializableColor::from_hex("#00000080").unwrap().to_hex(),
            "#00000080"
        );
        assert!(SerializableColor::from_hex("red").is_none());
        assert!(SerializableColor::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_element_defaults() {
        let e = rect_element(0.0, 0.0, 10.0, 10.0);
        assert!(e.visible);
        assert!(!e.locked);
        assert!((e.opacity - 1.0).abs() < f64::EPSILON);
        assert!(e.rotation.abs() < f64::EPSILON);
    }

    #[test]
    fn test_clone_with_new_id() {
        let e = rect_element(10.0, 10.0, 50.0, 50.0);
        let copy = e.clone_with_new_id(Vec2::new(20.0, 20.0));
        assert_ne!(copy.id, e.id);
        assert_eq!(copy.origin(), Point::new(30.0, 30.0));
        assert_eq!(copy.style, e.style);
    }

    #[test]
    fn test_ids_unique_within_tick() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| new_element_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_hidden_never_hit() {
        let mut style = ElementStyle::default();
        style.fill = Some(SerializableColor::white());
        let mut e = Element::new(
            Geometry::Rectangle(Rectangle::new(Point::ZERO, 100.0, 100.0)),
            style,
        );
        assert!(e.hit_test(Point::new(50.0, 50.0), 0.0));
        e.visible = false;
        assert!(!e.hit_test(Point::new(50.0, 50.0), 0.0));
    }

    #[test]
    fn test_rotated_hit_test() {
        let mut style = ElementStyle::default();
        style.fill = Some(SerializableColor::white());
        let mut e = Element::new(
            Geometry::Rectangle(Rectangle::new(Point::ZERO, 100.0, 10.0)),
            style,
        );
        e.rotation = 90.0;
        // Rotated 90° about the top-left, the bar now extends down the negative x side.
        assert!(e.hit_test(Point::new(-5.0, 50.0), 0.0));
        assert!(!e.hit_test(Point::new(50.0, 5.0), 0.0));
    }

    #[test]
    fn test_serde_roundtrip_keeps_all_fields() {
        let mut e = Element::new(
            Geometry::Text(Text::new(Point::new(5.0, 6.0), "hello".to_string())),
            ElementStyle {
                stroke: SerializableColor::new(1, 2, 3, 255),
                stroke_width: 4.0,
                fill: Some(SerializableColor::new(9, 9, 9, 128)),
            },
        );
        e.locked = true;
        e.visible = false;
        e.opacity = 0.5;
        e.rotation = 45.0;
        e.shadow = Some(Shadow {
            color: SerializableColor::black(),
            blur: 3.0,
            offset_x: 1.0,
            offset_y: 2.0,
        });

        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains(r#""type":"text""#));
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let id = new_element_id();
        let json = format!(
            r#"{{"id":"{id}","type":"rectangle","position":{{"x":1.0,"y":2.0}},"width":3.0,"height":4.0}}"#
        );
        let e: Element = serde_json::from_str(&json).unwrap();
        assert!(e.visible);
        assert!(!e.locked);
        assert!((e.opacity - 1.0).abs() < f64::EPSILON);
        assert_eq!(e.style, ElementStyle::default());
    }

    #[test]
    fn test_legacy_box_arrow_loads_as_endpoints() {
        let id = new_element_id();
        let json = format!(r#"{{"id":"{id}","type":"arrow","x":0.0,"y":10.0,"width":50.0,"height":20.0,"locked":true}}"#);
        let e: Element = serde_json::from_str(&json).unwrap();
        assert!(e.locked);
        match &e.geometry {
            Geometry::Arrow(c) => {
                assert_eq!(c.start, Point::new(0.0, 10.0));
                assert_eq!(c.end, Point::new(50.0, 30.0));
            }
            other => panic!("expected arrow, got {other:?}"),
        }
        // Saved back with endpoints.
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains(r#""end""#));
        assert!(!json.contains(r#""width""#));
    }

    #[test]
    fn test_point_to_segment_dist() {
        let d = point_to_segment_dist(Point::new(5.0, 3.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-12);
        let d = point_to_segment_dist(Point::new(13.0, 4.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }
}
