//! Tool kinds, the in-progress draft buffer and element construction.

use crate::shapes::{
    Connector, Element, ElementStyle, FontStyle, Geometry, Polygon, PolygonKind, Rectangle, Stroke,
    Text, TextAlign,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Minimum number of buffered points for a draft to produce anything.
pub const MIN_DRAFT_POINTS: usize = 2;

/// Drag-created shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
    Star,
    Hexagon,
    Pentagon,
    Line,
    Arrow,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Triangle,
        ShapeKind::Star,
        ShapeKind::Hexagon,
        ShapeKind::Pentagon,
        ShapeKind::Line,
        ShapeKind::Arrow,
    ];

    /// Whether the shape keeps its raw endpoints instead of a box.
    pub fn is_connector(self) -> bool {
        matches!(self, ShapeKind::Line | ShapeKind::Arrow)
    }

    fn polygon_kind(self) -> Option<PolygonKind> {
        match self {
            ShapeKind::Circle => Some(PolygonKind::Circle),
            ShapeKind::Triangle => Some(PolygonKind::Triangle),
            ShapeKind::Star => Some(PolygonKind::Star),
            ShapeKind::Hexagon => Some(PolygonKind::Hexagon),
            ShapeKind::Pentagon => Some(PolygonKind::Pentagon),
            ShapeKind::Rectangle | ShapeKind::Line | ShapeKind::Arrow => None,
        }
    }
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ToolKind {
    #[default]
    Select,
    Pen,
    Eraser,
    Text,
    Image,
    Shape(ShapeKind),
}

impl ToolKind {
    /// Whether pointer-down with this tool starts a draft.
    pub fn draws(self) -> bool {
        matches!(self, ToolKind::Pen | ToolKind::Eraser | ToolKind::Shape(_))
    }
}

/// Font settings applied to new text elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSettings {
    pub font_size: f64,
    pub font_family: String,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub align: TextAlign,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            font_size: Text::DEFAULT_FONT_SIZE,
            font_family: Text::DEFAULT_FONT_FAMILY.to_string(),
            font_style: FontStyle::Normal,
            align: TextAlign::Left,
        }
    }
}

/// Point buffer of an in-progress pen, eraser or shape drag.
///
/// Pen and eraser drafts accumulate every point. Shape drafts hold exactly
/// the start and the current point.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    tool: ToolKind,
    points: Vec<Point>,
}

impl Draft {
    /// Start a draft seeded with the model-space pointer position.
    pub fn begin(tool: ToolKind, point: Point) -> Self {
        Self {
            tool,
            points: vec![point],
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the draft has enough points to be committed.
    pub fn is_committable(&self) -> bool {
        self.points.len() >= MIN_DRAFT_POINTS
    }

    /// Add a pointer sample.
    pub fn extend(&mut self, point: Point) {
        match self.tool {
            ToolKind::Shape(_) => {
                self.points.truncate(1);
                self.points.push(point);
            }
            _ => self.points.push(point),
        }
    }

    /// Add the pointer-up sample unless it repeats the last point.
    pub fn finish_at(&mut self, point: Point) {
        if self.points.last() != Some(&point) {
            self.extend(point);
        }
    }

    /// Build the element this draft produces, if any.
    ///
    /// Eraser drafts never produce an element; their effect is already
    /// applied to the live document.
    pub fn into_element(self, style: &ElementStyle, corner_radius: f64) -> Option<Element> {
        if !self.is_committable() {
            return None;
        }
        match self.tool {
            ToolKind::Pen => Some(Element::new(
                Geometry::Stroke(Stroke::from_points(self.points)),
                style.clone(),
            )),
            ToolKind::Shape(kind) => {
                let start = self.points[0];
                let end = self.points[self.points.len() - 1];
                Some(create_shape(kind, start, end, style, corner_radius))
            }
            _ => None,
        }
    }
}

/// Create a drag-shaped element spanning `start` to `end`.
///
/// Box shapes take `x = min`, `y = min` and absolute extents; lines and
/// arrows keep the raw endpoints.
pub fn create_shape(
    kind: ShapeKind,
    start: Point,
    end: Point,
    style: &ElementStyle,
    corner_radius: f64,
) -> Element {
    let geometry = if let Some(polygon) = kind.polygon_kind() {
        let (position, width, height) = box_from_drag(start, end);
        Geometry::Polygon(Polygon::new(polygon, position, width, height))
    } else {
        match kind {
            ShapeKind::Line => Geometry::Line(Connector::new(start, end)),
            ShapeKind::Arrow => Geometry::Arrow(Connector::new(start, end)),
            _ => {
                let mut rect = Rectangle::from_corners(start, end);
                rect.corner_radius = corner_radius;
                Geometry::Rectangle(rect)
            }
        }
    };
    Element::new(geometry, style.clone())
}

/// Create a text element. Text is painted with the style's fill.
pub fn create_text(position: Point, content: String, font: &FontSettings, style: &ElementStyle) -> Element {
    let text = Text {
        position,
        content,
        font_size: font.font_size,
        font_family: font.font_family.clone(),
        font_style: font.font_style,
        align: font.align,
    };
    let mut style = style.clone();
    if style.fill.is_none() {
        style.fill = Some(style.stroke);
    }
    Element::new(Geometry::Text(text), style)
}

fn box_from_drag(start: Point, end: Point) -> (Point, f64, f64) {
    (
        Point::new(start.x.min(end.x), start.y.min(end.y)),
        (end.x - start.x).abs(),
        (end.y - start.y).abs(),
    )
}
