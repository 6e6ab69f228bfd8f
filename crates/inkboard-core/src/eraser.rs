//! Stroke-splitting eraser.
//!
//! Erasing removes the pen-stroke points that fall inside the eraser circle
//! and splits each affected stroke into the runs of points that survive.

use crate::shapes::{Element, Geometry, Stroke, new_element_id};
use kurbo::Point;

/// Eraser radius as a multiple of the current stroke width.
pub const ERASER_RADIUS_FACTOR: f64 = 3.0;

/// Minimum number of points a surviving segment must keep.
pub const MIN_SEGMENT_POINTS: usize = 2;

/// Eraser radius for a given tool stroke width.
pub fn eraser_radius(stroke_width: f64) -> f64 {
    stroke_width * ERASER_RADIUS_FACTOR
}

/// Split a point list around an eraser circle.
///
/// Points at a distance `>= radius` from `center` are kept; each run of kept
/// points with at least [`MIN_SEGMENT_POINTS`] points becomes a segment.
pub fn split_points(points: &[Point], center: Point, radius: f64) -> Vec<Vec<Point>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for &point in points {
        if (point - center).hypot() >= radius {
            current.push(point);
        } else {
            close_segment(&mut segments, &mut current);
        }
    }
    close_segment(&mut segments, &mut current);
    segments
}

fn close_segment(segments: &mut Vec<Vec<Point>>, current: &mut Vec<Point>) {
    let run = std::mem::take(current);
    if run.len() >= MIN_SEGMENT_POINTS {
        segments.push(run);
    }
}

/// Run one eraser pass over `elements`.
///
/// Non-stroke elements pass through untouched, as do locked or hidden strokes
/// and strokes with no point inside the circle. Each affected stroke is
/// replaced, in place, by zero or more new strokes with fresh ids and the
/// original's style. Returns `None` when nothing was erased.
pub fn erase(elements: &[Element], center: Point, radius: f64) -> Option<Vec<Element>> {
    let mut changed = false;
    let mut result = Vec::with_capacity(elements.len());

    for element in elements {
        let Geometry::Stroke(stroke) = &element.geometry else {
            result.push(element.clone());
            continue;
        };
        if !element.is_interactive() || !touches(stroke, center, radius) {
            result.push(element.clone());
            continue;
        }

        changed = true;
        let segments = split_points(&stroke.points, center, radius);
        log::trace!(
            "eraser split stroke {} into {} segment(s)",
            element.id,
            segments.len()
        );
        for points in segments {
            let mut piece = element.clone();
            piece.id = new_element_id();
            piece.geometry = Geometry::Stroke(stroke.with_points(points));
            result.push(piece);
        }
    }

    changed.then_some(result)
}

fn touches(stroke: &Stroke, center: Point, radius: f64) -> bool {
    stroke
        .points
        .iter()
        .any(|p| (*p - center).hypot() < radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ElementStyle, Rectangle};

    fn line_points(xs: &[f64]) -> Vec<Point> {
        xs.iter().map(|&x| Point::new(x, 0.0)).collect()
    }

    fn stroke_element(points: Vec<Point>) -> Element {
        Element::new(
            Geometry::Stroke(Stroke::from_points(points)),
            ElementStyle::default(),
        )
    }

    fn stroke_points(element: &Element) -> &[Point] {
        match &element.geometry {
            Geometry::Stroke(s) => &s.points,
            _ => panic!("expected stroke"),
        }
    }

    #[test]
    fn test_split_middle_of_stroke() {
        let original = stroke_element(line_points(&[0.0, 10.0, 20.0, 30.0, 40.0]));
        let result = erase(std::slice::from_ref(&original), Point::new(20.0, 0.0), 5.0).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(stroke_points(&result[0]), line_points(&[0.0, 10.0]).as_slice());
        assert_eq!(stroke_points(&result[1]), line_points(&[30.0, 40.0]).as_slice());
        assert!(result.iter().all(|e| e.id != original.id));
        assert_ne!(result[0].id, result[1].id);
        assert!(result.iter().all(|e| e.style == original.style));
    }

    #[test]
    fn test_erase_whole_stroke_removes_it() {
        let original = stroke_element(line_points(&[0.0, 1.0, 2.0, 3.0]));
        let result = erase(&[original], Point::new(1.5, 0.0), 10.0).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_short_runs_are_dropped() {
        let segments = split_points(&line_points(&[0.0, 10.0, 20.0, 30.0]), Point::new(10.0, 0.0), 5.0);
        assert_eq!(segments, vec![line_points(&[20.0, 30.0])]);
    }

    #[test]
    fn test_segments_never_below_two_points() {
        let points: Vec<Point> = (0..50)
            .map(|i| Point::new(i as f64 * 3.0, ((i * 7) % 11) as f64))
            .collect();
        for cx in (0..150).step_by(7) {
            for segment in split_points(&points, Point::new(cx as f64, 5.0), 6.0) {
                assert!(segment.len() >= MIN_SEGMENT_POINTS);
            }
        }
    }

    #[test]
    fn test_boundary_distance_is_kept() {
        let segments = split_points(&line_points(&[0.0, 5.0, 10.0]), Point::new(10.0, 0.0), 5.0);
        assert_eq!(segments, vec![line_points(&[0.0, 5.0])]);
    }

    #[test]
    fn test_untouched_elements_pass_through() {
        let rect = Element::new(
            Geometry::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0)),
            ElementStyle::default(),
        );
        let stroke = stroke_element(line_points(&[100.0, 110.0]));
        let elements = vec![rect, stroke];
        assert!(erase(&elements, Point::new(5.0, 5.0), 3.0).is_none());
    }

    #[test]
    fn test_locked_stroke_is_not_erased() {
        let mut stroke = stroke_element(line_points(&[0.0, 10.0, 20.0]));
        stroke.locked = true;
        assert!(erase(&[stroke], Point::new(10.0, 0.0), 5.0).is_none());
    }

    #[test]
    fn test_order_is_preserved() {
        let a = stroke_element(line_points(&[0.0, 10.0, 20.0, 30.0, 40.0]));
        let b = Element::new(
            Geometry::Rectangle(Rectangle::new(Point::new(500.0, 500.0), 10.0, 10.0)),
            ElementStyle::default(),
        );
        let b_id = b.id;
        let result = erase(&[a, b], Point::new(20.0, 0.0), 5.0).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result[2].id, b_id);
    }

    #[test]
    fn test_radius() {
        assert!((eraser_radius(5.0) - 15.0).abs() < f64::EPSILON);
    }
}
