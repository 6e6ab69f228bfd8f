//! Snap-to-grid for drag commits.

use kurbo::Point;

/// Grid size for snapping, in model units.
pub const GRID_SIZE: f64 = 50.0;

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if grid_size <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Snap `point` when `enabled`, otherwise return it unchanged.
pub fn snap_point(point: Point, enabled: bool, grid_size: f64) -> Point {
    if enabled { snap_to_grid(point, grid_size) } else { point }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(Point::new(74.0, 26.0), GRID_SIZE), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_snap_to_grid_exact() {
        assert_eq!(snap_to_grid(Point::new(100.0, -150.0), GRID_SIZE), Point::new(100.0, -150.0));
    }

    #[test]
    fn test_snap_to_grid_round_up() {
        assert_eq!(snap_to_grid(Point::new(75.0, 124.9), GRID_SIZE), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_snap_non_positive_grid_is_identity() {
        assert_eq!(snap_to_grid(Point::new(74.0, 26.0), 0.0), Point::new(74.0, 26.0));
    }

    #[test]
    fn test_snap_disabled() {
        assert_eq!(snap_point(Point::new(74.0, 26.0), false, GRID_SIZE), Point::new(74.0, 26.0));
    }
}
