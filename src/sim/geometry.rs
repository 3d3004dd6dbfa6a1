//! 2D geometry helpers for the cave
//!
//! Grid snapping, polyline sampling and exact segment intersection. Everything here is
//! pure so the generator and the collision oracle can share it.

use std::collections::VecDeque;

use glam::Vec2;

use crate::lerp;

/// Round `value` to the nearest multiple of `step`
#[inline]
pub fn snap_to_step(value: f32, step: f32) -> f32 {
    (value / step).round() * step
}

/// Round `value` up to a multiple of `step`
#[inline]
pub fn ceil_to_step(value: f32, step: f32) -> f32 {
    (value / step).ceil() * step
}

/// Round `value` down to a multiple of `step`
#[inline]
pub fn floor_to_step(value: f32, step: f32) -> f32 {
    (value / step).floor() * step
}

/// Sample a polyline sorted by ascending x at horizontal position `x`.
///
/// Interpolates linearly between the two bracketing points. Outside the covered range
/// the nearest endpoint's y is returned (flat extrapolation). `None` for an empty line.
pub fn polyline_y_at_x(points: &VecDeque<Vec2>, x: f32) -> Option<f32> {
    let first = points.front()?;
    let last = points.back()?;
    if x <= first.x {
        return Some(first.y);
    }
    if x >= last.x {
        return Some(last.y);
    }

    // first.x < x < last.x, so 1 <= i <= len - 1
    let i = points.partition_point(|p| p.x <= x);
    let p = points[i - 1];
    let q = points[i];
    let span = q.x - p.x;
    if span <= 0.0 {
        return Some(q.y);
    }
    Some(lerp(p.y, q.y, (x - p.x) / span))
}

/// Exact test for segments AB and CD crossing or touching.
///
/// Parallel and collinear pairs report no intersection.
pub fn segments_intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    let ab = b - a;
    let cd = d - c;
    let denom = ab.perp_dot(cd);
    if denom == 0.0 {
        return false;
    }

    let ac = c - a;
    let t = ac.perp_dot(cd) / denom;
    let u = ac.perp_dot(ab) / denom;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Iterate the edges of a closed polygon, including the closing edge
pub fn polygon_edges(polygon: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// Horizontal extent `(min_x, max_x)` of a point set
pub fn x_extent(points: &[Vec2]) -> Option<(f32, f32)> {
    let first = points.first()?;
    Some(
        points
            .iter()
            .fold((first.x, first.x), |(lo, hi), p| (lo.min(p.x), hi.max(p.x))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[(f32, f32)]) -> VecDeque<Vec2> {
        points.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    #[test]
    fn test_snap_helpers() {
        assert_eq!(snap_to_step(13.0, 8.0), 16.0);
        assert_eq!(snap_to_step(11.9, 8.0), 8.0);
        assert_eq!(ceil_to_step(17.0, 16.0), 32.0);
        assert_eq!(floor_to_step(570.0, 8.0), 568.0);
    }

    #[test]
    fn test_polyline_interpolates_between_points() {
        let points = line(&[(0.0, 100.0), (20.0, 120.0), (40.0, 80.0)]);
        assert_eq!(polyline_y_at_x(&points, 10.0), Some(110.0));
        assert_eq!(polyline_y_at_x(&points, 30.0), Some(100.0));
        assert_eq!(polyline_y_at_x(&points, 20.0), Some(120.0));
    }

    #[test]
    fn test_polyline_extrapolates_flat() {
        let points = line(&[(0.0, 100.0), (20.0, 120.0)]);
        assert_eq!(polyline_y_at_x(&points, -50.0), Some(100.0));
        assert_eq!(polyline_y_at_x(&points, 500.0), Some(120.0));
        assert_eq!(polyline_y_at_x(&VecDeque::new(), 0.0), None);
    }

    #[test]
    fn test_segments_cross() {
        let hit = segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        );
        assert!(hit);
    }

    #[test]
    fn test_segments_touching_endpoint_count() {
        let hit = segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        );
        assert!(hit);
    }

    #[test]
    fn test_segments_apart() {
        let hit = segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 5.0),
            Vec2::new(10.0, 3.0),
        );
        assert!(!hit);
    }

    #[test]
    fn test_collinear_overlap_reports_no_hit() {
        let hit = segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(15.0, 0.0),
        );
        assert!(!hit);
    }

    #[test]
    fn test_polygon_edges_close_the_loop() {
        let tri = [Vec2::ZERO, Vec2::X, Vec2::Y];
        let edges: Vec<_> = polygon_edges(&tri).collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], (Vec2::Y, Vec2::ZERO));
    }
}
