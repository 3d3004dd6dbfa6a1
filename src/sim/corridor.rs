//! Sliding window of cave boundaries and the collision oracle
//!
//! The corridor is two index-aligned polylines, `top` (ceiling) and `bottom` (floor),
//! stored as double-ended queues so columns can be appended on the right and evicted on
//! the left in O(1). Coordinates are screen space: x grows to the right, y grows down.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{polygon_edges, polyline_y_at_x, segments_intersect, x_extent};

/// The windowed cave geometry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    top: VecDeque<Vec2>,
    bottom: VecDeque<Vec2>,
}

impl Corridor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corridor from explicit boundaries (level editors, tests).
    ///
    /// # Panics
    /// If the boundaries differ in length or are not column-aligned and sorted by x.
    pub fn from_points(top: Vec<Vec2>, bottom: Vec<Vec2>) -> Self {
        assert_eq!(
            top.len(),
            bottom.len(),
            "corridor boundaries must have the same number of columns"
        );
        for (i, (t, b)) in top.iter().zip(&bottom).enumerate() {
            assert!(t.x == b.x, "column {i} is misaligned: top x {} vs bottom x {}", t.x, b.x);
        }
        assert!(
            top.windows(2).all(|w| w[0].x < w[1].x),
            "corridor columns must be sorted by ascending x"
        );
        Self {
            top: top.into(),
            bottom: bottom.into(),
        }
    }

    /// Append a column on the right
    pub fn push(&mut self, x: f32, top_y: f32, bottom_y: f32) {
        debug_assert!(
            self.top.back().is_none_or(|p| p.x < x),
            "columns must be appended left to right"
        );
        self.top.push_back(Vec2::new(x, top_y));
        self.bottom.push_back(Vec2::new(x, bottom_y));
    }

    /// Scroll every column left by `dx`
    pub fn shift(&mut self, dx: f32) {
        for p in self.top.iter_mut().chain(self.bottom.iter_mut()) {
            p.x -= dx;
        }
    }

    /// Drop leading columns while the second column lies left of `limit_x`.
    ///
    /// At least two columns are always kept. Returns how many were dropped.
    pub fn evict_before(&mut self, limit_x: f32) -> usize {
        let mut evicted = 0;
        while self.top.len() > 2 && self.top[1].x < limit_x {
            self.top.pop_front();
            self.bottom.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.top.clear();
        self.bottom.clear();
    }

    /// Number of columns in the window
    pub fn len(&self) -> usize {
        self.top.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }

    pub fn top(&self) -> &VecDeque<Vec2> {
        &self.top
    }

    pub fn bottom(&self) -> &VecDeque<Vec2> {
        &self.bottom
    }

    /// Last column pair, if any
    pub fn last_column(&self) -> Option<(Vec2, Vec2)> {
        Some((*self.top.back()?, *self.bottom.back()?))
    }

    /// Ceiling height at `x`
    pub fn top_y_at(&self, x: f32) -> Option<f32> {
        polyline_y_at_x(&self.top, x)
    }

    /// Floor height at `x`
    pub fn bottom_y_at(&self, x: f32) -> Option<f32> {
        polyline_y_at_x(&self.bottom, x)
    }

    /// Midpoint of the opening at `x`
    pub fn center_at(&self, x: f32) -> Option<f32> {
        Some((self.top_y_at(x)? + self.bottom_y_at(x)?) / 2.0)
    }

    /// Check whether a polygon touches or leaves the corridor.
    ///
    /// A hit is either a vertex outside `[ceiling, floor]` at its own x, or a polygon edge
    /// crossing a boundary segment. The edge test catches spikes thinner than the polygon
    /// whose tips slip between two vertices.
    pub fn collides(&self, polygon: &[Vec2]) -> bool {
        debug_assert!(polygon.len() >= 3, "collision polygon needs at least 3 vertices");
        if self.is_empty() {
            return false;
        }

        for v in polygon {
            let (Some(top), Some(bottom)) = (self.top_y_at(v.x), self.bottom_y_at(v.x)) else {
                return false;
            };
            if v.y < top || v.y > bottom {
                return true;
            }
        }

        let Some((min_x, max_x)) = x_extent(polygon) else {
            return false;
        };
        polygon_edges(polygon).any(|(a, b)| {
            crosses_boundary(&self.top, a, b, min_x, max_x)
                || crosses_boundary(&self.bottom, a, b, min_x, max_x)
        })
    }
}

/// Edge AB against the segments of `line` that overlap `[min_x, max_x]`
fn crosses_boundary(line: &VecDeque<Vec2>, a: Vec2, b: Vec2, min_x: f32, max_x: f32) -> bool {
    // Segments entirely left of the polygon can be skipped wholesale
    let start = line.partition_point(|p| p.x < min_x).saturating_sub(1);
    line.range(start..)
        .zip(line.range(start + 1..))
        .take_while(|(p, _)| p.x <= max_x)
        .any(|(&p, &q)| segments_intersect(a, b, p, q))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(top_y: f32, bottom_y: f32) -> Corridor {
        let xs = [0.0, 100.0, 200.0, 300.0];
        Corridor::from_points(
            xs.iter().map(|&x| Vec2::new(x, top_y)).collect(),
            xs.iter().map(|&x| Vec2::new(x, bottom_y)).collect(),
        )
    }

    /// Flat cave at 100/400 with a narrow stalactite at x=105 reaching down to y=300
    fn with_needle() -> Corridor {
        let xs = [0.0, 100.0, 105.0, 110.0, 200.0];
        let top_ys = [100.0, 100.0, 300.0, 100.0, 100.0];
        Corridor::from_points(
            xs.iter().zip(top_ys).map(|(&x, y)| Vec2::new(x, y)).collect(),
            xs.iter().map(|&x| Vec2::new(x, 400.0)).collect(),
        )
    }

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
            Vec2::new(x0, y1),
        ]
    }

    #[test]
    fn test_polygon_inside_does_not_collide() {
        let corridor = flat(100.0, 400.0);
        assert!(!corridor.collides(&rect(140.0, 105.0, 170.0, 395.0)));
    }

    #[test]
    fn test_vertex_above_ceiling_collides() {
        let corridor = flat(100.0, 400.0);
        let mut poly = rect(140.0, 200.0, 170.0, 220.0);
        poly[0].y = 99.0;
        assert!(corridor.collides(&poly));
    }

    #[test]
    fn test_vertex_below_floor_collides() {
        let corridor = flat(100.0, 400.0);
        assert!(corridor.collides(&rect(140.0, 380.0, 170.0, 401.0)));
    }

    #[test]
    fn test_needle_between_vertices_caught_by_edges() {
        let corridor = with_needle();
        // Thin bar straddling the needle: both ends are well inside the opening
        let bar = rect(95.0, 250.0, 115.0, 251.0);
        for v in &bar {
            let top = corridor.top_y_at(v.x).expect("top");
            let bottom = corridor.bottom_y_at(v.x).expect("bottom");
            assert!(v.y > top && v.y < bottom);
        }
        assert!(corridor.collides(&bar));
    }

    #[test]
    fn test_bar_below_needle_tip_is_clear() {
        let corridor = with_needle();
        assert!(!corridor.collides(&rect(95.0, 320.0, 115.0, 321.0)));
    }

    #[test]
    fn test_center_and_flat_extrapolation() {
        let corridor = flat(100.0, 400.0);
        assert_eq!(corridor.center_at(150.0), Some(250.0));
        assert_eq!(corridor.center_at(-40.0), Some(250.0));
        assert_eq!(corridor.center_at(900.0), Some(250.0));
        assert_eq!(Corridor::new().center_at(0.0), None);
    }

    #[test]
    fn test_shift_and_evict_keep_columns_aligned() {
        let mut corridor = flat(100.0, 400.0);
        corridor.shift(250.0);
        // second column now at -150
        assert_eq!(corridor.evict_before(-20.0), 2);
        assert_eq!(corridor.len(), 2);
        assert_eq!(corridor.top()[0].x, corridor.bottom()[0].x);
        // never drops below two columns
        corridor.shift(1000.0);
        assert_eq!(corridor.evict_before(-20.0), 0);
        assert_eq!(corridor.len(), 2);
    }

    #[test]
    #[should_panic(expected = "misaligned")]
    fn test_from_points_rejects_misaligned_columns() {
        Corridor::from_points(
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)],
            vec![Vec2::new(0.0, 50.0), Vec2::new(12.0, 50.0)],
        );
    }
}
