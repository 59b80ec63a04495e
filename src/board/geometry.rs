//! Geometry primitives in canonical board coordinates.
//!
//! All coordinates are integer nanometres ([`Coord`]). Helpers here are used for
//! hit testing, bounding boxes for dirty tracking, and validation in the
//! creation collaborator.

use serde::{Deserialize, Serialize};

/// Canonical board coordinate (1 unit = 1 nm).
pub type Coord = i64;

/// Largest magnitude a parsed coordinate may have (2^53 nm, about 9000 km).
///
/// Keeps sums and differences of two coordinates inside `i64` and exactly
/// representable as `f64`.
pub const MAX_COORD: Coord = 1 << 53;

/// A point on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance, computed in 128-bit to avoid overflow.
    pub fn distance_sq(&self, other: Point) -> i128 {
        let dx = self.x as i128 - other.x as i128;
        let dy = self.y as i128 - other.y as i128;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.distance_sq(other) as f64).sqrt()
    }

    /// Returns this point translated by `(dx, dy)`, saturating at the `i64` range.
    pub fn offset(&self, dx: Coord, dy: Coord) -> Point {
        Point::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Translated point, or `None` when a coordinate would overflow.
    pub fn checked_offset(&self, dx: Coord, dy: Coord) -> Option<Point> {
        Some(Point::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// Snaps the point to the nearest multiple of `grid`. A grid of 0 (or less) is a no-op.
    pub fn snap(&self, grid: Coord) -> Point {
        if grid <= 0 {
            return *self;
        }
        let grid = grid as i128;
        let snap_axis = |v: Coord| -> Coord {
            let v = v as i128;
            let half = grid / 2;
            let snapped = if v >= 0 {
                ((v + half) / grid) * grid
            } else {
                -(((-v) + half) / grid) * grid
            };
            snapped.clamp(Coord::MIN as i128, Coord::MAX as i128) as Coord
        };
        Point::new(snap_axis(self.x), snap_axis(self.y))
    }
}

impl From<(Coord, Coord)> for Point {
    fn from((x, y): (Coord, Coord)) -> Self {
        Point::new(x, y)
    }
}

/// Axis-aligned box with inclusive bounds, used for hit testing and dirty tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: Coord,
    pub min_y: Coord,
    pub max_x: Coord,
    pub max_y: Coord,
}

impl Rect {
    /// Builds a normalized rectangle from two opposite corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Smallest rectangle containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut rect = Rect::from_corners(*first, *first);
        for p in &points[1..] {
            rect.include(*p);
        }
        Some(rect)
    }

    pub fn width(&self) -> Coord {
        self.max_x.saturating_sub(self.min_x)
    }

    pub fn height(&self) -> Coord {
        self.max_y.saturating_sub(self.min_y)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// True when `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Grows the rectangle to include `p`.
    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Returns the union of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Expands the rectangle evenly in all directions.
    pub fn inflate(&self, amount: Coord) -> Rect {
        Rect {
            min_x: self.min_x.saturating_sub(amount),
            min_y: self.min_y.saturating_sub(amount),
            max_x: self.max_x.saturating_add(amount),
            max_y: self.max_y.saturating_add(amount),
        }
    }
}

/// Distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (px, py) = (p.x as f64, p.y as f64);
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }
    let t = (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0);
    let cx = ax + t * dx;
    let cy = ay + t * dy;
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Even-odd point-in-polygon test. Points on the outline count as inside.
pub fn point_in_polygon(p: Point, outline: &[Point]) -> bool {
    if outline.len() < 3 {
        return false;
    }
    for (i, a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        if distance_to_segment(p, *a, b) < 0.5 {
            return true;
        }
    }

    let (px, py) = (p.x as f64, p.y as f64);
    let mut inside = false;
    let mut j = outline.len() - 1;
    for i in 0..outline.len() {
        let (xi, yi) = (outline[i].x as f64, outline[i].y as f64);
        let (xj, yj) = (outline[j].x as f64, outline[j].y as f64);
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Twice the signed area of a closed outline (shoelace formula).
pub fn signed_area2(outline: &[Point]) -> i128 {
    if outline.len() < 3 {
        return 0;
    }
    let mut acc: i128 = 0;
    for (i, a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        acc += a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128;
    }
    acc
}

/// Normalizes an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_rounds_to_nearest_grid_line() {
        assert_eq!(Point::new(149, 151).snap(100), Point::new(100, 200));
        assert_eq!(Point::new(-149, -151).snap(100), Point::new(-100, -200));
        assert_eq!(Point::new(7, 9).snap(0), Point::new(7, 9));
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let far = Point::new(Coord::MAX - 10, Coord::MIN + 10);
        assert_eq!(far.offset(100, -100), Point::new(Coord::MAX, Coord::MIN));
        assert_eq!(far.checked_offset(100, 0), None);
        assert_eq!(far.checked_offset(-100, 100), Some(Point::new(Coord::MAX - 110, Coord::MIN + 110)));
        assert_eq!(Point::new(Coord::MAX, 0).snap(1_000), Point::new(Coord::MAX, 0));

        let near = Point::new(Coord::MIN, 0);
        assert_eq!(near.distance_sq(Point::new(Coord::MAX, 0)), (u64::MAX as i128).pow(2));

        let rect = Rect::from_corners(near, Point::new(Coord::MAX, 0)).inflate(5);
        assert_eq!((rect.min_x, rect.max_x), (Coord::MIN, Coord::MAX));
        assert_eq!(rect.width(), Coord::MAX);
    }

    #[test]
    fn rect_from_corners_normalizes() {
        let rect = Rect::from_corners(Point::new(10, 0), Point::new(0, 10));
        assert_eq!((rect.min_x, rect.min_y, rect.max_x, rect.max_y), (0, 0, 10, 10));
        assert!(rect.contains(Point::new(10, 10)));
        assert!(!rect.contains(Point::new(11, 10)));
    }

    #[test]
    fn segment_distance_handles_endpoints_and_interior() {
        let a = Point::new(0, 0);
        let b = Point::new(100, 0);
        assert_eq!(distance_to_segment(Point::new(50, 30), a, b), 30.0);
        assert_eq!(distance_to_segment(Point::new(-30, 40), a, b), 50.0);
        assert_eq!(distance_to_segment(Point::new(3, 4), a, a), 5.0);
    }

    #[test]
    fn polygon_containment_and_area() {
        let square = [
            Point::new(0, 0),
            Point::new(100, 0),
            Point::new(100, 100),
            Point::new(0, 100),
        ];
        assert!(point_in_polygon(Point::new(50, 50), &square));
        assert!(point_in_polygon(Point::new(100, 50), &square));
        assert!(!point_in_polygon(Point::new(150, 50), &square));
        assert_eq!(signed_area2(&square).abs(), 20_000);

        let collinear = [Point::new(0, 0), Point::new(5, 5), Point::new(10, 10)];
        assert_eq!(signed_area2(&collinear), 0);
    }

    #[test]
    fn normalize_degrees_wraps_negative() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
    }
}
