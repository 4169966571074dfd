//! Geometry kernel
//!
//! Pure polygon and segment operations over f64 millimetre coordinates.

use thiserror::Error;

use crate::domain::{Point2D, Wall};

/// mm² per m²
pub const MM2_PER_M2: f64 = 1_000_000.0;
/// mm per m
pub const MM_PER_M: f64 = 1_000.0;

/// Coordinates closer than this are treated as the same point (mm)
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

/// Directed segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2D,
    pub end: Point2D,
}

impl Segment {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        segment_length(self.start, self.end)
    }

    /// Unit direction vector; `None` for a zero-length segment
    pub fn direction(&self) -> Option<(f64, f64)> {
        let len = self.length();
        if len <= EPSILON {
            return None;
        }
        Some((
            (self.end.x - self.start.x) / len,
            (self.end.y - self.start.y) / len,
        ))
    }

    /// Distance from `start` to the projection of `p` onto the segment's line
    pub fn distance_along(&self, p: Point2D) -> f64 {
        match self.direction() {
            Some((dx, dy)) => (p.x - self.start.x) * dx + (p.y - self.start.y) * dy,
            None => 0.0,
        }
    }
}

/// Signed shoelace area in mm², positive for counter-clockwise winding.
pub fn polygon_area(polygon: &[Point2D]) -> Result<f64, GeometryError> {
    if polygon.len() < 3 {
        return Err(GeometryError::DegenerateGeometry(format!(
            "polygon has {} vertices, at least 3 required",
            polygon.len()
        )));
    }

    let n = polygon.len();
    let twice_area: f64 = (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();

    Ok(twice_area / 2.0)
}

/// Length of the closed outline in mm
pub fn polygon_perimeter(polygon: &[Point2D]) -> f64 {
    let n = polygon.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| segment_length(polygon[i], polygon[(i + 1) % n]))
        .sum()
}

/// Vertex mean
pub fn polygon_centroid(polygon: &[Point2D]) -> Point2D {
    if polygon.is_empty() {
        return Point2D::default();
    }
    let n = polygon.len() as f64;
    let (sx, sy) = polygon
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2D::new(sx / n, sy / n)
}

/// True when the closed polygon has at least three vertices, no zero-length
/// edges and no two non-adjacent edges touching.
pub fn is_simple_polygon(polygon: &[Point2D]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let edges: Vec<Segment> = (0..n)
        .map(|i| Segment::new(polygon[i], polygon[(i + 1) % n]))
        .collect();

    if edges.iter().any(|e| e.length() <= EPSILON) {
        return false;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                // Adjacent edges may only share their common vertex
                if collinear_overlap(&edges[i], &edges[j]) {
                    return false;
                }
                continue;
            }
            if segments_intersect(&edges[i], &edges[j]) {
                return false;
            }
        }
    }

    true
}

pub fn segment_length(a: Point2D, b: Point2D) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Whether `p` lies on segment `a`-`b` within `tolerance` mm
pub fn point_on_segment(p: Point2D, a: Point2D, b: Point2D, tolerance: f64) -> bool {
    let len_sq = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    if len_sq <= EPSILON {
        return segment_length(p, a) <= tolerance;
    }

    let t = ((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let closest = Point2D::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    segment_length(p, closest) <= tolerance
}

/// A wall reduced to its directed centreline
pub fn wall_centerline(wall: &Wall) -> Segment {
    Segment::new(wall.start, wall.end)
}

fn cross(o: Point2D, a: Point2D, b: Point2D) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn orientation(o: Point2D, a: Point2D, b: Point2D) -> i8 {
    let c = cross(o, a, b);
    if c.abs() <= EPSILON {
        0
    } else if c > 0.0 {
        1
    } else {
        -1
    }
}

fn within_box(p: Point2D, a: Point2D, b: Point2D) -> bool {
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}

fn segments_intersect(s: &Segment, t: &Segment) -> bool {
    let (p1, p2, q1, q2) = (s.start, s.end, t.start, t.end);
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == 0 && within_box(q1, p1, p2))
        || (o2 == 0 && within_box(q2, p1, p2))
        || (o3 == 0 && within_box(p1, q1, q2))
        || (o4 == 0 && within_box(p2, q1, q2))
}

/// Adjacent edges folding back onto each other
fn collinear_overlap(s: &Segment, t: &Segment) -> bool {
    if orientation(s.start, s.end, t.start) != 0 || orientation(s.start, s.end, t.end) != 0 {
        return false;
    }
    match (s.direction(), t.direction()) {
        (Some((sx, sy)), Some((tx, ty))) => sx * tx + sy * ty < 0.0,
        _ => true,
    }
}
