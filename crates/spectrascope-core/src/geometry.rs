//! Geometry kernel for hit-testing
//!
//! Pure predicates with no notion of which space they run in. The vector
//! renderer tests in screen space, the GPU renderers test in data space; both
//! must apply the same tie-break rule so borderline points agree:
//!
//! - Polygons use the crossing-number (ray casting) rule. Points lying on an
//!   edge or vertex are outside.
//! - Boxes are inclusive on all four edges.

use serde::{Deserialize, Serialize};

use crate::types::Point2;

/// Axis-aligned rectangle given by its extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoxBounds {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Build from two opposite corners in any order (drag start and end)
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        Self {
            min_x: a.x.min(b.x),
            max_x: a.x.max(b.x),
            min_y: a.y.min(b.y),
            max_y: a.y.max(b.y),
        }
    }

    /// Smallest box containing every point, `None` for an empty slice
    pub fn enclosing(points: &[Point2]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self::from_corners(*first, *first);
        for p in &points[1..] {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Zero-area or non-finite boxes select nothing
    pub fn is_degenerate(&self) -> bool {
        let w = self.width();
        let h = self.height();
        !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0
    }

    pub fn contains(&self, p: Point2) -> bool {
        point_in_box(p, self)
    }

    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.min_x, self.min_y),
            Point2::new(self.max_x, self.min_y),
            Point2::new(self.max_x, self.max_y),
            Point2::new(self.min_x, self.max_y),
        ]
    }
}

/// Inclusive point-in-box test
pub fn point_in_box(p: Point2, bounds: &BoxBounds) -> bool {
    p.x >= bounds.min_x && p.x <= bounds.max_x && p.y >= bounds.min_y && p.y <= bounds.max_y
}

/// Crossing-number point-in-polygon test
///
/// The path is implicitly closed. Fewer than three vertices never contains
/// anything. Points on the boundary are outside, so a point on an edge
/// shared by two adjacent lassos belongs to neither.
pub fn point_in_polygon(p: Point2, path: &[Point2]) -> bool {
    if path.len() < 3 || !p.is_finite() {
        return false;
    }

    let mut inside = false;
    let mut j = path.len() - 1;
    for i in 0..path.len() {
        let a = path[i];
        let b = path[j];

        if on_segment(p, a, b) {
            return false;
        }

        // Half-open rule on y so a vertex exactly at p.y is counted once
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Whether `p` lies on the closed segment `a`-`b`
fn on_segment(p: Point2, a: Point2, b: Point2) -> bool {
    if p.x < a.x.min(b.x) || p.x > a.x.max(b.x) || p.y < a.y.min(b.y) || p.y > a.y.max(b.y) {
        return false;
    }
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let scale = (b.x - a.x).abs() + (b.y - a.y).abs();
    cross.abs() <= f64::EPSILON * 4.0 * scale * scale.max(1.0)
}

/// A completed area-gesture shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Region {
    /// Closed lasso path
    Polygon { path: Vec<Point2> },
    /// Rubber-band rectangle
    Box { bounds: BoxBounds },
}

impl Region {
    pub fn polygon(path: Vec<Point2>) -> Self {
        Region::Polygon { path }
    }

    pub fn rect(a: Point2, b: Point2) -> Self {
        Region::Box {
            bounds: BoxBounds::from_corners(a, b),
        }
    }

    /// Degenerate shapes (lasso under three points, zero-area box) select nothing
    pub fn is_degenerate(&self) -> bool {
        match self {
            Region::Polygon { path } => path.len() < 3,
            Region::Box { bounds } => bounds.is_degenerate(),
        }
    }

    /// Apply the kernel predicate for this shape
    pub fn contains(&self, p: Point2) -> bool {
        match self {
            Region::Polygon { path } => point_in_polygon(p, path),
            Region::Box { bounds } => !bounds.is_degenerate() && point_in_box(p, bounds),
        }
    }

    /// Bounding box of the shape, used for coarse pre-filtering
    pub fn bounds(&self) -> Option<BoxBounds> {
        match self {
            Region::Polygon { path } => BoxBounds::enclosing(path),
            Region::Box { bounds } => Some(*bounds),
        }
    }

    /// Transform every vertex into another space
    ///
    /// Boxes stay boxes: corners are mapped and re-normalized, which is exact
    /// for the axis-aligned linear maps used between screen and data space.
    pub fn map_points(&self, mut f: impl FnMut(Point2) -> Point2) -> Region {
        match self {
            Region::Polygon { path } => Region::Polygon {
                path: path.iter().map(|p| f(*p)).collect(),
            },
            Region::Box { bounds } => {
                let a = f(Point2::new(bounds.min_x, bounds.min_y));
                let b = f(Point2::new(bounds.max_x, bounds.max_y));
                Region::Box {
                    bounds: BoxBounds::from_corners(a, b),
                }
            }
        }
    }
}
