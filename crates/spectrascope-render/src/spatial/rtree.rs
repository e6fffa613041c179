//! R-tree over 2D data-space points
//!
//! Built once per frame with sort-tile-recursive packing: points are sorted
//! into vertical slices by x, each slice is sorted by y and cut into leaves,
//! and the same packing is repeated over the leaves until one root remains.
//! Range queries prune whole subtrees by their bounds.

use spectrascope_core::{BoxBounds, Point2, SampleIndex};

/// Configuration for R-tree construction
#[derive(Clone, Debug)]
pub struct RTreeConfig {
    /// Maximum entries per node (default: 16)
    pub max_entries: usize,
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self { max_entries: 16 }
    }
}

/// A point with its sample index
#[derive(Clone, Copy, Debug)]
struct Entry {
    point: Point2,
    index: SampleIndex,
}

#[derive(Debug)]
enum Node {
    Leaf { bounds: BoxBounds, entries: Vec<Entry> },
    Internal { bounds: BoxBounds, children: Vec<Node> },
}

impl Node {
    fn bounds(&self) -> &BoxBounds {
        match self {
            Node::Leaf { bounds, .. } => bounds,
            Node::Internal { bounds, .. } => bounds,
        }
    }

    fn center(&self) -> Point2 {
        let b = self.bounds();
        Point2::new((b.min_x + b.max_x) / 2.0, (b.min_y + b.max_y) / 2.0)
    }
}

fn intersects(a: &BoxBounds, b: &BoxBounds) -> bool {
    a.min_x <= b.max_x && a.max_x >= b.min_x && a.min_y <= b.max_y && a.max_y >= b.min_y
}


fn enclosing(boxes: impl Iterator<Item = BoxBounds>) -> BoxBounds {
    boxes.fold(
        BoxBounds::new(f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |acc, b| {
            BoxBounds::new(
                acc.min_x.min(b.min_x),
                acc.max_x.max(b.max_x),
                acc.min_y.min(b.min_y),
                acc.max_y.max(b.max_y),
            )
        },
    )
}

/// Split `items` into runs of at most `max_entries`, tiled x-then-y
fn tile<T>(mut items: Vec<T>, max_entries: usize, center: impl Fn(&T) -> Point2) -> Vec<Vec<T>> {
    let node_count = items.len().div_ceil(max_entries);
    let slices = (node_count as f64).sqrt().ceil().max(1.0) as usize;
    let per_slice = max_entries * node_count.div_ceil(slices);

    items.sort_by(|a, b| center(a).x.total_cmp(&center(b).x));

    let mut groups = Vec::with_capacity(node_count);
    while !items.is_empty() {
        let rest = items.split_off(per_slice.min(items.len()));
        let mut slice = std::mem::replace(&mut items, rest);
        slice.sort_by(|a, b| center(a).y.total_cmp(&center(b).y));
        while !slice.is_empty() {
            let rest = slice.split_off(max_entries.min(slice.len()));
            groups.push(std::mem::replace(&mut slice, rest));
        }
    }
    groups
}

/// Static R-tree spatial index
#[derive(Debug, Default)]
pub struct RTree {
    root: Option<Node>,
    size: usize,
}

impl RTree {
    /// Build an R-tree from `(point, index)` pairs; non-finite points are skipped
    pub fn build(points: impl IntoIterator<Item = (Point2, SampleIndex)>) -> Self {
        Self::build_with_config(points, RTreeConfig::default())
    }

    pub fn build_with_config(
        points: impl IntoIterator<Item = (Point2, SampleIndex)>,
        config: RTreeConfig,
    ) -> Self {
        let max_entries = config.max_entries.max(2);
        let entries: Vec<Entry> = points
            .into_iter()
            .filter(|(p, _)| p.is_finite())
            .map(|(point, index)| Entry { point, index })
            .collect();
        let size = entries.len();
        if size == 0 {
            return Self::default();
        }

        let mut level: Vec<Node> = tile(entries, max_entries, |e| e.point)
            .into_iter()
            .map(|entries| Node::Leaf {
                bounds: enclosing(
                    entries
                        .iter()
                        .map(|e| BoxBounds::from_corners(e.point, e.point)),
                ),
                entries,
            })
            .collect();

        while level.len() > 1 {
            level = tile(level, max_entries, Node::center)
                .into_iter()
                .map(|children| Node::Internal {
                    bounds: enclosing(children.iter().map(|c| *c.bounds())),
                    children,
                })
                .collect();
        }

        Self {
            root: level.pop(),
            size,
        }
    }

    /// Indices of points inside a box, edges inclusive
    pub fn query_box(&self, query: &BoxBounds) -> Vec<SampleIndex> {
        let mut results = Vec::new();
        if let Some(root) = &self.root {
            Self::query_box_recursive(root, query, &mut results);
        }
        results
    }

    fn query_box_recursive(node: &Node, query: &BoxBounds, results: &mut Vec<SampleIndex>) {
        if !intersects(node.bounds(), query) {
            return;
        }

        match node {
            Node::Leaf { entries, .. } => {
                results.extend(entries.iter().filter(|e| query.contains(e.point)).map(|e| e.index));
            }
            Node::Internal { children, .. } => {
                for child in children {
                    Self::query_box_recursive(child, query, results);
                }
            }
        }
    }

    /// Get the number of points in the tree
    pub fn len(&self) -> usize {
        self.size
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Get the bounding box of all points
    pub fn bounds(&self) -> Option<BoxBounds> {
        self.root.as_ref().map(|r| *r.bounds())
    }
}
