//! Spatial indexing for fast picking and area queries
//!
//! The regl chart keeps its points in an R-tree so that nearest-point picking
//! and box pre-filtering stay logarithmic for large datasets.

mod rtree;

pub use rtree::{RTree, RTreeConfig};
