//! Unified color resolution
//!
//! (sample index, [`GlobalColorConfig`], [`ColorContext`]) -> [`ColorResult`],
//! encoded either symbolically (theme references allowed) or GPU-safe
//! (concrete hex only) from one shared decision.

pub mod config;
pub mod context;
pub mod paint;
pub mod resolve;

pub use config::{ColorMode, GlobalColorConfig, TargetType};
pub use context::{ColorContext, MetadataValue, PartitionSets};
pub use paint::{ColorEncoding, ColorResult, Paint, PaintColor, Stroke};
pub use resolve::{
    hash_category, index_hue, normalize, resolve, resolve_all, resolve_gpu, z_order,
    ColorResolver, LegendEntry, GOLDEN_ANGLE, NORMALIZE_EPSILON,
};
