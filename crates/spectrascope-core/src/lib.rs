//! spectrascope-core - Geometry, coordinate mapping and color resolution
//!
//! This crate holds the pure parts of spectrascope, an exploration surface for
//! multivariate spectra and their PCA/UMAP projections. Every chart backend
//! shares these functions so that selections and colors agree across charts.
//!
//! # Key Components
//!
//! - **Geometry**: point-in-polygon and point-in-box predicates, space agnostic
//! - **CoordinateMapper**: data <-> screen mapping with padding and equal scale
//! - **ColorResolver**: seven color modes, symbolic and GPU-safe encodings
//! - **Theme**: host theme tokens and their concrete values
//! - **Camera**: projection for the 3D point cloud
//!
//! # Spaces
//!
//! Data space is the coordinate space of the samples, y up. Screen space is
//! pixels within a chart's viewport, origin top-left, y down. The mapper is
//! the only place that converts between them.

pub mod camera;
pub mod color;
pub mod colormap;
pub mod error;
pub mod geometry;
pub mod mapper;
pub mod theme;
pub mod types;

pub use camera::{Camera, Projected, ProjectionMode};
pub use color::*;
pub use colormap::*;
pub use error::{CoreError, CoreResult};
pub use geometry::*;
pub use mapper::*;
pub use theme::*;
pub use types::*;
