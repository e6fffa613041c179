//! spectrascope-render - Chart backends and linked-chart sessions
//!
//! Four backends draw the same samples side by side:
//!
//! - [`VectorAdapter`]: SVG markers, symbolic colors, DOM-style hit tests
//! - [`ScatterGlAdapter`]: interleaved WebGL vertex buffer
//! - [`ReglAdapter`]: attribute buffers plus an R-tree for picking
//! - [`PointCloudAdapter`]: 3D instanced points with a capped mesh count
//!
//! The 2D backends share one [`Scene2D`] layout so their view bounds always
//! come from the core coordinate mapper. [`ChartSession`] owns the selection
//! store, resolves colors once per frame and paints every chart; the
//! [`FrameScheduler`] folds all changes between two animation ticks into a
//! single frame.

pub mod adapter;
pub mod config;
pub mod error;
pub mod point_cloud;
pub mod regl;
pub mod scatter_gl;
pub mod scene;
pub mod scheduler;
pub mod session;
pub mod spatial;
pub mod vector;

pub use adapter::{Backend, RendererAdapter};
pub use config::{RenderConfig, DEFAULT_MAX_MESHED_POINTS};
pub use error::{RenderError, RenderResult};
pub use point_cloud::{PointCloudAdapter, PointInstance};
pub use regl::{ReglAdapter, ReglAttributes};
pub use scatter_gl::{ScatterGlAdapter, ScatterUniforms, VERTEX_STRIDE};
pub use scene::Scene2D;
pub use scheduler::{Frame, FrameRequester, FrameScheduler, RepaintReason};
pub use session::ChartSession;
pub use spatial::{RTree, RTreeConfig};
pub use vector::{SvgMarker, VectorAdapter};
