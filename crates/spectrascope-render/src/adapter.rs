//! Renderer adapter contract
//!
//! Each chart backend implements [`RendererAdapter`]. Adapters are read-only
//! observers: they receive one pre-resolved [`ColorResult`] per sample each
//! frame and never evaluate color logic themselves. Hit-testing comes from
//! the [`HitTester`] supertrait so the selection controller can drive any
//! backend.

use serde::{Deserialize, Serialize};
use spectrascope_core::{ColorEncoding, ColorResult, SampleIndex, Viewport};
use spectrascope_selection::HitTester;

use crate::error::RenderResult;

/// The chart backends
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// SVG markers, hit-tested by element geometry
    Vector,
    /// Interleaved vertex buffer drawn by a WebGL point shader
    ScatterGl,
    /// Regl-style attribute buffers with an R-tree for picking
    Regl,
    /// 3D point cloud seen through a camera
    PointCloud,
}

impl Backend {
    /// Color encoding the backend consumes
    ///
    /// Only the vector backend can interpret theme references; everything
    /// that hands colors to a shader needs concrete values.
    pub fn encoding(&self) -> ColorEncoding {
        match self {
            Backend::Vector => ColorEncoding::Symbolic,
            Backend::ScatterGl | Backend::Regl | Backend::PointCloud => ColorEncoding::GpuSafe,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Vector => "vector",
            Backend::ScatterGl => "scatter-gl",
            Backend::Regl => "regl",
            Backend::PointCloud => "point-cloud",
        }
    }
}

/// A chart backend
pub trait RendererAdapter: HitTester {
    fn backend(&self) -> Backend;

    fn encoding(&self) -> ColorEncoding {
        self.backend().encoding()
    }

    /// Number of samples the adapter holds coordinates for
    fn sample_count(&self) -> usize;

    fn viewport(&self) -> Viewport;

    /// Resize the container; projections follow immediately
    fn set_viewport(&mut self, viewport: Viewport) -> RenderResult<()>;

    /// Accept one frame of colors, exactly one per sample
    fn paint(&mut self, colors: &[ColorResult]) -> RenderResult<()>;

    /// Samples actually drawn in the last frame
    fn drawn_count(&self) -> usize;
}

/// Choose among several hits: highest z first, then closest, then lowest index
pub(crate) fn pick_best(
    hits: impl IntoIterator<Item = (SampleIndex, f64)>,
    colors: &[ColorResult],
) -> Option<SampleIndex> {
    let z = |i: SampleIndex| colors.get(i).map_or(0, |c| c.z_index);
    hits.into_iter()
        .min_by(|a, b| {
            z(b.0)
                .cmp(&z(a.0))
                .then(a.1.total_cmp(&b.1))
                .then(a.0.cmp(&b.0))
        })
        .map(|(i, _)| i)
}
