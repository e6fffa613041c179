//! WebGL scatter chart
//!
//! Points are uploaded once per frame as an interleaved vertex buffer in data
//! space; the shader maps them to clip space with the mapper's
//! [`ClipTransform`]. Picking is a CPU nearest-point search in screen space.
//! Area selection projects each drawn point through the shared mapper and
//! tests it against the gesture region in screen space, exactly as the vector
//! chart does, so borderline points resolve the same way on every backend.

use spectrascope_core::{ClipTransform, ColorResult, Point2, Region, SampleIndex, Viewport};
use spectrascope_selection::HitTester;

use crate::adapter::{pick_best, Backend, RendererAdapter};
use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::scene::Scene2D;

/// Floats per vertex: x, y, r, g, b, a, point size
pub const VERTEX_STRIDE: usize = 7;

/// Fill used if a frame ever carries a color that is not a hex value
const FALLBACK_RGBA: [f32; 4] = [0.6, 0.6, 0.6, 1.0];

/// GPU uniforms for the point shader
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterUniforms {
    /// Data-to-clip transform (column-major)
    pub transform: [[f32; 4]; 4],
    /// Viewport size [width, height]
    pub viewport_size: [f32; 2],
    /// Device pixels per CSS pixel
    pub pixel_ratio: f32,
    /// Padding for alignment
    pub _padding: f32,
}

#[derive(Debug, Clone)]
pub struct ScatterGlAdapter {
    scene: Scene2D,
    config: RenderConfig,
    transform: ClipTransform,
    vertices: Vec<f32>,
    /// Sample index of each vertex, back to front
    vertex_indices: Vec<SampleIndex>,
}

impl ScatterGlAdapter {
    pub fn new(
        points: Vec<Point2>,
        viewport: Viewport,
        config: RenderConfig,
    ) -> RenderResult<Self> {
        config.validate()?;
        let scene = Scene2D::new(points, viewport, config.mapper)?;
        let transform = scene.mapper().bounds().clip_transform();
        Ok(Self {
            scene,
            config,
            transform,
            vertices: Vec::new(),
            vertex_indices: Vec::new(),
        })
    }

    pub fn scene(&self) -> &Scene2D {
        &self.scene
    }

    /// Interleaved vertex data, [`VERTEX_STRIDE`] floats per drawn sample
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_indices.len()
    }

    pub fn uniforms(&self) -> ScatterUniforms {
        let vp = self.scene.viewport();
        ScatterUniforms {
            transform: self.transform.to_matrix(),
            viewport_size: [vp.width as f32, vp.height as f32],
            pixel_ratio: 1.0,
            _padding: 0.0,
        }
    }

    /// Where the shader puts a sample, in screen pixels
    ///
    /// Runs the clip transform and the rasterizer's viewport transform on the
    /// CPU, so it can be checked against the mapper.
    pub fn project(&self, index: SampleIndex) -> Option<Point2> {
        let p = self.scene.points().get(index).filter(|p| p.is_finite())?;
        Some(ClipTransform::clip_to_screen(
            self.transform.to_clip(*p),
            self.scene.viewport(),
        ))
    }

    fn rebuild(&mut self) {
        self.transform = self.scene.mapper().bounds().clip_transform();
        let order = self.scene.draw_order();

        self.vertices.clear();
        self.vertices.reserve(order.len() * VERTEX_STRIDE);
        for &index in &order {
            let p = self.scene.points()[index];
            let color = &self.scene.colors()[index];
            let rgba = color.fill_rgba().unwrap_or(FALLBACK_RGBA);
            let size = self.config.point_radius as f32 * 2.0 * color.size_scale;
            self.vertices.extend_from_slice(&[p.x as f32, p.y as f32]);
            self.vertices.extend_from_slice(&rgba);
            self.vertices.push(size);
        }
        self.vertex_indices = order;
    }
}

impl HitTester for ScatterGlAdapter {
    fn pick(&self, screen: Point2) -> Option<SampleIndex> {
        let hits = self.vertex_indices.iter().filter_map(|&index| {
            let d = self.project(index)?.distance_sq(&screen);
            let r = self.config.hit_radius(self.scene.size_scale(index));
            (d <= r * r).then_some((index, d))
        });
        pick_best(hits, self.scene.colors())
    }

    fn indices_in_screen_region(&self, region: &Region) -> Vec<SampleIndex> {
        let mut indices: Vec<SampleIndex> = self
            .vertex_indices
            .iter()
            .copied()
            .filter(|&i| {
                self.scene
                    .screen_position(i)
                    .is_some_and(|s| region.contains(s))
            })
            .collect();
        indices.sort_unstable();
        indices
    }
}

impl RendererAdapter for ScatterGlAdapter {
    fn backend(&self) -> Backend {
        Backend::ScatterGl
    }

    fn sample_count(&self) -> usize {
        self.scene.len()
    }

    fn viewport(&self) -> Viewport {
        self.scene.viewport()
    }

    fn set_viewport(&mut self, viewport: Viewport) -> RenderResult<()> {
        self.scene.set_viewport(viewport)?;
        self.transform = self.scene.mapper().bounds().clip_transform();
        Ok(())
    }

    fn paint(&mut self, colors: &[ColorResult]) -> RenderResult<()> {
        self.scene.apply(colors)?;
        self.rebuild();
        Ok(())
    }

    fn drawn_count(&self) -> usize {
        self.vertex_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(hex: &str, hidden: bool) -> ColorResult {
        ColorResult {
            color: hex.to_string(),
            opacity: 0.5,
            stroke: None,
            stroke_width: None,
            hidden,
            z_index: 0,
            size_scale: 1.0,
        }
    }

    fn adapter() -> ScatterGlAdapter {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(5.0, 5.0), Point2::new(10.0, 10.0)];
        ScatterGlAdapter::new(points, Viewport::new(100.0, 100.0), RenderConfig::default()).unwrap()
    }

    #[test]
    fn test_vertex_layout() {
        let mut a = adapter();
        a.paint(&[color("#ff0000", false), color("#00ff00", true), color("#0000ff", false)])
            .unwrap();
        assert_eq!(a.vertex_count(), 2);
        assert_eq!(a.vertices().len(), 2 * VERTEX_STRIDE);
        assert_eq!(&a.vertices()[..7], &[0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 8.0]);
    }

    #[test]
    fn test_projection_follows_mapper() {
        let mut a = adapter();
        a.paint(&vec![color("#ff0000", false); 3]).unwrap();
        let expected = a.scene().mapper().data_to_screen(Point2::new(5.0, 5.0));
        let got = a.project(1).unwrap();
        assert!((got.x - expected.x).abs() < 1e-9 && (got.y - expected.y).abs() < 1e-9);
    }

    #[test]
    fn test_pick_and_region() {
        let mut a = adapter();
        a.paint(&[color("#ff0000", false), color("#ff0000", true), color("#ff0000", false)])
            .unwrap();
        let center = a.project(1).unwrap();
        assert_eq!(a.pick(center), None);
        assert_eq!(a.pick(a.project(2).unwrap()), Some(2));

        let everything = Region::rect(Point2::new(0.0, 0.0), Point2::new(100.0, 100.0));
        assert_eq!(a.indices_in_screen_region(&everything), vec![0, 2]);
    }
}
