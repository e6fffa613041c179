//! 3D point-cloud chart
//!
//! Each drawn sample becomes one instanced mesh. The number of instances per
//! frame is capped (`RenderConfig::max_meshed_points`); past the cap, raised
//! samples (hovered, pinned, selected, outliers, by `z_index`) are kept first
//! and the rest are omitted in index order. Omitted samples are neither drawn
//! nor pickable.
//!
//! Picking and area selection work on camera-projected screen positions,
//! cached per frame.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use spectrascope_core::{
    error::validation as core_validation, Camera, ColorResult, Point2, Point3, Projected, Region,
    SampleIndex, Viewport,
};
use spectrascope_selection::HitTester;
use tracing::debug;

use crate::adapter::{Backend, RendererAdapter};
use crate::config::RenderConfig;
use crate::error::{validation, RenderResult};

const FALLBACK_RGBA: [f32; 4] = [0.6, 0.6, 0.6, 1.0];

/// Per-instance data for one meshed sample
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointInstance {
    pub index: SampleIndex,
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub scale: f32,
}

#[derive(Debug, Clone)]
pub struct PointCloudAdapter {
    points: Vec<Point3>,
    camera: Camera,
    viewport: Viewport,
    config: RenderConfig,
    colors: Vec<ColorResult>,
    instances: Vec<PointInstance>,
    projected: Vec<(SampleIndex, Projected)>,
    omitted: usize,
}

impl PointCloudAdapter {
    /// Create a chart with a camera framing the finite points
    pub fn new(
        points: Vec<Point3>,
        viewport: Viewport,
        config: RenderConfig,
    ) -> RenderResult<Self> {
        config.validate()?;
        core_validation::validate_viewport(&viewport)?;
        let mut camera = Camera::default();
        camera.fit_to_points(&points);
        camera.set_viewport(viewport);
        Ok(Self {
            points,
            camera,
            viewport,
            config,
            colors: Vec::new(),
            instances: Vec::new(),
            projected: Vec::new(),
            omitted: 0,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replace the camera (orbit, zoom); projections are refreshed
    pub fn set_camera(&mut self, mut camera: Camera) {
        camera.set_viewport(self.viewport);
        self.camera = camera;
        self.reproject();
    }

    pub fn instances(&self) -> &[PointInstance] {
        &self.instances
    }

    /// Drawable samples left out of the last frame by the mesh cap
    pub fn omitted_count(&self) -> usize {
        self.omitted
    }

    /// Screen position and depth of a meshed sample
    pub fn projected(&self, index: SampleIndex) -> Option<Projected> {
        self.projected.iter().find(|(i, _)| *i == index).map(|(_, p)| *p)
    }

    fn rebuild(&mut self) {
        let mut candidates: Vec<SampleIndex> = (0..self.points.len())
            .filter(|&i| self.colors[i].is_drawn() && self.points[i].is_finite())
            .collect();

        let cap = self.config.max_meshed_points;
        self.omitted = candidates.len().saturating_sub(cap);
        if self.omitted > 0 {
            candidates.sort_by_key(|&i| (Reverse(self.colors[i].z_index), i));
            candidates.truncate(cap);
            candidates.sort_unstable();
            debug!(
                meshed = cap,
                omitted = self.omitted,
                "point cloud over mesh cap, omitting samples"
            );
        }

        self.instances = candidates
            .into_iter()
            .map(|index| {
                let p = self.points[index];
                let color = &self.colors[index];
                PointInstance {
                    index,
                    position: [p.x as f32, p.y as f32, p.z as f32],
                    color: color.fill_rgba().unwrap_or(FALLBACK_RGBA),
                    scale: color.size_scale,
                }
            })
            .collect();
        self.reproject();
    }

    fn reproject(&mut self) {
        let view_projection = self.camera.view_projection_matrix();
        self.projected = self
            .instances
            .iter()
            .filter_map(|inst| {
                self.camera
                    .project_with(&view_projection, self.points[inst.index], self.viewport)
                    .map(|p| (inst.index, p))
            })
            .collect();
    }
}

impl HitTester for PointCloudAdapter {
    /// Frontmost meshed sample whose marker covers the point
    fn pick(&self, screen: Point2) -> Option<SampleIndex> {
        self.projected
            .iter()
            .filter_map(|(index, p)| {
                let scale = self.colors.get(*index).map_or(1.0, |c| c.size_scale);
                let r = self.config.hit_radius(scale);
                let d = p.screen.distance_sq(&screen);
                (d <= r * r).then_some((*index, p.depth, d))
            })
            .min_by(|a, b| {
                a.1.total_cmp(&b.1)
                    .then(a.2.total_cmp(&b.2))
                    .then(a.0.cmp(&b.0))
            })
            .map(|(index, _, _)| index)
    }

    fn indices_in_screen_region(&self, region: &Region) -> Vec<SampleIndex> {
        let mut indices: Vec<SampleIndex> = self
            .projected
            .iter()
            .filter(|(_, p)| region.contains(p.screen))
            .map(|(i, _)| *i)
            .collect();
        indices.sort_unstable();
        indices
    }
}

impl RendererAdapter for PointCloudAdapter {
    fn backend(&self) -> Backend {
        Backend::PointCloud
    }

    fn sample_count(&self) -> usize {
        self.points.len()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) -> RenderResult<()> {
        core_validation::validate_viewport(&viewport)?;
        self.viewport = viewport;
        self.camera.set_viewport(viewport);
        self.reproject();
        Ok(())
    }

    fn paint(&mut self, colors: &[ColorResult]) -> RenderResult<()> {
        validation::validate_frame(self.points.len(), colors.len())?;
        self.colors = colors.to_vec();
        self.rebuild();
        Ok(())
    }

    fn drawn_count(&self) -> usize {
        self.instances.len()
    }
}
