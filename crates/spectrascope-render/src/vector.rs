//! Vector (SVG) chart
//!
//! Markers live in screen space. Picking uses each marker's bounding
//! rectangle, the same geometry a DOM hit test sees, and area selection tests
//! marker centers against the gesture region in screen space.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use spectrascope_core::{ColorResult, Point2, Region, SampleIndex, Viewport};
use spectrascope_selection::HitTester;

use crate::adapter::{Backend, RendererAdapter};
use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::scene::Scene2D;

/// One drawn circle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SvgMarker {
    pub index: SampleIndex,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: String,
    pub opacity: f32,
    pub stroke: Option<String>,
    pub stroke_width: Option<f32>,
}

impl SvgMarker {
    pub fn center(&self) -> Point2 {
        Point2::new(self.cx, self.cy)
    }

    /// Bounding-rectangle hit test with `slack` pixels of tolerance
    fn hit(&self, p: Point2, slack: f64) -> bool {
        let reach = self.r + slack;
        (p.x - self.cx).abs() <= reach && (p.y - self.cy).abs() <= reach
    }
}

#[derive(Debug, Clone)]
pub struct VectorAdapter {
    scene: Scene2D,
    config: RenderConfig,
    /// Back to front
    markers: Vec<SvgMarker>,
}

impl VectorAdapter {
    pub fn new(
        points: Vec<Point2>,
        viewport: Viewport,
        config: RenderConfig,
    ) -> RenderResult<Self> {
        config.validate()?;
        Ok(Self {
            scene: Scene2D::new(points, viewport, config.mapper)?,
            config,
            markers: Vec::new(),
        })
    }

    pub fn scene(&self) -> &Scene2D {
        &self.scene
    }

    pub fn markers(&self) -> &[SvgMarker] {
        &self.markers
    }

    fn rebuild_markers(&mut self) {
        let scene = &self.scene;
        let radius = self.config.point_radius;
        self.markers = scene
            .draw_order()
            .into_iter()
            .filter_map(|index| {
                let center = scene.screen_position(index)?;
                let color = &scene.colors()[index];
                Some(SvgMarker {
                    index,
                    cx: center.x,
                    cy: center.y,
                    r: radius * f64::from(color.size_scale),
                    fill: color.color.clone(),
                    opacity: color.opacity,
                    stroke: color.stroke.clone(),
                    stroke_width: color.stroke_width,
                })
            })
            .collect();
    }

    /// Serialize the current frame as a standalone SVG document
    pub fn to_svg(&self) -> String {
        let vp = self.scene.viewport();
        let mut svg = format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" "#,
                r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            ),
            w = vp.width,
            h = vp.height
        );
        for m in &self.markers {
            let _ = write!(
                svg,
                concat!(
                    r#"<circle data-index="{}" cx="{:.2}" cy="{:.2}" r="{:.2}" "#,
                    r#"fill="{}" fill-opacity="{:.3}""#,
                ),
                m.index,
                m.cx,
                m.cy,
                m.r,
                escape_attr(&m.fill),
                m.opacity
            );
            if let Some(stroke) = &m.stroke {
                let _ = write!(
                    svg,
                    r#" stroke="{}" stroke-width="{}""#,
                    escape_attr(stroke),
                    m.stroke_width.unwrap_or(1.0)
                );
            }
            svg.push_str("/>");
        }
        svg.push_str("</svg>");
        svg
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

impl HitTester for VectorAdapter {
    fn pick(&self, screen: Point2) -> Option<SampleIndex> {
        self.markers
            .iter()
            .rev()
            .find(|m| m.hit(screen, self.config.pick_radius))
            .map(|m| m.index)
    }

    fn indices_in_screen_region(&self, region: &Region) -> Vec<SampleIndex> {
        let mut indices: Vec<SampleIndex> = self
            .markers
            .iter()
            .filter(|m| region.contains(m.center()))
            .map(|m| m.index)
            .collect();
        indices.sort_unstable();
        indices
    }
}

impl RendererAdapter for VectorAdapter {
    fn backend(&self) -> Backend {
        Backend::Vector
    }

    fn sample_count(&self) -> usize {
        self.scene.len()
    }

    fn viewport(&self) -> Viewport {
        self.scene.viewport()
    }

    fn set_viewport(&mut self, viewport: Viewport) -> RenderResult<()> {
        self.scene.set_viewport(viewport)?;
        self.rebuild_markers();
        Ok(())
    }

    fn paint(&mut self, colors: &[ColorResult]) -> RenderResult<()> {
        self.scene.apply(colors)?;
        self.rebuild_markers();
        Ok(())
    }

    fn drawn_count(&self) -> usize {
        self.markers.len()
    }
}
