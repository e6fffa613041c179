//! Regl scatter chart
//!
//! Unlike the scatter-GL chart this backend keeps separate attribute buffers
//! (positions, colors, sizes) and indexes drawn points in an [`RTree`] in
//! data space. Picking converts the pick radius to a data-space box per axis,
//! pre-filters through the tree and then measures candidates in pixels, so
//! non-uniform axis scales are handled exactly. Area selection prefilters the
//! same way and then tests projected positions in screen space.

use spectrascope_core::{
    BoxBounds, ClipTransform, ColorResult, Point2, Region, SampleIndex, Viewport,
};
use spectrascope_selection::HitTester;

use crate::adapter::{pick_best, Backend, RendererAdapter};
use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::scene::Scene2D;
use crate::spatial::RTree;

const FALLBACK_RGBA: [f32; 4] = [0.6, 0.6, 0.6, 1.0];

/// Attribute buffers for one draw call, back to front
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReglAttributes {
    pub positions: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    pub sizes: Vec<f32>,
    /// Sample index behind each element
    pub indices: Vec<SampleIndex>,
}

impl ReglAttributes {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[derive(Debug)]
pub struct ReglAdapter {
    scene: Scene2D,
    config: RenderConfig,
    tree: RTree,
    attributes: ReglAttributes,
    max_size_scale: f32,
}

impl ReglAdapter {
    pub fn new(
        points: Vec<Point2>,
        viewport: Viewport,
        config: RenderConfig,
    ) -> RenderResult<Self> {
        config.validate()?;
        Ok(Self {
            scene: Scene2D::new(points, viewport, config.mapper)?,
            config,
            tree: RTree::default(),
            attributes: ReglAttributes::default(),
            max_size_scale: 1.0,
        })
    }

    pub fn scene(&self) -> &Scene2D {
        &self.scene
    }

    pub fn attributes(&self) -> &ReglAttributes {
        &self.attributes
    }

    /// `projection` uniform: data space to clip space (column-major)
    pub fn projection(&self) -> [[f32; 4]; 4] {
        self.scene.mapper().bounds().clip_transform().to_matrix()
    }

    /// Screen position the draw call produces for a sample
    pub fn project(&self, index: SampleIndex) -> Option<Point2> {
        let p = self.scene.points().get(index).filter(|p| p.is_finite())?;
        let bounds = self.scene.mapper().bounds();
        let clip = bounds.clip_transform().to_clip(*p);
        Some(ClipTransform::clip_to_screen(clip, self.scene.viewport()))
    }

    fn rebuild(&mut self) {
        let scene = &self.scene;
        let order = scene.draw_order();

        let mut attributes = ReglAttributes {
            positions: Vec::with_capacity(order.len()),
            colors: Vec::with_capacity(order.len()),
            sizes: Vec::with_capacity(order.len()),
            indices: Vec::with_capacity(order.len()),
        };
        let mut max_size_scale: f32 = 1.0;
        for &index in &order {
            let p = scene.points()[index];
            let color = &scene.colors()[index];
            attributes.positions.push([p.x as f32, p.y as f32]);
            attributes.colors.push(color.fill_rgba().unwrap_or(FALLBACK_RGBA));
            attributes.sizes.push(self.config.point_radius as f32 * 2.0 * color.size_scale);
            attributes.indices.push(index);
            max_size_scale = max_size_scale.max(color.size_scale);
        }

        self.tree = RTree::build(order.iter().map(|&i| (scene.points()[i], i)));
        self.attributes = attributes;
        self.max_size_scale = max_size_scale;
    }
}

impl HitTester for ReglAdapter {
    fn pick(&self, screen: Point2) -> Option<SampleIndex> {
        let mapper = self.scene.mapper();
        let center = mapper.screen_to_data(screen);
        let (ppu_x, ppu_y) = mapper.bounds().pixels_per_unit(mapper.viewport());
        let reach = self.config.hit_radius(self.max_size_scale);
        let search = BoxBounds::new(
            center.x - reach / ppu_x,
            center.x + reach / ppu_x,
            center.y - reach / ppu_y,
            center.y + reach / ppu_y,
        );

        let hits = self.tree.query_box(&search).into_iter().filter_map(|index| {
            let d = mapper.data_to_screen(self.scene.points()[index]).distance_sq(&screen);
            let r = self.config.hit_radius(self.scene.size_scale(index));
            (d <= r * r).then_some((index, d))
        });
        pick_best(hits, self.scene.colors())
    }

    fn indices_in_screen_region(&self, region: &Region) -> Vec<SampleIndex> {
        if region.is_degenerate() {
            return Vec::new();
        }
        let mapper = self.scene.mapper();
        let Some(bounds) = mapper.screen_region_to_data(region).bounds() else {
            return Vec::new();
        };

        // A pixel of slack keeps the data-space prefilter from dropping a
        // point the screen-space test would keep
        let (ppu_x, ppu_y) = mapper.bounds().pixels_per_unit(mapper.viewport());
        let search = BoxBounds::new(
            bounds.min_x - 1.0 / ppu_x,
            bounds.max_x + 1.0 / ppu_x,
            bounds.min_y - 1.0 / ppu_y,
            bounds.max_y + 1.0 / ppu_y,
        );
        let mut indices: Vec<SampleIndex> = self
            .tree
            .query_box(&search)
            .into_iter()
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

impl RendererAdapter for ReglAdapter {
    fn backend(&self) -> Backend {
        Backend::Regl
    }

    fn sample_count(&self) -> usize {
        self.scene.len()
    }

    fn viewport(&self) -> Viewport {
        self.scene.viewport()
    }

    fn set_viewport(&mut self, viewport: Viewport) -> RenderResult<()> {
        self.scene.set_viewport(viewport)?;
        Ok(())
    }

    fn paint(&mut self, colors: &[ColorResult]) -> RenderResult<()> {
        self.scene.apply(colors)?;
        self.rebuild();
        Ok(())
    }

    fn drawn_count(&self) -> usize {
        self.attributes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(hidden: bool, size_scale: f32) -> ColorResult {
        ColorResult {
            color: "#808080".to_string(),
            opacity: 1.0,
            stroke: None,
            stroke_width: None,
            hidden,
            z_index: 0,
            size_scale,
        }
    }

    fn grid() -> ReglAdapter {
        let points = (0..100).map(|i| Point2::new((i % 10) as f64, (i / 10) as f64)).collect();
        ReglAdapter::new(points, Viewport::new(400.0, 200.0), RenderConfig::default()).unwrap()
    }

    #[test]
    fn test_attributes_skip_hidden() {
        let mut a = grid();
        let colors: Vec<_> = (0..100).map(|i| color(i % 2 == 0, 1.0)).collect();
        a.paint(&colors).unwrap();
        assert_eq!(a.attributes().len(), 50);
        assert!(a.attributes().indices.iter().all(|i| i % 2 == 1));
    }

    #[test]
    fn test_pick_matches_brute_force() {
        let mut a = grid();
        a.paint(&vec![color(false, 1.0); 100]).unwrap();
        for index in [0, 37, 99] {
            let at = a.project(index).unwrap();
            assert_eq!(a.pick(Point2::new(at.x + 2.0, at.y - 2.0)), Some(index));
        }
    }

    #[test]
    fn test_enlarged_marker_reachable() {
        let mut a = grid();
        let mut colors = vec![color(false, 1.0); 100];
        colors[55] = color(false, 3.0);
        a.paint(&colors).unwrap();
        let at = a.project(55).unwrap();
        // 12px marker + 3px slack; neighbors are 40px and 20px away
        assert_eq!(a.pick(Point2::new(at.x + 13.0, at.y)), Some(55));
    }

    #[test]
    fn test_region_through_tree() {
        let mut a = grid();
        a.paint(&vec![color(false, 1.0); 100]).unwrap();
        let low = a.project(0).unwrap();
        let high = a.project(11).unwrap();
        let region = Region::rect(
            Point2::new(low.x - 5.0, low.y + 5.0),
            Point2::new(high.x + 5.0, high.y - 5.0),
        );
        assert_eq!(a.indices_in_screen_region(&region), vec![0, 1, 10, 11]);
        assert!(a.indices_in_screen_region(&Region::polygon(vec![low, high])).is_empty());
    }
}
