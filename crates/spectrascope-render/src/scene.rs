//! Shared state of the 2D charts
//!
//! A [`Scene2D`] pairs a chart's data-space points with the
//! [`CoordinateMapper`] fit to the samples currently displayed. All three 2D
//! backends project through it, so their view bounds cannot drift apart or
//! away from the bounds used to resolve area selections.

use spectrascope_core::{
    ColorResult, CoordinateMapper, MapperConfig, Point2, SampleIndex, Viewport,
};
use tracing::debug;

use crate::error::{validation, RenderResult};

#[derive(Debug, Clone)]
pub struct Scene2D {
    points: Vec<Point2>,
    mapper: CoordinateMapper,
    colors: Vec<ColorResult>,
    drawn: Vec<bool>,
    painted: bool,
}

impl Scene2D {
    /// Nothing is drawn until the first frame arrives
    pub fn new(
        points: Vec<Point2>,
        viewport: Viewport,
        config: MapperConfig,
    ) -> RenderResult<Self> {
        let mapper = CoordinateMapper::fit(&points, viewport, config)?;
        let drawn = vec![false; points.len()];
        Ok(Self {
            points,
            mapper,
            colors: Vec::new(),
            drawn,
            painted: false,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn viewport(&self) -> Viewport {
        self.mapper.viewport()
    }

    pub fn colors(&self) -> &[ColorResult] {
        &self.colors
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> RenderResult<()> {
        self.mapper.set_viewport(viewport)?;
        Ok(())
    }

    /// Install a frame's colors; returns whether bounds were refit
    ///
    /// Bounds are refit over the displayed samples on the first frame and
    /// whenever the display filter changes which samples those are.
    pub fn apply(&mut self, colors: &[ColorResult]) -> RenderResult<bool> {
        validation::validate_frame(self.points.len(), colors.len())?;

        let drawn: Vec<bool> = self
            .points
            .iter()
            .zip(colors)
            .map(|(p, c)| c.is_drawn() && p.is_finite())
            .collect();
        self.colors = colors.to_vec();

        if self.painted && drawn == self.drawn {
            return Ok(false);
        }
        self.painted = true;
        self.drawn = drawn;

        let displayed: Vec<Point2> = self
            .points
            .iter()
            .zip(colors)
            .filter(|(_, c)| c.is_drawn())
            .map(|(p, _)| *p)
            .collect();
        self.mapper.refit(&displayed);
        debug!(displayed = displayed.len(), bounds = ?self.mapper.bounds(), "refit view bounds");
        Ok(true)
    }

    pub fn is_drawn(&self, index: SampleIndex) -> bool {
        self.drawn.get(index).copied().unwrap_or(false)
    }

    pub fn drawn_indices(&self) -> impl Iterator<Item = SampleIndex> + '_ {
        self.drawn.iter().enumerate().filter(|(_, d)| **d).map(|(i, _)| i)
    }

    pub fn drawn_count(&self) -> usize {
        self.drawn.iter().filter(|d| **d).count()
    }

    /// Drawn samples back to front: ascending z, then index
    pub fn draw_order(&self) -> Vec<SampleIndex> {
        let mut order: Vec<SampleIndex> = self.drawn_indices().collect();
        order.sort_by_key(|&i| (self.colors[i].z_index, i));
        order
    }

    /// Screen position of a sample through the shared mapper
    pub fn screen_position(&self, index: SampleIndex) -> Option<Point2> {
        let p = self.points.get(index)?;
        p.is_finite().then(|| self.mapper.data_to_screen(*p))
    }

    pub fn size_scale(&self, index: SampleIndex) -> f32 {
        self.colors.get(index).map_or(1.0, |c| c.size_scale)
    }
}
