//! Coordinate mapping between data space and a renderer's viewport
//!
//! Every renderer obtains its view bounds from [`compute_view_bounds`] and
//! projects through [`ViewBounds`], and area selections are converted back to
//! data space through the same bounds. There is exactly one implementation of
//! the bounds math; renderers must not re-derive it.
//!
//! Bounds are computed in three steps:
//! 1. min/max over finite displayed points only
//! 2. pad each axis by a fraction of its range (or a fixed amount when the
//!    range is zero)
//! 3. optionally stretch the narrower axis, centered, so one data unit covers
//!    the same number of pixels on both axes

use serde::{Deserialize, Serialize};

use crate::error::{validation, CoreResult};
use crate::geometry::Region;
use crate::types::{Point2, Viewport};

/// Data-space rectangle mapped onto a renderer's viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBounds {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl ViewBounds {
    /// Horizontal range, then vertical range (min before max on both axes)
    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn center(&self) -> Point2 {
        Point2::new((self.left + self.right) / 2.0, (self.bottom + self.top) / 2.0)
    }

    /// Project a data point to screen pixels (origin top-left, y down)
    pub fn data_to_screen(&self, p: Point2, viewport: Viewport) -> Point2 {
        Point2::new(
            (p.x - self.left) / self.width() * viewport.width,
            (self.top - p.y) / self.height() * viewport.height,
        )
    }

    /// Inverse of [`ViewBounds::data_to_screen`]
    pub fn screen_to_data(&self, s: Point2, viewport: Viewport) -> Point2 {
        Point2::new(
            self.left + (s.x / viewport.width) * self.width(),
            self.top - (s.y / viewport.height) * self.height(),
        )
    }

    /// Convert a screen-space gesture shape into data space
    pub fn screen_region_to_data(&self, region: &Region, viewport: Viewport) -> Region {
        region.map_points(|p| self.screen_to_data(p, viewport))
    }

    /// Pixels per data unit on each axis
    pub fn pixels_per_unit(&self, viewport: Viewport) -> (f64, f64) {
        (viewport.width / self.width(), viewport.height / self.height())
    }

    /// Affine data-to-clip-space transform handed to GPU shaders
    pub fn clip_transform(&self) -> ClipTransform {
        let sx = 2.0 / self.width();
        let sy = 2.0 / self.height();
        ClipTransform {
            scale: [sx, sy],
            offset: [-1.0 - self.left * sx, -1.0 - self.bottom * sy],
        }
    }
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self::new(-0.5, 0.5, -0.5, 0.5)
    }
}

/// `clip = data * scale + offset`, the uniform a point shader consumes
///
/// Clip space spans [-1, 1] on both axes with y up, as in WebGL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipTransform {
    pub scale: [f64; 2],
    pub offset: [f64; 2],
}

impl ClipTransform {
    pub fn to_clip(&self, p: Point2) -> Point2 {
        Point2::new(
            p.x * self.scale[0] + self.offset[0],
            p.y * self.scale[1] + self.offset[1],
        )
    }

    /// The rasterizer's viewport transform from clip space to pixels
    pub fn clip_to_screen(clip: Point2, viewport: Viewport) -> Point2 {
        Point2::new(
            (clip.x + 1.0) / 2.0 * viewport.width,
            (1.0 - clip.y) / 2.0 * viewport.height,
        )
    }

    /// Column-major 4x4 matrix form for uniform upload
    pub fn to_matrix(&self) -> [[f32; 4]; 4] {
        [
            [self.scale[0] as f32, 0.0, 0.0, 0.0],
            [0.0, self.scale[1] as f32, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [self.offset[0] as f32, self.offset[1] as f32, 0.0, 1.0],
        ]
    }
}

/// Configuration for bounds computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Fraction of each axis range added on both ends
    pub padding_fraction: f64,

    /// Padding used when an axis range is zero (single point, constant column)
    pub zero_range_padding: f64,

    /// Lock the aspect ratio so both axes share one scale
    pub equal_scale: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            padding_fraction: 0.05,
            zero_range_padding: 0.5,
            equal_scale: false,
        }
    }
}

impl MapperConfig {
    pub fn with_equal_scale(mut self, equal_scale: bool) -> Self {
        self.equal_scale = equal_scale;
        self
    }

    pub fn with_zero_range_padding(mut self, padding: f64) -> Self {
        self.zero_range_padding = padding;
        self
    }
}

/// Raw min/max over finite points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataExtent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,

    /// Number of points that contributed
    pub finite_count: usize,

    /// Number of points skipped for non-finite coordinates
    pub skipped: usize,
}

/// Min/max over the finite points, `None` if there are none
pub fn data_extent<'a>(points: impl IntoIterator<Item = &'a Point2>) -> Option<DataExtent> {
    let mut extent = DataExtent {
        min_x: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        min_y: f64::INFINITY,
        max_y: f64::NEG_INFINITY,
        finite_count: 0,
        skipped: 0,
    };

    for p in points {
        if !p.is_finite() {
            extent.skipped += 1;
            continue;
        }
        extent.min_x = extent.min_x.min(p.x);
        extent.max_x = extent.max_x.max(p.x);
        extent.min_y = extent.min_y.min(p.y);
        extent.max_y = extent.max_y.max(p.y);
        extent.finite_count += 1;
    }

    if extent.skipped > 0 {
        tracing::warn!(
            skipped = extent.skipped,
            "Excluding non-finite coordinates from view bounds"
        );
    }

    (extent.finite_count > 0).then_some(extent)
}

fn pad_axis(min: f64, max: f64, config: &MapperConfig) -> (f64, f64) {
    let range = max - min;
    let pad = if range > 0.0 {
        range * config.padding_fraction
    } else {
        config.zero_range_padding
    };
    (min - pad, max + pad)
}

/// Padded (and optionally aspect-locked) bounds for an extent
pub fn bounds_from_extent(
    extent: Option<&DataExtent>,
    viewport: Viewport,
    config: &MapperConfig,
) -> ViewBounds {
    let (min_x, max_x, min_y, max_y) = match extent {
        Some(e) => (e.min_x, e.max_x, e.min_y, e.max_y),
        None => (0.0, 0.0, 0.0, 0.0),
    };

    let (mut left, mut right) = pad_axis(min_x, max_x, config);
    let (mut bottom, mut top) = pad_axis(min_y, max_y, config);

    if config.equal_scale {
        if let Some(container_aspect) = viewport.aspect_ratio() {
            let data_w = right - left;
            let data_h = top - bottom;
            let data_aspect = data_w / data_h;

            if data_aspect > container_aspect {
                // Too wide for the container: grow y
                let extra = (data_w / container_aspect - data_h) / 2.0;
                bottom -= extra;
                top += extra;
            } else if data_aspect < container_aspect {
                let extra = (data_h * container_aspect - data_w) / 2.0;
                left -= extra;
                right += extra;
            }
        }
    }

    ViewBounds {
        left,
        right,
        top,
        bottom,
    }
}

/// Compute view bounds for the displayed points
///
/// Non-finite points are skipped. An empty (or all non-finite) point set
/// yields bounds centered on the origin.
pub fn compute_view_bounds(
    points: &[Point2],
    viewport: Viewport,
    config: &MapperConfig,
) -> ViewBounds {
    let extent = data_extent(points);
    bounds_from_extent(extent.as_ref(), viewport, config)
}

/// Bounds bound to a viewport, refit whenever data or container size changes
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    config: MapperConfig,
    viewport: Viewport,
    extent: Option<DataExtent>,
    bounds: ViewBounds,
}

impl CoordinateMapper {
    /// Fit bounds to a point set for a container
    pub fn fit(points: &[Point2], viewport: Viewport, config: MapperConfig) -> CoreResult<Self> {
        validation::validate_viewport(&viewport)?;
        let extent = data_extent(points);
        let bounds = bounds_from_extent(extent.as_ref(), viewport, &config);
        Ok(Self {
            config,
            viewport,
            extent,
            bounds,
        })
    }

    pub fn bounds(&self) -> ViewBounds {
        self.bounds
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn extent(&self) -> Option<&DataExtent> {
        self.extent.as_ref()
    }

    /// Refit to a new point set (dataset or filter change)
    pub fn refit(&mut self, points: &[Point2]) {
        self.extent = data_extent(points);
        self.recompute();
    }

    /// Resize the container; equal-scale bounds depend on its aspect ratio
    pub fn set_viewport(&mut self, viewport: Viewport) -> CoreResult<()> {
        validation::validate_viewport(&viewport)?;
        self.viewport = viewport;
        self.recompute();
        Ok(())
    }

    pub fn set_equal_scale(&mut self, equal_scale: bool) {
        self.config.equal_scale = equal_scale;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.bounds = bounds_from_extent(self.extent.as_ref(), self.viewport, &self.config);
    }

    pub fn data_to_screen(&self, p: Point2) -> Point2 {
        self.bounds.data_to_screen(p, self.viewport)
    }

    pub fn screen_to_data(&self, s: Point2) -> Point2 {
        self.bounds.screen_to_data(s, self.viewport)
    }

    pub fn screen_region_to_data(&self, region: &Region) -> Region {
        self.bounds.screen_region_to_data(region, self.viewport)
    }
}
