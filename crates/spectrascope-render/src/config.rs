//! Renderer configuration

use serde::{Deserialize, Serialize};
use spectrascope_core::MapperConfig;

use crate::error::{validation, RenderResult};

/// Default cap on individually meshed points in the 3D chart
pub const DEFAULT_MAX_MESHED_POINTS: usize = 500;

/// Settings shared by every renderer adapter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Marker radius in pixels before `size_scale`
    pub point_radius: f64,
    /// Extra slack around a marker that still counts as a hit, in pixels
    pub pick_radius: f64,
    /// Individually meshed points per 3D frame; the rest are omitted
    pub max_meshed_points: usize,
    /// Bounds computation for the 2D charts
    pub mapper: MapperConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            point_radius: 4.0,
            pick_radius: 3.0,
            max_meshed_points: DEFAULT_MAX_MESHED_POINTS,
            mapper: MapperConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    pub fn with_pick_radius(mut self, radius: f64) -> Self {
        self.pick_radius = radius;
        self
    }

    pub fn with_max_meshed_points(mut self, max: usize) -> Self {
        self.max_meshed_points = max;
        self
    }

    pub fn with_equal_scale(mut self, equal_scale: bool) -> Self {
        self.mapper = self.mapper.with_equal_scale(equal_scale);
        self
    }

    /// Hit radius in pixels for a marker drawn at `size_scale`
    pub fn hit_radius(&self, size_scale: f32) -> f64 {
        self.point_radius * f64::from(size_scale) + self.pick_radius
    }

    pub fn validate(&self) -> RenderResult<()> {
        validation::validate_radius("point_radius", self.point_radius)?;
        validation::validate_radius("pick_radius", self.pick_radius)?;
        Ok(())
    }

    pub fn to_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> RenderResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.max_meshed_points, 500);
        assert!(!config.mapper.equal_scale);
        assert_eq!(config.hit_radius(1.0), 7.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = RenderConfig::from_json(r#"{"max_meshed_points": 50}"#).unwrap();
        assert_eq!(config.max_meshed_points, 50);
        assert_eq!(config.point_radius, 4.0);
    }

    #[test]
    fn test_negative_radius_rejected() {
        assert!(RenderConfig::from_json(r#"{"pick_radius": -1.0}"#).is_err());
        assert!(RenderConfig::default().with_point_radius(f64::NAN).validate().is_err());
    }
}
