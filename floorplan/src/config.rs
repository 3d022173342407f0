use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::geometry::tolerance::{EDGE_HIT_PX, PLACEMENT_HIT_PX};
use crate::model::Color;

/// Screen-pixel touch budgets; divided by the current zoom to get world tolerances.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTolerance {
    pub placement_px: f64,
    pub edge_px: f64,
}

impl Default for HitTolerance {
    fn default() -> Self {
        HitTolerance { placement_px: PLACEMENT_HIT_PX, edge_px: EDGE_HIT_PX }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    /// Pixels per meter at startup.
    pub initial: f64,
    pub min: f64,
    pub max: f64,
    /// Multiplier applied per wheel notch.
    pub step: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        ZoomLimits { initial: 50.0, min: 2.0, max: 1000.0, step: 1.1 }
    }
}

pub const DEFAULT_PALETTE: [Color; 8] = [
    Color::rgb(0x4e, 0x79, 0xa7),
    Color::rgb(0xf2, 0x8e, 0x2b),
    Color::rgb(0xe1, 0x57, 0x59),
    Color::rgb(0x76, 0xb7, 0xb2),
    Color::rgb(0x59, 0xa1, 0x4f),
    Color::rgb(0xed, 0xc9, 0x48),
    Color::rgb(0xb0, 0x7a, 0xa1),
    Color::rgb(0xff, 0x9d, 0xa7),
];

/// Editor tunables. Every field has a default, so partial JSON is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Endpoint merge radius (m).
    pub snap_threshold: f64,
    pub grid_size: f64,
    pub wall_height: f64,
    pub wall_thickness: f64,
    pub story_height: f64,
    pub min_wall_length: f64,
    pub min_rect_side: f64,
    pub hit: HitTolerance,
    pub zoom: ZoomLimits,
    /// Kelvin
    pub default_temperature: f64,
    pub zone_palette: Vec<Color>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        PlanConfig {
            snap_threshold: 0.25,
            grid_size: 0.5,
            wall_height: 3.0,
            wall_thickness: 0.2,
            story_height: 3.0,
            min_wall_length: 0.1,
            min_rect_side: 0.5,
            hit: HitTolerance::default(),
            zoom: ZoomLimits::default(),
            default_temperature: 293.15,
            zone_palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl PlanConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: PlanConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_value(v: serde_json::Value) -> Result<Self> {
        let cfg: PlanConfig = serde_json::from_value(v)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("wall_height", self.wall_height),
            ("wall_thickness", self.wall_thickness),
            ("story_height", self.story_height),
            ("min_wall_length", self.min_wall_length),
            ("min_rect_side", self.min_rect_side),
            ("hit.placement_px", self.hit.placement_px),
            ("hit.edge_px", self.hit.edge_px),
            ("zoom.min", self.zoom.min),
            ("default_temperature", self.default_temperature),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(PlanError::InvalidConfig(format!("{name} must be positive and finite")));
            }
        }
        for (name, v) in [("snap_threshold", self.snap_threshold), ("grid_size", self.grid_size)] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(PlanError::InvalidConfig(format!("{name} must be non-negative and finite")));
            }
        }
        if !(self.zoom.max.is_finite() && self.zoom.max >= self.zoom.min) {
            return Err(PlanError::InvalidConfig("zoom.max must be >= zoom.min".into()));
        }
        if !(self.zoom.initial >= self.zoom.min && self.zoom.initial <= self.zoom.max) {
            return Err(PlanError::InvalidConfig("zoom.initial must lie within [zoom.min, zoom.max]".into()));
        }
        if !(self.zoom.step.is_finite() && self.zoom.step > 1.0) {
            return Err(PlanError::InvalidConfig("zoom.step must be greater than 1".into()));
        }
        if self.snap_threshold >= self.min_rect_side {
            return Err(PlanError::InvalidConfig("snap_threshold must be smaller than min_rect_side".into()));
        }
        if self.zone_palette.is_empty() {
            return Err(PlanError::InvalidConfig("zone_palette must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(PlanConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let cfg = PlanConfig::from_json_str(r#"{ "snap_threshold": 0.4, "zoom": { "max": 200.0 } }"#)
            .expect("config");
        assert_eq!(cfg.snap_threshold, 0.4);
        assert_eq!(cfg.zoom.max, 200.0);
        assert_eq!(cfg.zoom.min, ZoomLimits::default().min);
        assert_eq!(cfg.default_temperature, 293.15);
    }

    #[test]
    fn rejects_bad_values() {
        let err = PlanConfig::from_json_str(r#"{ "story_height": -1.0 }"#).unwrap_err();
        assert_eq!(err.code(), "invalid_config");
        let err = PlanConfig::from_json_str(r#"{ "zone_palette": [] }"#).unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfig(_)));
        let err = PlanConfig::from_json_str(r#"{ "snap_threshold": 1.0, "min_rect_side": 0.5 }"#).unwrap_err();
        assert_eq!(err.code(), "invalid_config");
        let err = PlanConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, PlanError::Json(_)));
    }
}
