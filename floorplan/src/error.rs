use thiserror::Error;

use crate::model::{EdgeId, PlacementId};

/// Errors raised by the validating edit layer ([`crate::Building`]) and by config loading.
///
/// Geometry mutators and queries never return these: they are total and answer
/// `None`/`false`/defaults for unknown ids.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("parameter '{param}' must be finite (got {value})")]
    NonFinite { param: &'static str, value: f64 },

    #[error("parameter '{param}' = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        param: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("wall length {length:.3} m is below the minimum of {min} m")]
    WallTooShort { length: f64, min: f64 },

    #[error("rectangle {width:.3} x {height:.3} m has a side below the minimum of {min} m")]
    RectangleTooSmall { width: f64, height: f64, min: f64 },

    #[error("wall would overlap edge {edge}")]
    OverlappingWall { edge: EdgeId },

    #[error("invalid {kind} id {id}")]
    InvalidId { kind: &'static str, id: u32 },

    #[error("story index {0} does not exist")]
    InvalidStory(usize),

    #[error("unknown placement kind '{0}'")]
    UnknownPlacementKind(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PlanError {
    /// Stable machine-readable code, surfaced to hosts next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::NonFinite { .. } => "non_finite",
            PlanError::OutOfRange { .. } => "out_of_range",
            PlanError::WallTooShort { .. } => "wall_too_short",
            PlanError::RectangleTooSmall { .. } => "rectangle_too_small",
            PlanError::OverlappingWall { .. } => "overlapping_wall",
            PlanError::InvalidId { .. } => "invalid_id",
            PlanError::InvalidStory(_) => "invalid_story",
            PlanError::UnknownPlacementKind(_) => "invalid_kind",
            PlanError::InvalidConfig(_) | PlanError::Json(_) => "invalid_config",
        }
    }

    pub(crate) fn invalid_edge(id: EdgeId) -> Self {
        PlanError::InvalidId { kind: "edge", id }
    }

    pub(crate) fn invalid_placement(id: PlacementId) -> Self {
        PlanError::InvalidId { kind: "placement", id }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
