// Input bounds and the edit-time size checks the owner layer runs before mutating

use crate::error::{PlanError, Result};

// Numeric bounds (m)
pub const COORD_MIN: f64 = -1_000_000.0;
pub const COORD_MAX: f64 =  1_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && (COORD_MIN..=COORD_MAX).contains(&x) }

pub fn check_coord(param: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PlanError::NonFinite { param, value });
    }
    if !in_coord_bounds(value) {
        return Err(PlanError::OutOfRange { param, value, min: COORD_MIN, max: COORD_MAX });
    }
    Ok(())
}

pub fn check_wall_length(length: f64, min: f64) -> Result<()> {
    if length < min {
        return Err(PlanError::WallTooShort { length, min });
    }
    Ok(())
}

pub fn check_rectangle(width: f64, height: f64, min: f64) -> Result<()> {
    if width.abs() < min || height.abs() < min {
        return Err(PlanError::RectangleTooSmall { width: width.abs(), height: height.abs(), min });
    }
    Ok(())
}
