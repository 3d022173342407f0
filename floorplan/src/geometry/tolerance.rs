// Centralized tolerances and helpers for plan geometry (world units are meters)

pub const EPS_LEN: f64 = 1e-9;            // zero-length vector threshold
pub const EPS_DENOM: f64 = 1e-12;         // denominator guard for projections/ratios
pub const EPS_FACE_AREA: f64 = 1e-2;      // smallest room kept by the face detector (m^2)
pub const EPS_ANG: f64 = 1e-9;            // angle compare slack (radians)
pub const EPS_OVERLAP: f64 = 1e-6;        // two walls leaving a vertex closer than this overlap
pub const EPS_COLLINEAR: f64 = 1e-6;      // off-line slack (m) for walls lying along each other

// Placements never sit on a wall endpoint
pub const ALPHA_MIN: f64 = 0.05;
pub const ALPHA_MAX: f64 = 0.95;
pub const ALPHA_DEFAULT: f64 = 0.5;

// Screen-space hit budgets (px), divided by zoom at query time
pub const PLACEMENT_HIT_PX: f64 = 10.0;
pub const EDGE_HIT_PX: f64 = 6.0;

// Face tracing cap
pub const MAX_TRACE_STEPS: usize = 1_000_000;

#[inline] pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 { x.max(lo).min(hi) }
#[inline] pub fn clamp_alpha(a: f64) -> f64 { if a.is_finite() { clamp(a, ALPHA_MIN, ALPHA_MAX) } else { ALPHA_DEFAULT } }
#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }

#[inline]
pub fn safe_div(num: f64, den: f64, fallback: f64) -> f64 {
    if den.abs() <= EPS_DENOM { fallback } else { num / den }
}

/// Smallest absolute difference between two angles, in [0, PI].
#[inline]
pub fn angle_delta(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(std::f64::consts::TAU);
    d.min(std::f64::consts::TAU - d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_is_clamped_and_nan_falls_back() {
        assert_eq!(clamp_alpha(-3.0), ALPHA_MIN);
        assert_eq!(clamp_alpha(7.0), ALPHA_MAX);
        assert_eq!(clamp_alpha(0.3), 0.3);
        assert_eq!(clamp_alpha(f64::NAN), ALPHA_DEFAULT);
    }

    #[test]
    fn angle_delta_wraps() {
        let pi = std::f64::consts::PI;
        assert!(approx_eq(angle_delta(pi - 0.01, -pi + 0.01), 0.02, 1e-12));
        assert!(approx_eq(angle_delta(0.0, pi), pi, 1e-12));
    }
}
