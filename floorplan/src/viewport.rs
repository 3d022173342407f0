use serde::{Deserialize, Serialize};

use crate::config::{PlanConfig, ZoomLimits};
use crate::geometry::tolerance::{clamp, safe_div};

/// World (meters) to canvas (pixels) mapping.
///
/// `screen = world * zoom + pan + canvas_center`. World y is not flipped; the host draws with
/// y pointing down and so does the plan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    /// Pixels per meter.
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
    pub limits: ZoomLimits,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(0.0, 0.0)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport::with_limits(width, height, ZoomLimits::default())
    }

    pub fn from_config(width: f64, height: f64, cfg: &PlanConfig) -> Self {
        Viewport::with_limits(width, height, cfg.zoom)
    }

    fn with_limits(width: f64, height: f64, limits: ZoomLimits) -> Self {
        Viewport { pan_x: 0.0, pan_y: 0.0, zoom: limits.initial, width, height, limits }
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    fn center(&self) -> (f64, f64) {
        (self.width * 0.5, self.height * 0.5)
    }

    pub fn world_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        let (cx, cy) = self.center();
        (x * self.zoom + self.pan_x + cx, y * self.zoom + self.pan_y + cy)
    }

    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        let (cx, cy) = self.center();
        (
            safe_div(sx - self.pan_x - cx, self.zoom, 0.0),
            safe_div(sy - self.pan_y - cy, self.zoom, 0.0),
        )
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.pan_x += dx;
            self.pan_y += dy;
        }
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp(zoom, self.limits.min, self.limits.max);
    }

    /// One wheel notch toward (`direction > 0`) or away from the plan, keeping the world point
    /// under `(sx, sy)` where it is on screen.
    pub fn zoom_at_point(&mut self, sx: f64, sy: f64, direction: f64) {
        if direction == 0.0 || !direction.is_finite() {
            return;
        }
        let (wx, wy) = self.screen_to_world(sx, sy);
        let factor = if direction > 0.0 { self.limits.step } else { 1.0 / self.limits.step };
        self.set_zoom(self.zoom * factor);
        let (cx, cy) = self.center();
        self.pan_x = sx - cx - wx * self.zoom;
        self.pan_y = sy - cy - wy * self.zoom;
    }

    /// A screen-pixel budget expressed in meters at the current zoom.
    pub fn world_tolerance(&self, px: f64) -> f64 {
        safe_div(px, self.zoom, px)
    }

    /// Zooms and pans so the world box fills the canvas, less `margin_px` on each side.
    pub fn fit_bounds(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64, margin_px: f64) {
        let bw = max_x - min_x;
        let bh = max_y - min_y;
        if !(bw.is_finite() && bh.is_finite()) || bw < 0.0 || bh < 0.0 {
            return;
        }
        let aw = (self.width - 2.0 * margin_px).max(1.0);
        let ah = (self.height - 2.0 * margin_px).max(1.0);
        let zoom = match (bw > 0.0, bh > 0.0) {
            (true, true) => (aw / bw).min(ah / bh),
            (true, false) => aw / bw,
            (false, true) => ah / bh,
            (false, false) => self.zoom,
        };
        self.set_zoom(zoom);
        self.pan_x = -(min_x + bw * 0.5) * self.zoom;
        self.pan_y = -(min_y + bh * 0.5) * self.zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn world_screen_round_trip() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.pan_by(13.0, -7.0);
        assert_eq!(vp.world_to_screen(0.0, 0.0), (413.0, 293.0));
        assert_eq!(vp.world_to_screen(2.0, 1.0), (513.0, 343.0));
        assert!(close(vp.screen_to_world(513.0, 343.0), (2.0, 1.0)));
    }

    #[test]
    fn zoom_keeps_cursor_point_fixed() {
        let mut vp = Viewport::new(800.0, 600.0);
        let cursor = (620.0, 140.0);
        let before = vp.screen_to_world(cursor.0, cursor.1);
        vp.zoom_at_point(cursor.0, cursor.1, 1.0);
        assert!(vp.zoom > 50.0);
        assert!(close(vp.screen_to_world(cursor.0, cursor.1), before));
        vp.zoom_at_point(cursor.0, cursor.1, -1.0);
        vp.zoom_at_point(cursor.0, cursor.1, -1.0);
        assert!(vp.zoom < 50.0);
        assert!(close(vp.screen_to_world(cursor.0, cursor.1), before));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vp = Viewport::new(800.0, 600.0);
        for _ in 0..200 {
            vp.zoom_at_point(0.0, 0.0, 1.0);
        }
        assert_eq!(vp.zoom, vp.limits.max);
        for _ in 0..400 {
            vp.zoom_at_point(0.0, 0.0, -1.0);
        }
        assert_eq!(vp.zoom, vp.limits.min);
    }

    #[test]
    fn tolerance_shrinks_as_zoom_grows() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.zoom = 20.0;
        assert_eq!(vp.world_tolerance(10.0), 0.5);
        vp.zoom = 200.0;
        assert_eq!(vp.world_tolerance(10.0), 0.05);
    }

    #[test]
    fn fit_bounds_centers_box() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.fit_bounds(0.0, 0.0, 10.0, 4.0, 50.0);
        assert_eq!(vp.zoom, 70.0);
        assert!(close(vp.world_to_screen(5.0, 2.0), (400.0, 300.0)));
    }
}
