use super::tolerance::{safe_div, EPS_LEN};

/// Squared distance from `p` to segment `a-b` and the clamped parameter of the closest point.
pub fn seg_distance_sq(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> (f64, f64) {
    let vx = x2 - x1; let vy = y2 - y1;
    let wx = px - x1; let wy = py - y1;
    let vv = vx*vx + vy*vy;
    let mut t = if vv > EPS_LEN { (wx*vx + wy*vy) / vv } else { 0.0 };
    if t < 0.0 { t = 0.0; } else if t > 1.0 { t = 1.0; }
    let projx = x1 + t * vx; let projy = y1 + t * vy;
    let dx = px - projx; let dy = py - projy;
    (dx*dx + dy*dy, t)
}

/// Unclamped scalar projection of `p` onto the line through `a-b`, as a parameter along `a-b`.
pub fn project_param(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64, fallback: f64) -> f64 {
    let vx = x2 - x1; let vy = y2 - y1;
    safe_div((px - x1) * vx + (py - y1) * vy, vx*vx + vy*vy, fallback)
}

pub fn lerp(a: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

pub fn dist_sq(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0; let dy = a.1 - b.1;
    dx*dx + dy*dy
}

/// Shoelace sum; positive for counter-clockwise rings.
pub fn signed_area(poly: &[(f64, f64)]) -> f64 {
    let mut a = 0.0;
    for i in 0..poly.len() {
        let j = (i + 1) % poly.len();
        a += poly[i].0 * poly[j].1 - poly[j].0 * poly[i].1;
    }
    0.5 * a
}

/// Mean of the ring's vertex coordinates.
pub fn vertex_mean(poly: &[(f64, f64)]) -> Option<(f64, f64)> {
    if poly.is_empty() { return None; }
    let n = poly.len() as f64;
    let (sx, sy) = poly.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.0, sy + p.1));
    Some((sx / n, sy / n))
}

/// Even-odd ray cast. Points exactly on the boundary may land on either side.
pub fn point_in_polygon(x: f64, y: f64, poly: &[(f64, f64)]) -> bool {
    let mut inside = false;
    let n = poly.len();
    if n < 3 { return false; }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = poly[i];
        let (xj, yj) = poly[j];
        if (yi > y) != (yj > y) {
            let x_cross = xi + (y - yi) * (xj - xi) / (yj - yi);
            if x < x_cross { inside = !inside; }
        }
        j = i;
    }
    inside
}

pub fn polygon_bbox(poly: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    let mut minx = f64::INFINITY; let mut miny = f64::INFINITY;
    let mut maxx = f64::NEG_INFINITY; let mut maxy = f64::NEG_INFINITY;
    for p in poly {
        minx = minx.min(p.0); maxx = maxx.max(p.0);
        miny = miny.min(p.1); maxy = maxy.max(p.1);
    }
    (minx, miny, maxx, maxy)
}
