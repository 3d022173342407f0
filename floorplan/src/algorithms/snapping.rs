use serde::Serialize;

use crate::geometry::math::project_param;
use crate::geometry::tolerance::{clamp_alpha, ALPHA_DEFAULT};
use crate::model::{EdgeId, VertexId};
use crate::Geometry;

/// Cursor position after snapping while a wall is being drawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Constrained {
    pub x: f64,
    pub y: f64,
    pub snapped_vertex: Option<VertexId>,
}

/// Rounds to the nearest grid line; a non-positive grid leaves `v` as is.
pub fn snap_to_grid(v: f64, grid: f64) -> f64 {
    if grid > 0.0 && grid.is_finite() {
        (v / grid).round() * grid
    } else {
        v
    }
}

/// Orthogonal drawing aid.
///
/// A vertex within `threshold` of the cursor wins outright, even off-axis, so a room can be
/// closed on its first corner. Otherwise the dominant axis of the drag is kept and the minor
/// one is pinned to the start point, with the free coordinate on the grid.
pub fn constrain_orthogonal(
    g: &Geometry,
    start_x: f64,
    start_y: f64,
    mouse_x: f64,
    mouse_y: f64,
    grid_size: f64,
    threshold: f64,
) -> Constrained {
    if let Some(id) = g.find_nearest_vertex(mouse_x, mouse_y, threshold) {
        if let Some((x, y)) = g.get_vertex(id) {
            return Constrained { x, y, snapped_vertex: Some(id) };
        }
    }
    let dx = mouse_x - start_x;
    let dy = mouse_y - start_y;
    if dx.abs() >= dy.abs() {
        Constrained { x: snap_to_grid(mouse_x, grid_size), y: start_y, snapped_vertex: None }
    } else {
        Constrained { x: start_x, y: snap_to_grid(mouse_y, grid_size), snapped_vertex: None }
    }
}

/// Projection of `(x, y)` onto the edge's line as a clamped alpha; 0.5 for an unknown edge.
pub fn alpha_on_edge(g: &Geometry, edge: EdgeId, x: f64, y: f64) -> f64 {
    let Some((a, b)) = g.edge_endpoints(edge) else {
        return ALPHA_DEFAULT;
    };
    clamp_alpha(project_param(x, y, a.0, a.1, b.0, b.1, ALPHA_DEFAULT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tolerance::{ALPHA_MAX, ALPHA_MIN};

    #[test]
    fn vertex_snap_beats_axis_lock() {
        let mut g = Geometry::new();
        g.add_wall(5.0, 0.0, 5.0, 4.0, 3.0, 0.2, 0.25);
        let c = constrain_orthogonal(&g, 0.0, 0.0, 4.9, 0.1, 0.5, 0.25);
        assert_eq!((c.x, c.y), (5.0, 0.0));
        assert_eq!(c.snapped_vertex, Some(0));
    }

    #[test]
    fn dominant_axis_is_kept() {
        let g = Geometry::new();
        let c = constrain_orthogonal(&g, 1.0, 1.0, 3.8, 1.7, 0.5, 0.25);
        assert_eq!((c.x, c.y, c.snapped_vertex), (4.0, 1.0, None));
        let c = constrain_orthogonal(&g, 1.0, 1.0, 1.2, -2.6, 0.5, 0.25);
        assert_eq!((c.x, c.y), (1.0, -2.5));
    }

    #[test]
    fn grid_zero_disables_snapping() {
        assert_eq!(snap_to_grid(1.23, 0.0), 1.23);
        assert_eq!(snap_to_grid(1.26, 0.5), 1.5);
        assert_eq!(snap_to_grid(-0.74, 0.5), -0.5);
    }

    #[test]
    fn alpha_is_clamped_far_past_endpoints() {
        let mut g = Geometry::new();
        let e = g.add_wall(0.0, 0.0, 10.0, 0.0, 3.0, 0.2, 0.25).expect("wall");
        assert_eq!(alpha_on_edge(&g, e, 2.5, 3.0), 0.25);
        assert_eq!(alpha_on_edge(&g, e, -100.0, 0.0), ALPHA_MIN);
        assert_eq!(alpha_on_edge(&g, e, 1e6, 5.0), ALPHA_MAX);
        assert_eq!(alpha_on_edge(&g, 77, 1.0, 1.0), ALPHA_DEFAULT);
    }
}
