use serde::{Deserialize, Serialize};

use crate::config::HitTolerance;
use crate::geometry::math::{dist_sq, point_in_polygon, seg_distance_sq, signed_area};
use crate::model::{EdgeId, FaceId, PlacementId, VertexId};
use crate::viewport::Viewport;
use crate::Geometry;

/// Topmost element under the pointer, in drawing order: placements over walls over floors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Hit {
    Placement { id: PlacementId, dist: f64 },
    Edge { id: EdgeId, alpha: f64, dist: f64 },
    Face { id: FaceId },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeHit {
    pub id: EdgeId,
    /// Clamped segment parameter of the closest point.
    pub t: f64,
    pub dist: f64,
}

/// Closest vertex within `threshold`; the first one in id order wins exact ties.
pub fn nearest_vertex(g: &Geometry, x: f64, y: f64, threshold: f64) -> Option<VertexId> {
    if !(threshold >= 0.0) {
        return None;
    }
    let tol2 = threshold * threshold;
    let mut best: Option<(VertexId, f64)> = None;
    for (id, v) in g.vertices() {
        let d2 = dist_sq((v.x, v.y), (x, y));
        if d2 <= tol2 && best.map_or(true, |(_, bd)| d2 < bd) {
            best = Some((id, d2));
        }
    }
    best.map(|(id, _)| id)
}

pub fn nearest_edge(g: &Geometry, x: f64, y: f64, tol: f64) -> Option<EdgeHit> {
    let tol2 = tol * tol;
    let mut best: Option<(EdgeId, f64, f64)> = None;
    for (id, _) in g.edges() {
        let Some((a, b)) = g.edge_endpoints(id) else { continue };
        let (d2, t) = seg_distance_sq(x, y, a.0, a.1, b.0, b.1);
        if d2 <= tol2 && best.map_or(true, |(_, bd, _)| d2 < bd) {
            best = Some((id, d2, t));
        }
    }
    best.map(|(id, d2, t)| EdgeHit { id, t, dist: d2.sqrt() })
}

fn nearest_placement(g: &Geometry, x: f64, y: f64, tol: f64) -> Option<(PlacementId, f64)> {
    let tol2 = tol * tol;
    let mut best: Option<(PlacementId, f64)> = None;
    for (id, _) in g.placements() {
        let Some(p) = g.placement_position(id) else { continue };
        let d2 = dist_sq(p, (x, y));
        if d2 <= tol2 && best.map_or(true, |(_, bd)| d2 < bd) {
            best = Some((id, d2));
        }
    }
    best.map(|(id, d2)| (id, d2.sqrt()))
}

/// Face whose polygon contains the point; the smallest one when faces nest.
pub fn face_at(g: &Geometry, x: f64, y: f64) -> Option<FaceId> {
    let mut best: Option<(FaceId, f64)> = None;
    for f in g.faces() {
        let Some(pts) = g.boundary_points(f) else { continue };
        if !point_in_polygon(x, y, &pts) {
            continue;
        }
        let area = signed_area(&pts);
        if best.map_or(true, |(_, ba)| area < ba) {
            best = Some((f.id, area));
        }
    }
    best.map(|(id, _)| id)
}

pub fn hit_test(g: &Geometry, x: f64, y: f64, viewport: &Viewport, tol: HitTolerance) -> Option<Hit> {
    if let Some((id, dist)) = nearest_placement(g, x, y, viewport.world_tolerance(tol.placement_px)) {
        return Some(Hit::Placement { id, dist });
    }
    if let Some(e) = nearest_edge(g, x, y, viewport.world_tolerance(tol.edge_px)) {
        return Some(Hit::Edge { id: e.id, alpha: e.t, dist: e.dist });
    }
    face_at(g, x, y).map(|id| Hit::Face { id })
}
