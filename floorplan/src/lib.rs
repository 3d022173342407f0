pub mod building;
pub mod config;
pub mod error;
pub mod model;
pub mod viewport;
pub mod geometry {
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod faces;
    pub mod picking;
    pub mod snapping;
    pub mod zones;
}

pub use algorithms::picking::{EdgeHit, Hit};
pub use algorithms::snapping::Constrained;
pub use building::{Building, Story};
pub use config::{HitTolerance, PlanConfig, ZoomLimits};
pub use error::{PlanError, Result};
pub use model::{
    Color, Edge, EdgeDirection, EdgeId, Face, FaceId, Placement, PlacementId, PlacementKind,
    Vertex, VertexId, ZoneAssignment, ZoneId, ZoneUpdate,
};
pub use viewport::Viewport;

use geometry::math::{lerp, polygon_bbox, signed_area, vertex_mean};
use geometry::tolerance::clamp_alpha;
use std::collections::HashSet;
use tracing::debug;

#[cfg(feature = "face_prof")]
use std::time::Instant;

/// Planar wall graph of one story plus the rooms derived from it.
///
/// Vertices, edges and placements live in arenas indexed by id; ids are never reused.
/// Faces are replaced wholesale by [`Geometry::rebuild_faces`].
#[derive(Clone, Debug)]
pub struct Geometry {
    pub(crate) vertices: Vec<Option<Vertex>>,       // id is index
    pub(crate) edges: Vec<Option<Edge>>,            // id is index
    pub(crate) faces: Vec<Face>,                    // sorted by id
    pub(crate) placements: Vec<Option<Placement>>,  // id is index
    pub(crate) topo_ver: u64,
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::new()
    }
}

impl Geometry {
    pub fn new() -> Self {
        Geometry {
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            placements: Vec::new(),
            topo_ver: 1,
        }
    }

    /// Monotonic version; increments on every vertex/edge/placement mutation.
    pub fn topo_version(&self) -> u64 {
        self.topo_ver
    }

    fn bump(&mut self) {
        self.topo_ver = self.topo_ver.wrapping_add(1);
    }

    // Vertices
    pub fn find_or_create_vertex(&mut self, x: f64, y: f64, snap_threshold: f64) -> VertexId {
        if let Some(id) = self.find_nearest_vertex(x, y, snap_threshold) {
            return id;
        }
        let id = self.vertices.len() as VertexId;
        self.vertices.push(Some(Vertex { x, y, edges: Vec::new() }));
        self.bump();
        id
    }
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id as usize).and_then(|v| v.as_ref())
    }
    pub fn get_vertex(&self, id: VertexId) -> Option<(f64, f64)> {
        self.vertex(id).map(|v| (v.x, v.y))
    }
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (i as VertexId, v)))
    }
    pub fn vertex_count(&self) -> u32 {
        self.vertices.iter().filter(|v| v.is_some()).count() as u32
    }
    /// `(min_x, min_y, max_x, max_y)` over all vertices; `None` when empty.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let pts: Vec<(f64, f64)> = self.vertices().map(|(_, v)| (v.x, v.y)).collect();
        if pts.is_empty() {
            return None;
        }
        Some(polygon_bbox(&pts))
    }

    fn prune_vertex_if_orphan(&mut self, id: VertexId) {
        if let Some(slot) = self.vertices.get_mut(id as usize) {
            if slot.as_ref().is_some_and(|v| v.edges.is_empty()) {
                *slot = None;
            }
        }
    }

    // Edges
    /// Adds a wall between the snapped endpoints, or returns the edge that already joins them.
    ///
    /// Callers reject too-short walls first. If both endpoints snap onto the same vertex no
    /// edge is created and `None` is returned.
    #[allow(clippy::too_many_arguments)]
    pub fn add_wall(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        height: f64,
        thickness: f64,
        snap_threshold: f64,
    ) -> Option<EdgeId> {
        let a = self.find_or_create_vertex(x1, y1, snap_threshold);
        let b = self.find_or_create_vertex(x2, y2, snap_threshold);
        if a == b {
            self.prune_vertex_if_orphan(a);
            return None;
        }
        if let Some(existing) = self.edge_between(a, b) {
            return Some(existing);
        }
        let id = self.edges.len() as EdgeId;
        self.edges.push(Some(Edge {
            vertices: if a < b { [a, b] } else { [b, a] },
            face_ids: Vec::new(),
            height,
            thickness,
            is_exterior: true,
        }));
        for v in [a, b] {
            if let Some(Some(vx)) = self.vertices.get_mut(v as usize) {
                vx.edges.push(id);
            }
        }
        self.bump();
        Some(id)
    }

    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        let va = self.vertex(a)?;
        va.edges
            .iter()
            .copied()
            .find(|&eid| self.edge(eid).is_some_and(|e| e.connects(a, b)))
    }

    /// Detaches and deletes the edge, prunes orphaned vertices, drops every face that used it
    /// and the placements it carried, then refreshes exterior flags on all remaining edges.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        let edge = match self.edges.get_mut(id as usize).and_then(|slot| slot.take()) {
            Some(e) => e,
            None => return false,
        };
        for v in edge.vertices {
            if let Some(Some(vx)) = self.vertices.get_mut(v as usize) {
                vx.edges.retain(|&e| e != id);
            }
            self.prune_vertex_if_orphan(v);
        }
        let dropped: HashSet<FaceId> = self
            .faces
            .iter()
            .filter(|f| f.contains_edge(id))
            .map(|f| f.id)
            .collect();
        self.faces.retain(|f| !dropped.contains(&f.id));
        for e in self.edges.iter_mut().flatten() {
            e.face_ids.retain(|f| !dropped.contains(f));
        }
        self.refresh_exterior();
        for slot in self.placements.iter_mut() {
            if slot.as_ref().is_some_and(|p| p.edge == id) {
                *slot = None;
            }
        }
        debug!(edge = id, dropped_faces = dropped.len(), "edge removed");
        self.bump();
        true
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id as usize).and_then(|e| e.as_ref())
    }
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (i as EdgeId, e)))
    }
    pub fn edge_count(&self) -> u32 {
        self.edges.iter().filter(|e| e.is_some()).count() as u32
    }
    pub fn edge_endpoints(&self, id: EdgeId) -> Option<((f64, f64), (f64, f64))> {
        let e = self.edge(id)?;
        Some((self.get_vertex(e.vertices[0])?, self.get_vertex(e.vertices[1])?))
    }
    pub fn edge_length(&self, id: EdgeId) -> Option<f64> {
        let (a, b) = self.edge_endpoints(id)?;
        Some((b.0 - a.0).hypot(b.1 - a.1))
    }
    /// Point at parameter `alpha` from vertices[0] towards vertices[1]; not clamped.
    pub fn point_at(&self, id: EdgeId, alpha: f64) -> Option<(f64, f64)> {
        let (a, b) = self.edge_endpoints(id)?;
        Some(lerp(a, b, alpha))
    }

    fn refresh_exterior(&mut self) {
        for e in self.edges.iter_mut().flatten() {
            e.is_exterior = e.face_ids.len() <= 1;
        }
    }

    // Faces
    /// Re-runs face detection over the whole graph and re-links every edge to its faces.
    pub fn rebuild_faces(&mut self) -> usize {
        #[cfg(feature = "face_prof")]
        let t0 = Instant::now();
        let faces = algorithms::faces::detect_faces(self);
        for e in self.edges.iter_mut().flatten() {
            e.face_ids.clear();
        }
        for f in &faces {
            for eid in f.sorted_edge_ids() {
                if let Some(Some(e)) = self.edges.get_mut(eid as usize) {
                    e.face_ids.push(f.id);
                }
            }
        }
        self.faces = faces;
        self.refresh_exterior();
        #[cfg(feature = "face_prof")]
        debug!(
            elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0,
            edges = self.edge_count(),
            "face rebuild timing"
        );
        debug!(faces = self.faces.len(), "faces rebuilt");
        self.faces.len()
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces
            .binary_search_by(|f| f.id.cmp(&id))
            .ok()
            .map(|i| &self.faces[i])
    }
    pub fn face_count(&self) -> u32 {
        self.faces.len() as u32
    }
    pub(crate) fn boundary_points(&self, face: &Face) -> Option<Vec<(f64, f64)>> {
        face.boundary
            .iter()
            .map(|&(eid, dir)| {
                let e = self.edge(eid)?;
                let start = match dir {
                    EdgeDirection::Forward => e.vertices[0],
                    EdgeDirection::Reverse => e.vertices[1],
                };
                self.get_vertex(start)
            })
            .collect()
    }
    /// Ordered (counter-clockwise) corner list of the face.
    pub fn face_vertices(&self, id: FaceId) -> Option<Vec<(f64, f64)>> {
        self.boundary_points(self.face(id)?)
    }
    pub fn face_area(&self, id: FaceId) -> Option<f64> {
        self.face_vertices(id).map(|pts| signed_area(&pts))
    }
    /// Mean of the corner coordinates.
    pub fn face_centroid(&self, id: FaceId) -> Option<(f64, f64)> {
        vertex_mean(&self.face_vertices(id)?)
    }

    // Interaction
    pub fn find_nearest_vertex(&self, x: f64, y: f64, threshold: f64) -> Option<VertexId> {
        algorithms::picking::nearest_vertex(self, x, y, threshold)
    }
    pub fn find_nearest_edge(&self, x: f64, y: f64, tol: f64) -> Option<EdgeHit> {
        algorithms::picking::nearest_edge(self, x, y, tol)
    }
    pub fn face_at(&self, x: f64, y: f64) -> Option<FaceId> {
        algorithms::picking::face_at(self, x, y)
    }
    pub fn hit_test(&self, x: f64, y: f64, viewport: &Viewport, tol: HitTolerance) -> Option<Hit> {
        algorithms::picking::hit_test(self, x, y, viewport, tol)
    }
    pub fn constrain_orthogonal(
        &self,
        start_x: f64,
        start_y: f64,
        mouse_x: f64,
        mouse_y: f64,
        grid_size: f64,
        threshold: f64,
    ) -> Constrained {
        algorithms::snapping::constrain_orthogonal(
            self, start_x, start_y, mouse_x, mouse_y, grid_size, threshold,
        )
    }
    pub fn compute_alpha_on_edge(&self, edge: EdgeId, x: f64, y: f64) -> f64 {
        algorithms::snapping::alpha_on_edge(self, edge, x, y)
    }

    // Clear
    /// Drops every vertex, edge, face and placement. Slots stay allocated so ids keep advancing.
    pub fn clear(&mut self) {
        self.vertices.iter_mut().for_each(|v| *v = None);
        self.edges.iter_mut().for_each(|e| *e = None);
        self.placements.iter_mut().for_each(|p| *p = None);
        self.faces.clear();
        self.bump();
    }

    /// First violated structural invariant, if any.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        for (vid, v) in self.vertices() {
            if v.edges.is_empty() {
                return Err(format!("vertex {vid} has no incident edges"));
            }
            for &eid in &v.edges {
                match self.edge(eid) {
                    Some(e) if e.vertices.contains(&vid) => {}
                    Some(_) => return Err(format!("vertex {vid} lists edge {eid} which does not touch it")),
                    None => return Err(format!("vertex {vid} lists missing edge {eid}")),
                }
            }
        }
        for (eid, e) in self.edges() {
            if e.vertices[0] >= e.vertices[1] {
                return Err(format!("edge {eid} vertices not in canonical order"));
            }
            for vid in e.vertices {
                match self.vertex(vid) {
                    Some(v) if v.edges.contains(&eid) => {}
                    Some(_) => return Err(format!("edge {eid} not listed on vertex {vid}")),
                    None => return Err(format!("edge {eid} references missing vertex {vid}")),
                }
            }
            if e.face_ids.len() > 2 {
                return Err(format!("edge {eid} bounds {} faces", e.face_ids.len()));
            }
            if e.is_exterior != (e.face_ids.len() <= 1) {
                return Err(format!("edge {eid} exterior flag is stale"));
            }
            for fid in &e.face_ids {
                if self.face(*fid).is_none() {
                    return Err(format!("edge {eid} references missing face {fid}"));
                }
            }
        }
        for f in &self.faces {
            for (eid, _) in &f.boundary {
                match self.edge(*eid) {
                    Some(e) if e.face_ids.contains(&f.id) => {}
                    Some(_) => return Err(format!("face {} not listed on edge {eid}", f.id)),
                    None => return Err(format!("face {} references missing edge {eid}", f.id)),
                }
            }
        }
        for (pid, p) in self.placements() {
            if self.edge(p.edge).is_none() {
                return Err(format!("placement {pid} sits on missing edge {}", p.edge));
            }
        }
        Ok(())
    }
}

// Placements
impl Geometry {
    pub fn add_placement(&mut self, edge: EdgeId, alpha: f64, kind: PlacementKind) -> Option<PlacementId> {
        self.edge(edge)?;
        let id = self.placements.len() as PlacementId;
        self.placements.push(Some(Placement {
            edge,
            alpha: clamp_alpha(alpha),
            kind,
            configured: false,
        }));
        self.bump();
        Some(id)
    }

    pub fn update_placement(
        &mut self,
        id: PlacementId,
        alpha: Option<f64>,
        kind: Option<PlacementKind>,
        configured: Option<bool>,
    ) -> bool {
        let p = match self.placements.get_mut(id as usize) {
            Some(Some(p)) => p,
            _ => return false,
        };
        if let Some(a) = alpha {
            p.alpha = clamp_alpha(a);
        }
        if let Some(k) = kind {
            p.kind = k;
        }
        if let Some(c) = configured {
            p.configured = c;
        }
        self.bump();
        true
    }

    pub fn remove_placement(&mut self, id: PlacementId) -> bool {
        if let Some(slot) = self.placements.get_mut(id as usize) {
            if slot.take().is_some() {
                self.bump();
                return true;
            }
        }
        false
    }

    pub fn placement(&self, id: PlacementId) -> Option<&Placement> {
        self.placements.get(id as usize).and_then(|p| p.as_ref())
    }
    pub fn placements(&self) -> impl Iterator<Item = (PlacementId, &Placement)> {
        self.placements
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (i as PlacementId, p)))
    }
    pub fn placement_count(&self) -> u32 {
        self.placements.iter().filter(|p| p.is_some()).count() as u32
    }
    pub fn placements_on_edge(&self, edge: EdgeId) -> Vec<PlacementId> {
        self.placements()
            .filter(|(_, p)| p.edge == edge)
            .map(|(id, _)| id)
            .collect()
    }
    pub fn placement_position(&self, id: PlacementId) -> Option<(f64, f64)> {
        let p = self.placement(id)?;
        self.point_at(p.edge, p.alpha)
    }
}
