use std::collections::HashSet;
use std::f64::consts::TAU;

use tracing::trace;

use crate::{
    geometry::{
        math::signed_area,
        tolerance::{EPS_ANG, EPS_FACE_AREA, MAX_TRACE_STEPS},
    },
    model::{EdgeDirection, EdgeId, Face, FaceId, VertexId},
    Geometry,
};

#[derive(Default)]
struct HalfEdges {
    from: Vec<VertexId>,
    to: Vec<VertexId>,
    eid: Vec<EdgeId>,
    dir: Vec<EdgeDirection>,
}

impl HalfEdges {
    fn push(&mut self, from: VertexId, to: VertexId, eid: EdgeId, dir: EdgeDirection) -> usize {
        let idx = self.from.len();
        self.from.push(from);
        self.to.push(to);
        self.eid.push(eid);
        self.dir.push(dir);
        idx
    }

    fn len(&self) -> usize {
        self.from.len()
    }
}

/// Outgoing half-edge at a vertex.
#[derive(Clone, Copy)]
struct Spoke {
    angle: f64,
    to: VertexId,
    half: usize,
}

/// FNV-1a over the sorted, deduplicated edge ids. Independent of walk start and direction.
pub fn face_id_from_edges(edges: &[EdgeId]) -> FaceId {
    let mut ids = edges.to_vec();
    ids.sort_unstable();
    ids.dedup();
    let mut hash: u32 = 0x811C_9DC5;
    for x in ids {
        for b in x.to_le_bytes() {
            hash ^= b as u32;
            hash = hash.wrapping_mul(0x0100_0193);
        }
    }
    FaceId(hash)
}

/// Traces every bounded room of the wall graph.
///
/// Each undirected edge contributes two half-edges. From the end of a half-edge the walk takes
/// the sharpest clockwise turn measured from the reverse direction, which keeps the traced
/// region on the left. Closed walks with positive area above [`EPS_FACE_AREA`] are rooms; the
/// unbounded outside traces clockwise and is dropped with the rest of the non-positive loops.
/// Result is sorted by face id.
pub fn detect_faces(g: &Geometry) -> Vec<Face> {
    let mut he = HalfEdges::default();
    let mut adj: Vec<Vec<Spoke>> = vec![Vec::new(); g.vertices.len()];
    for (eid, e) in g.edges() {
        let [a, b] = e.vertices;
        let (Some(pa), Some(pb)) = (g.get_vertex(a), g.get_vertex(b)) else {
            continue;
        };
        for (u, v, pu, pv, dir) in [
            (a, b, pa, pb, EdgeDirection::Forward),
            (b, a, pb, pa, EdgeDirection::Reverse),
        ] {
            let half = he.push(u, v, eid, dir);
            adj[u as usize].push(Spoke {
                angle: (pv.1 - pu.1).atan2(pv.0 - pu.0),
                to: v,
                half,
            });
        }
    }
    for spokes in &mut adj {
        spokes.sort_by(|a, b| a.angle.total_cmp(&b.angle).then(a.to.cmp(&b.to)));
    }

    let mut used = vec![false; he.len()];
    let mut seen: HashSet<Vec<EdgeId>> = HashSet::new();
    let mut faces = Vec::new();
    for start in 0..he.len() {
        if used[start] {
            continue;
        }
        let Some(trail) = trace_loop(g, &he, &adj, &mut used, start) else {
            continue;
        };
        let cycle = cancel_spurs(&trail, &he.eid);
        let mut distinct: Vec<EdgeId> = cycle.iter().map(|&h| he.eid[h]).collect();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 3 {
            continue;
        }
        let Some(poly) = cycle
            .iter()
            .map(|&h| g.get_vertex(he.from[h]))
            .collect::<Option<Vec<_>>>()
        else {
            continue;
        };
        let area = signed_area(&poly);
        if area <= EPS_FACE_AREA {
            trace!(area, edges = distinct.len(), "loop is not a room");
            continue;
        }
        let id = face_id_from_edges(&distinct);
        if !first_trace(&mut seen, distinct) {
            continue;
        }
        faces.push(Face {
            id,
            boundary: cycle.iter().map(|&h| (he.eid[h], he.dir[h])).collect(),
        });
    }
    faces.sort_by_key(|f| f.id);
    faces
}

/// Loops are told apart by their sorted edge set; the 32-bit id alone can collide.
fn first_trace(seen: &mut HashSet<Vec<EdgeId>>, distinct: Vec<EdgeId>) -> bool {
    seen.insert(distinct)
}

/// Follows successors from `start` until the walk returns to it. `None` on a dead end.
fn trace_loop(
    g: &Geometry,
    he: &HalfEdges,
    adj: &[Vec<Spoke>],
    used: &mut [bool],
    start: usize,
) -> Option<Vec<usize>> {
    let mut trail = Vec::new();
    let mut cur = start;
    loop {
        used[cur] = true;
        trail.push(cur);
        let next = next_half_edge(g, he, adj, cur)?;
        if next == start {
            return Some(trail);
        }
        if used[next] || trail.len() > MAX_TRACE_STEPS {
            return None;
        }
        cur = next;
    }
}

fn next_half_edge(g: &Geometry, he: &HalfEdges, adj: &[Vec<Spoke>], cur: usize) -> Option<usize> {
    let u = he.from[cur];
    let v = he.to[cur];
    let pu = g.get_vertex(u)?;
    let pv = g.get_vertex(v)?;
    let reference = (pu.1 - pv.1).atan2(pu.0 - pv.0);
    let mut best: Option<(f64, usize)> = None;
    let mut backtrack = None;
    for s in adj.get(v as usize)? {
        if s.to == u {
            backtrack = Some(s.half);
            continue;
        }
        let turn = (reference - s.angle).rem_euclid(TAU);
        // overlapping walls have no defined order
        if turn <= EPS_ANG || TAU - turn <= EPS_ANG {
            continue;
        }
        if best.map_or(true, |(bt, _)| turn < bt) {
            best = Some((turn, s.half));
        }
    }
    best.map(|(_, h)| h).or(backtrack)
}

/// Drops out-and-back excursions along dangling walls so the loop is a simple ring.
fn cancel_spurs(trail: &[usize], eid: &[EdgeId]) -> Vec<usize> {
    let mut ring: Vec<usize> = Vec::with_capacity(trail.len());
    for &h in trail {
        if ring.last().is_some_and(|&top| eid[top] == eid[h]) {
            ring.pop();
        } else {
            ring.push(h);
        }
    }
    let mut lo = 0;
    let mut hi = ring.len();
    while hi - lo >= 2 && eid[ring[lo]] == eid[ring[hi - 1]] {
        lo += 1;
        hi -= 1;
    }
    ring[lo..hi].to_vec()
}
