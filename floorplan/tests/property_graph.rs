use floorplan::geometry::tolerance::{ALPHA_MAX, ALPHA_MIN, EPS_FACE_AREA};
use floorplan::{Building, FaceId, Geometry, ZoneId};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug)]
enum Op {
    AddWall { x1: u8, y1: u8, x2: u8, y2: u8 },
    AddRect { x: u8, y: u8, w: u8, h: u8 },
    RemoveEdge { idx: u16 },
}

// Coordinates live on a 1 m lattice so walls meet exactly at shared corners.
fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..8, 0u8..8, 0u8..8, 0u8..8).prop_map(|(x1, y1, x2, y2)| Op::AddWall { x1, y1, x2, y2 }),
        2 => (0u8..6, 0u8..6, 1u8..4, 1u8..4).prop_map(|(x, y, w, h)| Op::AddRect { x, y, w, h }),
        2 => any::<u16>().prop_map(|idx| Op::RemoveEdge { idx }),
    ]
}

fn apply_op(b: &mut Building, op: Op) {
    match op {
        Op::AddWall { x1, y1, x2, y2 } => {
            let _ = b.add_wall(x1 as f64, y1 as f64, x2 as f64, y2 as f64);
        }
        Op::AddRect { x, y, w, h } => {
            let _ = b.add_rectangle(x as f64, y as f64, w as f64, h as f64);
        }
        Op::RemoveEdge { idx } => {
            let ids: Vec<u32> = b.geometry().edges().map(|(id, _)| id).collect();
            if ids.is_empty() {
                return;
            }
            b.remove_edge(ids[idx as usize % ids.len()]);
        }
    }
}

fn assert_graph(g: &Geometry) {
    if let Err(msg) = g.check_invariants() {
        panic!("invariant violated: {msg}");
    }
    for (eid, e) in g.edges() {
        assert_eq!(e.is_exterior, e.face_ids.len() <= 1, "edge {eid} exterior flag");
    }
    for f in g.faces() {
        let area = g.face_area(f.id).expect("area");
        assert!(area > EPS_FACE_AREA, "face {} area {area}", f.id);
        assert!(f.sorted_edge_ids().len() >= 3);
    }
    let mut copy = g.clone();
    copy.rebuild_faces();
    let a: Vec<FaceId> = g.faces().iter().map(|f| f.id).collect();
    let b: Vec<FaceId> = copy.faces().iter().map(|f| f.id).collect();
    assert_eq!(a, b, "rebuild changed face ids");
}

/// Tracks every zone id ever seen; an id may stay alive on its face but never come back.
#[derive(Default)]
struct ZoneLedger {
    owner: HashMap<ZoneId, FaceId>,
    alive: HashSet<ZoneId>,
}

impl ZoneLedger {
    fn observe(&mut self, b: &Building) {
        let mut now = HashSet::new();
        for z in b.zones() {
            match self.owner.get(&z.zone_id) {
                Some(face) => {
                    assert_eq!(*face, z.face_id, "zone {} moved to another face", z.zone_id);
                    assert!(self.alive.contains(&z.zone_id), "zone {} was reissued", z.zone_id);
                }
                None => {
                    self.owner.insert(z.zone_id, z.face_id);
                }
            }
            assert!(now.insert(z.zone_id));
        }
        self.alive = now;
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn edit_sequences_keep_invariants(seq in prop::collection::vec(op_strategy(), 5..40)) {
        let mut b = Building::default();
        let mut ledger = ZoneLedger::default();
        for op in seq {
            apply_op(&mut b, op);
            assert_graph(b.geometry());
            ledger.observe(&b);
            prop_assert_eq!(b.zones().len(), b.geometry().faces().len());
        }
    }

    #[test]
    fn alpha_stays_in_bounds(x in -1e4f64..1e4, y in -1e4f64..1e4) {
        let mut g = Geometry::new();
        let e = g.add_wall(-3.0, 1.0, 7.0, 2.5, 3.0, 0.2, 0.25).expect("wall");
        let a = g.compute_alpha_on_edge(e, x, y);
        prop_assert!((ALPHA_MIN..=ALPHA_MAX).contains(&a));
    }
}
