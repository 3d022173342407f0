use floorplan::algorithms::snapping::snap_to_grid;
use floorplan::{Building, Hit, PlacementKind, Viewport};

fn two_rooms() -> Building {
    let mut b = Building::default();
    b.add_rectangle(0.0, 0.0, 5.0, 4.0).expect("left");
    b.add_rectangle(5.0, 0.0, 5.0, 4.0).expect("right");
    b
}

#[test]
fn placement_wins_over_edge_and_face() {
    let mut b = two_rooms();
    let g = b.geometry();
    let u = g.find_nearest_vertex(5.0, 0.0, 1e-6).expect("u");
    let v = g.find_nearest_vertex(5.0, 4.0, 1e-6).expect("v");
    let shared = g.edge_between(u, v).expect("shared");
    let p = b.add_placement(shared, 0.5, PlacementKind::Door).expect("door");
    let (x, y) = b.geometry().placement_position(p).expect("position");
    assert_eq!((x, y), (5.0, 2.0));

    let vp = Viewport::new(1024.0, 768.0);
    match b.hit_test(x, y, &vp) {
        Some(Hit::Placement { id, .. }) => assert_eq!(id, p),
        other => panic!("expected placement, got {other:?}"),
    }
    match b.hit_test(5.0, 0.7, &vp) {
        Some(Hit::Edge { id, .. }) => assert_eq!(id, shared),
        other => panic!("expected edge, got {other:?}"),
    }
    let right = b.zone_for_point(7.5, 2.0).expect("right zone").face_id;
    assert_eq!(b.hit_test(7.5, 2.0, &vp), Some(Hit::Face { id: right }));
}

#[test]
fn touch_targets_stay_constant_on_screen() {
    let b = two_rooms();
    let mut vp = Viewport::new(1024.0, 768.0);
    // 0.3 m off the bottom wall: 15 px at zoom 50, 3 px at zoom 10
    assert!(matches!(b.hit_test(2.0, -0.3, &vp), None));
    vp.zoom = 10.0;
    assert!(matches!(b.hit_test(2.0, -0.3, &vp), Some(Hit::Edge { .. })));
}

#[test]
fn nearest_edge_reports_parameter_and_distance() {
    let b = two_rooms();
    let g = b.geometry();
    let hit = g.find_nearest_edge(7.5, 0.2, 0.5).expect("edge");
    let (a, c) = g.edge_endpoints(hit.id).expect("endpoints");
    assert_eq!(a.1, 0.0);
    assert_eq!(c.1, 0.0);
    assert!((hit.dist - 0.2).abs() < 1e-12);
    assert!((hit.t - 0.5).abs() < 1e-12);
}

#[test]
fn orthogonal_drawing_locks_dominant_axis() {
    let b = Building::default();
    let c = b.constrain_orthogonal(1.0, 1.0, 4.3, 1.6);
    assert_eq!((c.x, c.y, c.snapped_vertex), (4.5, 1.0, None));
    let c = b.constrain_orthogonal(1.0, 1.0, 0.7, 3.1);
    assert_eq!((c.x, c.y), (1.0, 3.0));
    assert_eq!(snap_to_grid(2.74, 0.5), 2.5);
}

#[test]
fn hit_serializes_with_kind_tag() {
    let json = serde_json::to_value(Hit::Edge { id: 3, alpha: 0.25, dist: 0.1 }).expect("json");
    assert_eq!(json["kind"], "edge");
    assert_eq!(json["id"], 3);
}
