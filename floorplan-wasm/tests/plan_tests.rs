#![cfg(target_arch = "wasm32")]

use floorplan_wasm::{FloorPlan, Viewport};
use js_sys::{Array, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap_or(JsValue::UNDEFINED)
}

#[wasm_bindgen_test]
fn rectangle_room_round_trip() {
    let mut p = FloorPlan::new();
    let ids = p.add_rectangle(0.0, 0.0, 5.0, 4.0);
    assert_eq!(ids.length(), 4);
    assert_eq!(p.face_count(), 1);

    let faces = Array::from(&p.get_faces());
    assert_eq!(faces.length(), 1);
    let face = faces.get(0);
    assert_eq!(get(&face, "area").as_f64(), Some(20.0));
    let id = get(&face, "id").as_f64().expect("id") as u32;
    assert_eq!(p.face_area(id), Some(20.0));
    assert_eq!(p.face_vertices(id).length(), 8);

    let zones = Array::from(&p.get_zones());
    assert_eq!(zones.length(), 1);
    assert_eq!(get(&zones.get(0), "zone_id").as_f64(), Some(1.0));
}

#[wasm_bindgen_test]
fn typed_arrays_match_counts() {
    let mut p = FloorPlan::new();
    p.add_rectangle(0.0, 0.0, 4.0, 4.0);
    let v = p.get_vertex_data();
    let ids = js_sys::Uint32Array::from(get(&v, "ids"));
    let pos = js_sys::Float64Array::from(get(&v, "positions"));
    assert_eq!(ids.length(), p.vertex_count());
    assert_eq!(pos.length(), 2 * p.vertex_count());
    let e = p.get_edge_data();
    let ext = js_sys::Uint8Array::from(get(&e, "exterior"));
    assert_eq!(ext.length(), p.edge_count());
    assert!(ext.to_vec().iter().all(|&x| x == 1));
}

#[wasm_bindgen_test]
fn hit_test_prefers_placement() {
    let mut p = FloorPlan::new();
    let ids = p.add_rectangle(0.0, 0.0, 5.0, 4.0).to_vec();
    let door = p.add_placement(ids[0], 0.5, "door").expect("door");
    let pos = js_sys::Float64Array::from(p.point_at(ids[0], 0.5)).to_vec();
    let vp = Viewport::new(800.0, 600.0);
    let hit = p.hit_test(pos[0], pos[1], &vp);
    assert_eq!(get(&hit, "kind").as_string().as_deref(), Some("placement"));
    assert_eq!(get(&hit, "id").as_f64(), Some(door as f64));
    let hit = p.hit_test(2.5, 2.0, &vp);
    assert_eq!(get(&hit, "kind").as_string().as_deref(), Some("face"));
}

#[wasm_bindgen_test]
fn viewport_zoom_keeps_cursor() {
    let mut vp = Viewport::new(800.0, 600.0);
    let before = vp.screen_to_world(600.0, 100.0).to_vec();
    vp.zoom_at_point(600.0, 100.0, 1.0);
    let after = vp.screen_to_world(600.0, 100.0).to_vec();
    assert!(vp.zoom() > 50.0);
    assert!((before[0] - after[0]).abs() < 1e-9);
    assert!((before[1] - after[1]).abs() < 1e-9);
}

#[wasm_bindgen_test]
fn constrain_snaps_to_vertex() {
    let mut p = FloorPlan::new();
    p.add_wall(5.0, 0.0, 5.0, 4.0).expect("wall");
    let c = p.constrain_orthogonal(0.0, 0.0, 4.9, 0.1);
    assert_eq!(get(&c, "x").as_f64(), Some(5.0));
    assert_eq!(get(&c, "y").as_f64(), Some(0.0));
    assert!(get(&c, "snapped_vertex").as_f64().is_some());
}

#[wasm_bindgen_test]
fn fit_viewport_frames_story() {
    let mut p = FloorPlan::new();
    let mut vp = Viewport::new(800.0, 600.0);
    assert!(!p.fit_viewport(&mut vp, 50.0));
    p.add_rectangle(0.0, 0.0, 10.0, 4.0);
    assert!(p.fit_viewport(&mut vp, 50.0));
    assert_eq!(vp.zoom(), 70.0);
    let c = vp.world_to_screen(5.0, 2.0).to_vec();
    assert!((c[0] - 400.0).abs() < 1e-9 && (c[1] - 300.0).abs() < 1e-9);
}
