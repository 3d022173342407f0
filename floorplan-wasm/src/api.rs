use crate::error;
use crate::interop::{arr_f64, arr_u32, arr_u8, new_obj, point, set_kv, to_js};
use crate::{FloorPlan, Viewport};
use floorplan::{FaceId, PlacementKind, PlanConfig, PlanError, ZoneUpdate};
use js_sys::{Float64Array, Uint32Array};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[derive(Serialize)]
struct FaceOut {
    id: u32,
    area: f64,
    centroid: Option<(f64, f64)>,
    /// x0, y0, x1, y1, ... counter-clockwise
    points: Vec<f64>,
    edges: Vec<u32>,
}

#[derive(Serialize)]
struct PlacementOut {
    id: u32,
    edge: u32,
    alpha: f64,
    kind: PlacementKind,
    flow_element: &'static str,
    configured: bool,
    position: Option<(f64, f64)>,
}

#[derive(Serialize)]
struct StoryOut<'a> {
    index: usize,
    name: &'a str,
    elevation: f64,
    height: f64,
    active: bool,
}

fn parse_kind(kind: &str) -> Result<PlacementKind, PlanError> {
    kind.parse::<PlacementKind>()
}

impl FloorPlan {
    fn report(&self, r: JsValue) -> JsValue {
        if self.debug && !r.is_undefined() {
            if let Ok(ok) = js_sys::Reflect::get(&r, &JsValue::from_str("ok")) {
                if ok.as_bool() == Some(false) {
                    web_sys::console::warn_2(&JsValue::from_str("floorplan: rejected edit"), &r);
                }
            }
        }
        r
    }
}

#[wasm_bindgen]
impl FloorPlan {
    #[wasm_bindgen(constructor)]
    pub fn new() -> FloorPlan {
        FloorPlan::rs_new(PlanConfig::default())
    }
    /// Builds a plan from partial JSON config; throws an error object on bad input.
    pub fn with_config(json: &str) -> Result<FloorPlan, JsValue> {
        PlanConfig::from_json_str(json)
            .map(FloorPlan::rs_new)
            .map_err(|e| error::from_plan(&e))
    }
    pub fn config(&self) -> JsValue {
        to_js(self.inner.config())
    }
    /// Logs rejected edits to the browser console.
    pub fn set_debug(&mut self, on: bool) {
        self.debug = on;
    }
    pub fn topo_version(&self) -> u64 {
        self.rs_topo_version()
    }

    // Stories
    pub fn add_story(&mut self, name: &str, height: f64) -> Option<u32> {
        self.inner.add_story(name, height).ok().map(|i| i as u32)
    }
    pub fn add_story_res(&mut self, name: &str, height: f64) -> JsValue {
        let r = error::result(self.inner.add_story(name, height).map(|i| i as u32));
        self.report(r)
    }
    pub fn remove_story_res(&mut self, index: u32) -> JsValue {
        let r = error::result(self.inner.remove_story(index as usize).map(|_| true));
        self.report(r)
    }
    pub fn set_active_story(&mut self, index: u32) -> bool {
        self.inner.set_active_story(index as usize).is_ok()
    }
    pub fn set_active_story_res(&mut self, index: u32) -> JsValue {
        error::result(self.inner.set_active_story(index as usize).map(|_| true))
    }
    pub fn active_story(&self) -> u32 {
        self.inner.active_story_index() as u32
    }
    pub fn get_stories(&self) -> JsValue {
        let active = self.inner.active_story_index();
        let out: Vec<StoryOut> = self
            .inner
            .stories()
            .iter()
            .enumerate()
            .map(|(index, s)| StoryOut { index, name: &s.name, elevation: s.elevation, height: s.height, active: index == active })
            .collect();
        to_js(&out)
    }
    pub fn clear_story(&mut self) {
        self.inner.clear_story();
    }

    // Walls
    pub fn add_wall(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Option<u32> {
        self.inner.add_wall(x1, y1, x2, y2).ok()
    }
    pub fn add_wall_res(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> JsValue {
        let r = error::result(self.inner.add_wall(x1, y1, x2, y2));
        self.report(r)
    }
    pub fn add_rectangle(&mut self, x: f64, y: f64, w: f64, h: f64) -> Uint32Array {
        arr_u32(&self.inner.add_rectangle(x, y, w, h).unwrap_or_default())
    }
    pub fn add_rectangle_res(&mut self, x: f64, y: f64, w: f64, h: f64) -> JsValue {
        let r = match self.inner.add_rectangle(x, y, w, h) {
            Ok(ids) => error::ok(arr_u32(&ids).into()),
            Err(e) => error::from_plan(&e),
        };
        self.report(r)
    }
    pub fn remove_edge(&mut self, id: u32) -> bool {
        self.inner.remove_edge(id)
    }
    pub fn remove_edge_res(&mut self, id: u32) -> JsValue {
        if self.inner.geometry().edge(id).is_none() {
            return self.report(error::invalid_id("edge", id));
        }
        error::ok(JsValue::from_bool(self.inner.remove_edge(id)))
    }

    // Counts and typed arrays
    pub fn vertex_count(&self) -> u32 {
        self.inner.geometry().vertex_count()
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.geometry().edge_count()
    }
    pub fn face_count(&self) -> u32 {
        self.inner.geometry().face_count()
    }
    pub fn get_vertex_data(&self) -> JsValue {
        let g = self.inner.geometry();
        let mut ids = Vec::new();
        let mut pos = Vec::new();
        for (id, v) in g.vertices() {
            ids.push(id);
            pos.push(v.x);
            pos.push(v.y);
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "positions", &arr_f64(&pos).into());
        obj.into()
    }
    pub fn get_edge_data(&self) -> JsValue {
        let g = self.inner.geometry();
        let mut ids = Vec::new();
        let mut endpoints = Vec::new();
        let mut exterior = Vec::new();
        let mut heights = Vec::new();
        let mut thicknesses = Vec::new();
        for (id, e) in g.edges() {
            ids.push(id);
            endpoints.extend_from_slice(&e.vertices);
            exterior.push(e.is_exterior as u8);
            heights.push(e.height);
            thicknesses.push(e.thickness);
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "endpoints", &arr_u32(&endpoints).into());
        set_kv(&obj, "exterior", &arr_u8(&exterior).into());
        set_kv(&obj, "heights", &arr_f64(&heights).into());
        set_kv(&obj, "thicknesses", &arr_f64(&thicknesses).into());
        obj.into()
    }
    pub fn get_faces(&self) -> JsValue {
        let g = self.inner.geometry();
        let out: Vec<FaceOut> = g
            .faces()
            .iter()
            .map(|f| FaceOut {
                id: f.id.0,
                area: g.face_area(f.id).unwrap_or(0.0),
                centroid: g.face_centroid(f.id),
                points: g
                    .face_vertices(f.id)
                    .unwrap_or_default()
                    .into_iter()
                    .flat_map(|(x, y)| [x, y])
                    .collect(),
                edges: f.boundary.iter().map(|(e, _)| *e).collect(),
            })
            .collect();
        to_js(&out)
    }

    // Queries
    pub fn edge_length(&self, id: u32) -> Option<f64> {
        self.inner.geometry().edge_length(id)
    }
    pub fn point_at(&self, id: u32, alpha: f64) -> JsValue {
        point(self.inner.geometry().point_at(id, alpha))
    }
    pub fn face_area(&self, id: u32) -> Option<f64> {
        self.inner.geometry().face_area(FaceId(id))
    }
    pub fn face_centroid(&self, id: u32) -> JsValue {
        point(self.inner.geometry().face_centroid(FaceId(id)))
    }
    pub fn face_vertices(&self, id: u32) -> Float64Array {
        let flat: Vec<f64> = self
            .inner
            .geometry()
            .face_vertices(FaceId(id))
            .unwrap_or_default()
            .into_iter()
            .flat_map(|(x, y)| [x, y])
            .collect();
        arr_f64(&flat)
    }
    pub fn face_vertices_res(&self, id: u32) -> JsValue {
        if self.inner.geometry().face(FaceId(id)).is_none() {
            return error::invalid_id("face", id);
        }
        error::ok(self.face_vertices(id).into())
    }
    pub fn check_invariants_res(&self) -> JsValue {
        match self.inner.geometry().check_invariants() {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(msg) => error::err("invariant", msg, None),
        }
    }

    // Zones
    pub fn get_zones(&self) -> JsValue {
        to_js(&self.inner.zones())
    }
    pub fn zone(&self, face: u32) -> JsValue {
        self.inner.zone(FaceId(face)).map_or(JsValue::NULL, to_js)
    }
    pub fn zone_for_point(&self, x: f64, y: f64) -> JsValue {
        self.inner.zone_for_point(x, y).map_or(JsValue::NULL, to_js)
    }
    pub fn update_zone(&mut self, face: u32, update: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<ZoneUpdate>(update) {
            Ok(u) => self.inner.update_zone(FaceId(face), u),
            Err(_) => false,
        }
    }
    pub fn update_zone_res(&mut self, face: u32, update: JsValue) -> JsValue {
        let u = match serde_wasm_bindgen::from_value::<ZoneUpdate>(update) {
            Ok(u) => u,
            Err(e) => return self.report(error::err("invalid_update", e.to_string(), None)),
        };
        if self.inner.zone(FaceId(face)).is_none() {
            return self.report(error::invalid_id("face", face));
        }
        if !self.inner.update_zone(FaceId(face), u) {
            return self.report(error::err("out_of_range", "temperature and volume must be positive and finite", None));
        }
        error::ok(JsValue::TRUE)
    }

    // Placements
    pub fn add_placement(&mut self, edge: u32, alpha: f64, kind: &str) -> Option<u32> {
        let kind = parse_kind(kind).ok()?;
        self.inner.add_placement(edge, alpha, kind).ok()
    }
    pub fn add_placement_res(&mut self, edge: u32, alpha: f64, kind: &str) -> JsValue {
        let r = match parse_kind(kind) {
            Ok(k) => error::result(self.inner.add_placement(edge, alpha, k)),
            Err(e) => error::from_plan(&e),
        };
        self.report(r)
    }
    pub fn update_placement(&mut self, id: u32, alpha: Option<f64>, kind: Option<String>, configured: Option<bool>) -> bool {
        let kind = match kind.as_deref().map(parse_kind).transpose() {
            Ok(k) => k,
            Err(_) => return false,
        };
        self.inner.update_placement(id, alpha, kind, configured).is_ok()
    }
    pub fn update_placement_res(&mut self, id: u32, alpha: Option<f64>, kind: Option<String>, configured: Option<bool>) -> JsValue {
        let r = match kind.as_deref().map(parse_kind).transpose() {
            Ok(k) => error::result(self.inner.update_placement(id, alpha, k, configured).map(|_| true)),
            Err(e) => error::from_plan(&e),
        };
        self.report(r)
    }
    pub fn remove_placement(&mut self, id: u32) -> bool {
        self.inner.remove_placement(id)
    }
    pub fn get_placements(&self) -> JsValue {
        let g = self.inner.geometry();
        let out: Vec<PlacementOut> = g
            .placements()
            .map(|(id, p)| PlacementOut {
                id,
                edge: p.edge,
                alpha: p.alpha,
                kind: p.kind,
                flow_element: p.kind.flow_element(),
                configured: p.configured,
                position: g.placement_position(id),
            })
            .collect();
        to_js(&out)
    }
    pub fn placements_on_edge(&self, edge: u32) -> Uint32Array {
        arr_u32(&self.inner.geometry().placements_on_edge(edge))
    }

    // Interaction
    pub fn find_nearest_vertex(&self, x: f64, y: f64, threshold: f64) -> Option<u32> {
        self.inner.geometry().find_nearest_vertex(x, y, threshold)
    }
    pub fn find_nearest_edge(&self, x: f64, y: f64, tol: f64) -> JsValue {
        match self.inner.geometry().find_nearest_edge(x, y, tol) {
            Some(h) => {
                let obj = new_obj();
                set_kv(&obj, "id", &JsValue::from_f64(h.id as f64));
                set_kv(&obj, "alpha", &JsValue::from_f64(h.t));
                set_kv(&obj, "dist", &JsValue::from_f64(h.dist));
                obj.into()
            }
            None => JsValue::NULL,
        }
    }
    pub fn face_at(&self, x: f64, y: f64) -> Option<u32> {
        self.inner.geometry().face_at(x, y).map(|f| f.0)
    }
    pub fn constrain_orthogonal(&self, start_x: f64, start_y: f64, mouse_x: f64, mouse_y: f64) -> JsValue {
        to_js(&self.inner.constrain_orthogonal(start_x, start_y, mouse_x, mouse_y))
    }
    pub fn compute_alpha_on_edge(&self, edge: u32, x: f64, y: f64) -> f64 {
        self.inner.geometry().compute_alpha_on_edge(edge, x, y)
    }
    pub fn hit_test(&self, x: f64, y: f64, viewport: &Viewport) -> JsValue {
        self.inner.hit_test(x, y, &viewport.inner).map_or(JsValue::NULL, |h| to_js(&h))
    }
    /// Frames the active story in `viewport`. No-op on an empty story.
    pub fn fit_viewport(&self, viewport: &mut Viewport, margin_px: f64) -> bool {
        match self.inner.geometry().bounds() {
            Some((x0, y0, x1, y1)) => {
                viewport.inner.fit_bounds(x0, y0, x1, y1, margin_px);
                true
            }
            None => false,
        }
    }
    pub fn hit_test_res(&self, x: f64, y: f64, viewport: &Viewport) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        error::ok(self.hit_test(x, y, viewport))
    }
}

impl Default for FloorPlan {
    fn default() -> Self {
        FloorPlan::new()
    }
}

#[wasm_bindgen]
impl Viewport {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Viewport {
        Viewport { inner: floorplan::Viewport::new(width, height) }
    }
    pub fn for_plan(plan: &FloorPlan, width: f64, height: f64) -> Viewport {
        Viewport { inner: floorplan::Viewport::from_config(width, height, plan.inner.config()) }
    }
    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.zoom
    }
    #[wasm_bindgen(getter)]
    pub fn pan_x(&self) -> f64 {
        self.inner.pan_x
    }
    #[wasm_bindgen(getter)]
    pub fn pan_y(&self) -> f64 {
        self.inner.pan_y
    }
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.inner.set_canvas_size(width, height);
    }
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.inner.pan_by(dx, dy);
    }
    pub fn zoom_at_point(&mut self, sx: f64, sy: f64, direction: f64) {
        self.inner.zoom_at_point(sx, sy, direction);
    }
    pub fn world_to_screen(&self, x: f64, y: f64) -> Float64Array {
        let (sx, sy) = self.inner.world_to_screen(x, y);
        arr_f64(&[sx, sy])
    }
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> Float64Array {
        let (x, y) = self.inner.screen_to_world(sx, sy);
        arr_f64(&[x, y])
    }
    pub fn world_tolerance(&self, px: f64) -> f64 {
        self.inner.world_tolerance(px)
    }
    pub fn fit_bounds(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64, margin_px: f64) {
        self.inner.fit_bounds(min_x, min_y, max_x, max_y, margin_px);
    }
}
