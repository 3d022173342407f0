use floorplan::PlanError;
use js_sys::Object;
use wasm_bindgen::prelude::*;

use crate::interop::{new_obj, set_kv};

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

fn num(o: &Object, k: &str, v: f64) { set_kv(o, k, &JsValue::from_f64(v)); }

/// Error object for a core error, with the offending values under `data`.
pub fn from_plan(e: &PlanError) -> JsValue {
    let d = new_obj();
    match e {
        PlanError::NonFinite { param, .. } => {
            set_kv(&d, "param", &JsValue::from_str(param));
        }
        PlanError::OutOfRange { param, value, min, max } => {
            set_kv(&d, "param", &JsValue::from_str(param));
            num(&d, "min", *min);
            num(&d, "max", *max);
            num(&d, "got", *value);
        }
        PlanError::WallTooShort { length, min } => {
            num(&d, "length", *length);
            num(&d, "min", *min);
        }
        PlanError::RectangleTooSmall { width, height, min } => {
            num(&d, "width", *width);
            num(&d, "height", *height);
            num(&d, "min", *min);
        }
        PlanError::OverlappingWall { edge } => num(&d, "edge", *edge as f64),
        PlanError::InvalidId { kind, id } => {
            set_kv(&d, "kind", &JsValue::from_str(kind));
            num(&d, "id", *id as f64);
        }
        PlanError::InvalidStory(i) => num(&d, "story", *i as f64),
        PlanError::UnknownPlacementKind(s) => set_kv(&d, "kind", &JsValue::from_str(s)),
        PlanError::InvalidConfig(_) | PlanError::Json(_) => {}
    }
    err(e.code(), e.to_string(), Some(d.into()))
}

pub fn result<T: Into<JsValue>>(r: floorplan::Result<T>) -> JsValue {
    match r {
        Ok(v) => ok(v.into()),
        Err(e) => from_plan(&e),
    }
}

#[inline]
pub fn non_finite(param: &'static str) -> JsValue {
    from_plan(&PlanError::NonFinite { param, value: f64::NAN })
}

#[inline]
pub fn invalid_id(kind: &'static str, id: u32) -> JsValue {
    from_plan(&PlanError::InvalidId { kind, id })
}
