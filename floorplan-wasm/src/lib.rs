use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

/// Browser handle on a multi-story plan.
#[wasm_bindgen]
pub struct FloorPlan {
    pub(crate) inner: floorplan::Building,
    pub(crate) debug: bool,
}

/// Browser handle on the world/screen mapping of one canvas.
#[wasm_bindgen]
pub struct Viewport {
    pub(crate) inner: floorplan::Viewport,
}

impl FloorPlan {
    pub fn rs_new(config: floorplan::PlanConfig) -> FloorPlan {
        FloorPlan { inner: floorplan::Building::new(config), debug: false }
    }
    pub fn rs_topo_version(&self) -> u64 {
        self.inner.geometry().topo_version()
    }
}
