use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::algorithms::picking::Hit;
use crate::algorithms::snapping::Constrained;
use crate::algorithms::zones::{reconcile_zones, ZoneAllocator, ZoneDefaults, ZoneDiff};
use crate::config::PlanConfig;
use crate::error::{PlanError, Result};
use crate::geometry::limits::{check_coord, check_rectangle, check_wall_length};
use crate::geometry::tolerance::{angle_delta, EPS_COLLINEAR, EPS_LEN, EPS_OVERLAP};
use crate::model::{
    EdgeId, FaceId, PlacementId, PlacementKind, ZoneAssignment, ZoneId, ZoneUpdate,
};
use crate::viewport::Viewport;
use crate::Geometry;

/// One floor: its wall graph and the zones attached to its rooms.
#[derive(Clone, Debug)]
pub struct Story {
    pub name: String,
    /// Floor level above ground (m).
    pub elevation: f64,
    pub height: f64,
    pub(crate) geometry: Geometry,
    pub(crate) zones: BTreeMap<FaceId, ZoneAssignment>,
}

impl Story {
    fn new(name: String, elevation: f64, height: f64) -> Self {
        Story { name, elevation, height, geometry: Geometry::new(), zones: BTreeMap::new() }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn zone(&self, face: FaceId) -> Option<&ZoneAssignment> {
        self.zones.get(&face)
    }

    /// Zones ordered by zone id.
    pub fn zones(&self) -> Vec<&ZoneAssignment> {
        let mut out: Vec<&ZoneAssignment> = self.zones.values().collect();
        out.sort_by_key(|z| z.zone_id);
        out
    }

    fn max_zone_id(&self) -> ZoneId {
        self.zones.values().map(|z| z.zone_id).max().unwrap_or(0)
    }
}

/// Validating owner of all stories.
///
/// Every topology edit runs to completion here: the wall graph is mutated, faces are rebuilt
/// and zones are reconciled before the call returns.
#[derive(Clone, Debug)]
pub struct Building {
    stories: Vec<Story>,
    active: usize,
    config: PlanConfig,
    alloc: ZoneAllocator,
}

impl Default for Building {
    fn default() -> Self {
        Building::new(PlanConfig::default())
    }
}

impl Building {
    /// Starts with a single ground story.
    pub fn new(config: PlanConfig) -> Self {
        let ground = Story::new("Level 1".to_string(), 0.0, config.story_height);
        Building { stories: vec![ground], active: 0, config, alloc: ZoneAllocator::default() }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Replaces the tunables. Existing walls and zones are kept as they are.
    pub fn set_config(&mut self, config: PlanConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    // Stories
    /// Appends a story on top of the current top one and returns its index.
    pub fn add_story(&mut self, name: &str, height: f64) -> Result<usize> {
        if !height.is_finite() {
            return Err(PlanError::NonFinite { param: "height", value: height });
        }
        if height <= 0.0 {
            return Err(PlanError::OutOfRange { param: "height", value: height, min: 0.0, max: f64::MAX });
        }
        let elevation = self.stories.last().map_or(0.0, |s| s.elevation + s.height);
        self.stories.push(Story::new(name.to_string(), elevation, height));
        debug!(story = self.stories.len() - 1, elevation, "story added");
        Ok(self.stories.len() - 1)
    }

    /// Drops a story and restacks the elevations above it. The last remaining story stays.
    pub fn remove_story(&mut self, index: usize) -> Result<()> {
        if index >= self.stories.len() || self.stories.len() == 1 {
            return Err(PlanError::InvalidStory(index));
        }
        self.stories.remove(index);
        let mut elevation = 0.0;
        for s in &mut self.stories {
            s.elevation = elevation;
            elevation += s.height;
        }
        if self.active > index || self.active >= self.stories.len() {
            self.active = self.active.saturating_sub(1);
        }
        debug!(story = index, "story removed");
        Ok(())
    }

    pub fn set_active_story(&mut self, index: usize) -> Result<()> {
        if index >= self.stories.len() {
            return Err(PlanError::InvalidStory(index));
        }
        self.active = index;
        Ok(())
    }

    pub fn active_story_index(&self) -> usize {
        self.active
    }

    pub fn active_story(&self) -> &Story {
        &self.stories[self.active]
    }

    fn active_story_mut(&mut self) -> &mut Story {
        &mut self.stories[self.active]
    }

    pub fn story(&self, index: usize) -> Option<&Story> {
        self.stories.get(index)
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// Wall graph of the active story.
    pub fn geometry(&self) -> &Geometry {
        &self.active_story().geometry
    }

    // Walls
    /// Validates and adds a wall on the active story using the configured defaults.
    pub fn add_wall(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<EdgeId> {
        let res = self.try_add_wall(x1, y1, x2, y2);
        if let Err(e) = &res {
            warn!(code = e.code(), "wall rejected: {e}");
        }
        res
    }

    fn try_add_wall(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<EdgeId> {
        self.validate_wall((x1, y1), (x2, y2))?;
        let (h, t, snap) = (self.config.wall_height, self.config.wall_thickness, self.config.snap_threshold);
        let min = self.config.min_wall_length;
        let id = self
            .active_story_mut()
            .geometry
            .add_wall(x1, y1, x2, y2, h, t, snap)
            .ok_or(PlanError::WallTooShort { length: 0.0, min })?;
        self.sync();
        Ok(id)
    }

    /// Axis-aligned room from a corner and a signed drag extent. One face rebuild for all four walls.
    pub fn add_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<Vec<EdgeId>> {
        let res = self.try_add_rectangle(x, y, width, height);
        if let Err(e) = &res {
            warn!(code = e.code(), "rectangle rejected: {e}");
        }
        res
    }

    fn try_add_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<Vec<EdgeId>> {
        check_coord("x", x)?;
        check_coord("y", y)?;
        check_coord("width", width)?;
        check_coord("height", height)?;
        check_rectangle(width, height, self.config.min_rect_side)?;
        let (x0, x1) = if width < 0.0 { (x + width, x) } else { (x, x + width) };
        let (y0, y1) = if height < 0.0 { (y + height, y) } else { (y, y + height) };
        let sides = [
            ((x0, y0), (x1, y0)),
            ((x1, y0), (x1, y1)),
            ((x1, y1), (x0, y1)),
            ((x0, y1), (x0, y0)),
        ];
        for (a, b) in sides {
            self.validate_wall(a, b)?;
        }
        let (h, t, snap) = (self.config.wall_height, self.config.wall_thickness, self.config.snap_threshold);
        let min = self.config.min_rect_side;
        let g = &mut self.active_story_mut().geometry;
        let first_new = g.edges.len() as EdgeId;
        let mut ids: Vec<EdgeId> = Vec::with_capacity(4);
        for &(a, b) in &sides {
            if let Some(id) = g.add_wall(a.0, a.1, b.0, b.1, h, t, snap) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        if ids.len() < 4 {
            // corners merged under snapping; undo the walls this call created
            for &id in ids.iter().filter(|&&id| id >= first_new) {
                g.remove_edge(id);
            }
            return Err(PlanError::RectangleTooSmall { width: x1 - x0, height: y1 - y0, min });
        }
        self.sync();
        Ok(ids)
    }

    /// Rejects non-finite input, walls shorter than the configured minimum (before and after
    /// endpoint snapping) and walls that would run along any part of an existing wall.
    /// Re-adding an existing wall passes.
    fn validate_wall(&self, a: (f64, f64), b: (f64, f64)) -> Result<()> {
        check_coord("x1", a.0)?;
        check_coord("y1", a.1)?;
        check_coord("x2", b.0)?;
        check_coord("y2", b.1)?;
        let min = self.config.min_wall_length;
        check_wall_length((b.0 - a.0).hypot(b.1 - a.1), min)?;

        let g = self.geometry();
        let snap = self.config.snap_threshold;
        let va = g.find_nearest_vertex(a.0, a.1, snap);
        let vb = g.find_nearest_vertex(b.0, b.1, snap);
        let pa = va.and_then(|v| g.get_vertex(v)).unwrap_or(a);
        let pb = vb.and_then(|v| g.get_vertex(v)).unwrap_or(b);
        check_wall_length((pb.0 - pa.0).hypot(pb.1 - pa.1), min)?;
        if let (Some(u), Some(v)) = (va, vb) {
            if g.edge_between(u, v).is_some() {
                return Ok(());
            }
        }
        for (vid, from, to) in [(va, pa, pb), (vb, pb, pa)] {
            let Some(vid) = vid else { continue };
            let Some(vertex) = g.vertex(vid) else { continue };
            let dir = (to.1 - from.1).atan2(to.0 - from.0);
            for &eid in &vertex.edges {
                let Some(other) = g.edge(eid).and_then(|e| e.other(vid)).and_then(|w| g.get_vertex(w)) else {
                    continue;
                };
                let ang = (other.1 - from.1).atan2(other.0 - from.0);
                if angle_delta(dir, ang) <= EPS_OVERLAP {
                    return Err(PlanError::OverlappingWall { edge: eid });
                }
            }
        }
        match collinear_overlap(g, pa, pb) {
            Some(edge) => Err(PlanError::OverlappingWall { edge }),
            None => Ok(()),
        }
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        if !self.active_story_mut().geometry.remove_edge(id) {
            return false;
        }
        self.sync();
        true
    }

    /// Removes every wall, placement and zone on the active story.
    pub fn clear_story(&mut self) {
        self.active_story_mut().geometry.clear();
        self.sync();
    }

    /// Rebuilds faces on the active story and reconciles its zones.
    pub fn sync(&mut self) -> ZoneDiff {
        let live_max = self.stories.iter().map(Story::max_zone_id).max().unwrap_or(0);
        let Building { stories, active, config, alloc } = self;
        let Some(story) = stories.get_mut(*active) else {
            return ZoneDiff::default();
        };
        story.geometry.rebuild_faces();
        let defaults = ZoneDefaults {
            temperature: config.default_temperature,
            story_height: story.height,
            palette: &config.zone_palette,
        };
        reconcile_zones(&story.geometry, &mut story.zones, alloc, live_max, defaults)
    }

    // Zones
    /// Applies the set fields of `update`. Non-finite or non-positive numbers reject the whole edit.
    pub fn update_zone(&mut self, face: FaceId, update: ZoneUpdate) -> bool {
        let bad = |v: Option<f64>| v.is_some_and(|v| !(v.is_finite() && v > 0.0));
        if bad(update.temperature) || bad(update.volume) {
            return false;
        }
        let Some(z) = self.active_story_mut().zones.get_mut(&face) else {
            return false;
        };
        if let Some(name) = update.name {
            z.name = name;
        }
        if let Some(t) = update.temperature {
            z.temperature = t;
        }
        if let Some(v) = update.volume {
            z.volume = v;
        }
        if let Some(c) = update.color {
            z.color = c;
        }
        true
    }

    pub fn zone(&self, face: FaceId) -> Option<&ZoneAssignment> {
        self.active_story().zone(face)
    }

    pub fn zones(&self) -> Vec<&ZoneAssignment> {
        self.active_story().zones()
    }

    pub fn zone_for_point(&self, x: f64, y: f64) -> Option<&ZoneAssignment> {
        let face = self.geometry().face_at(x, y)?;
        self.zone(face)
    }

    // Placements
    pub fn add_placement(&mut self, edge: EdgeId, alpha: f64, kind: PlacementKind) -> Result<PlacementId> {
        self.active_story_mut()
            .geometry
            .add_placement(edge, alpha, kind)
            .ok_or(PlanError::invalid_edge(edge))
    }

    pub fn update_placement(
        &mut self,
        id: PlacementId,
        alpha: Option<f64>,
        kind: Option<PlacementKind>,
        configured: Option<bool>,
    ) -> Result<()> {
        if self.active_story_mut().geometry.update_placement(id, alpha, kind, configured) {
            Ok(())
        } else {
            Err(PlanError::invalid_placement(id))
        }
    }

    pub fn remove_placement(&mut self, id: PlacementId) -> bool {
        self.active_story_mut().geometry.remove_placement(id)
    }

    // Interaction
    pub fn hit_test(&self, x: f64, y: f64, viewport: &Viewport) -> Option<Hit> {
        self.geometry().hit_test(x, y, viewport, self.config.hit)
    }

    pub fn constrain_orthogonal(&self, start_x: f64, start_y: f64, mouse_x: f64, mouse_y: f64) -> Constrained {
        self.geometry().constrain_orthogonal(
            start_x,
            start_y,
            mouse_x,
            mouse_y,
            self.config.grid_size,
            self.config.snap_threshold,
        )
    }

    /// Vertex the cursor would snap to at the configured threshold.
    pub fn snap_vertex(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let g = self.geometry();
        g.find_nearest_vertex(x, y, self.config.snap_threshold).and_then(|v| g.get_vertex(v))
    }
}

/// First existing edge lying on the line through `a`-`b` and sharing a stretch of positive length with it.
fn collinear_overlap(g: &Geometry, a: (f64, f64), b: (f64, f64)) -> Option<EdgeId> {
    let len = (b.0 - a.0).hypot(b.1 - a.1);
    if len <= EPS_LEN {
        return None;
    }
    let (dx, dy) = ((b.0 - a.0) / len, (b.1 - a.1) / len);
    let off = |p: (f64, f64)| (p.0 - a.0) * dy - (p.1 - a.1) * dx;
    let along = |p: (f64, f64)| (p.0 - a.0) * dx + (p.1 - a.1) * dy;
    g.edges().map(|(id, _)| id).find(|&eid| {
        let Some((p, q)) = g.edge_endpoints(eid) else { return false };
        if off(p).abs() > EPS_COLLINEAR || off(q).abs() > EPS_COLLINEAR {
            return false;
        }
        let (tp, tq) = (along(p), along(q));
        tp.max(tq).min(len) - tp.min(tq).max(0.0) > EPS_COLLINEAR
    })
}
