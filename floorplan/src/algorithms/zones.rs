use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DEFAULT_PALETTE;
use crate::model::{Color, FaceId, ZoneAssignment, ZoneId};
use crate::Geometry;

/// Building-wide zone id and palette state. Ids only ever grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneAllocator {
    high_water: ZoneId,
    palette_cursor: usize,
}

impl ZoneAllocator {
    /// Issues `1 + max(everything issued so far, largest id still alive)`.
    pub fn next_id(&mut self, live_max: ZoneId) -> ZoneId {
        let id = self.high_water.max(live_max).saturating_add(1);
        self.high_water = id;
        id
    }

    pub fn next_color(&mut self, palette: &[Color]) -> Color {
        let color = if palette.is_empty() {
            DEFAULT_PALETTE[self.palette_cursor % DEFAULT_PALETTE.len()]
        } else {
            palette[self.palette_cursor % palette.len()]
        };
        self.palette_cursor = self.palette_cursor.wrapping_add(1);
        color
    }

    pub fn high_water(&self) -> ZoneId {
        self.high_water
    }
}

/// Values a freshly observed room starts with.
#[derive(Clone, Copy, Debug)]
pub struct ZoneDefaults<'a> {
    pub temperature: f64,
    pub story_height: f64,
    pub palette: &'a [Color],
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ZoneDiff {
    pub created: Vec<(FaceId, ZoneId)>,
    pub dropped: Vec<(FaceId, ZoneId)>,
    pub kept: usize,
}

impl ZoneDiff {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.dropped.is_empty()
    }
}

/// Brings `zones` in line with the faces currently in `g`.
///
/// Assignments whose face vanished are dropped, new faces get a fresh zone, and assignments
/// for faces that survived are left exactly as they were. `live_max` is the largest zone id
/// alive anywhere in the building.
pub fn reconcile_zones(
    g: &Geometry,
    zones: &mut BTreeMap<FaceId, ZoneAssignment>,
    alloc: &mut ZoneAllocator,
    live_max: ZoneId,
    defaults: ZoneDefaults<'_>,
) -> ZoneDiff {
    let present: HashSet<FaceId> = g.faces().iter().map(|f| f.id).collect();
    let mut diff = ZoneDiff::default();

    zones.retain(|fid, z| {
        if present.contains(fid) {
            true
        } else {
            diff.dropped.push((*fid, z.zone_id));
            false
        }
    });
    diff.kept = zones.len();

    for f in g.faces() {
        if zones.contains_key(&f.id) {
            continue;
        }
        let zone_id = alloc.next_id(live_max);
        let area = g.face_area(f.id).unwrap_or(0.0);
        zones.insert(
            f.id,
            ZoneAssignment {
                face_id: f.id,
                zone_id,
                name: format!("Zone {zone_id}"),
                temperature: defaults.temperature,
                volume: area * defaults.story_height,
                color: alloc.next_color(defaults.palette),
            },
        );
        diff.created.push((f.id, zone_id));
    }

    if !diff.is_empty() {
        debug!(
            created = diff.created.len(),
            dropped = diff.dropped.len(),
            kept = diff.kept,
            high_water = alloc.high_water(),
            "zones reconciled"
        );
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(g: &mut Geometry, x0: f64, y0: f64, x1: f64, y1: f64) {
        for (a, b, c, d) in [(x0, y0, x1, y0), (x1, y0, x1, y1), (x1, y1, x0, y1), (x0, y1, x0, y0)] {
            g.add_wall(a, b, c, d, 3.0, 0.2, 0.1);
        }
        g.rebuild_faces();
    }

    fn defaults() -> ZoneDefaults<'static> {
        ZoneDefaults { temperature: 293.15, story_height: 3.0, palette: &DEFAULT_PALETTE }
    }

    #[test]
    fn new_face_gets_zone_with_volume() {
        let mut g = Geometry::new();
        rect(&mut g, 0.0, 0.0, 5.0, 4.0);
        let mut zones = BTreeMap::new();
        let mut alloc = ZoneAllocator::default();
        let diff = reconcile_zones(&g, &mut zones, &mut alloc, 0, defaults());
        assert_eq!(diff.created.len(), 1);
        let z = zones.values().next().expect("zone");
        assert_eq!(z.zone_id, 1);
        assert_eq!(z.name, "Zone 1");
        assert_eq!(z.volume, 60.0);
        assert_eq!(z.color, DEFAULT_PALETTE[0]);
    }

    #[test]
    fn surviving_zone_keeps_user_edits() {
        let mut g = Geometry::new();
        rect(&mut g, 0.0, 0.0, 5.0, 4.0);
        let mut zones = BTreeMap::new();
        let mut alloc = ZoneAllocator::default();
        reconcile_zones(&g, &mut zones, &mut alloc, 0, defaults());
        if let Some(z) = zones.values_mut().next() {
            z.name = "Kitchen".into();
            z.temperature = 295.0;
        }
        // unrelated wall elsewhere
        g.add_wall(20.0, 0.0, 25.0, 0.0, 3.0, 0.2, 0.1);
        g.rebuild_faces();
        let diff = reconcile_zones(&g, &mut zones, &mut alloc, 1, defaults());
        assert!(diff.is_empty());
        assert_eq!(diff.kept, 1);
        let z = zones.values().next().expect("zone");
        assert_eq!((z.name.as_str(), z.temperature, z.zone_id), ("Kitchen", 295.0, 1));
    }

    #[test]
    fn ids_are_not_reused_after_drop() {
        let mut alloc = ZoneAllocator::default();
        assert_eq!(alloc.next_id(0), 1);
        assert_eq!(alloc.next_id(0), 2);
        // zone 2 dropped, only zone 1 alive
        assert_eq!(alloc.next_id(1), 3);
        assert_eq!(alloc.next_id(10), 11);
    }

    #[test]
    fn palette_wraps_round_robin() {
        let mut alloc = ZoneAllocator::default();
        let palette = [Color::rgb(1, 0, 0), Color::rgb(0, 1, 0)];
        let seq: Vec<Color> = (0..3).map(|_| alloc.next_color(&palette)).collect();
        assert_eq!(seq, vec![palette[0], palette[1], palette[0]]);
    }
}
