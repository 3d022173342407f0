use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlanError;

pub type VertexId = u32;
pub type EdgeId = u32;
pub type PlacementId = u32;
pub type ZoneId = u32;

/// Identity of a detected room, derived only from the set of its boundary edge ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceId(pub u32);

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{:08x}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    /// Incident edges; kept in sync with [`Edge::vertices`].
    pub edges: Vec<EdgeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirection {
    /// vertices[0] -> vertices[1]
    Forward,
    Reverse,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    /// Canonical order: smaller vertex id first.
    pub vertices: [VertexId; 2],
    pub face_ids: Vec<FaceId>,
    pub height: f64,
    pub thickness: f64,
    pub is_exterior: bool,
}

impl Edge {
    pub fn connects(&self, a: VertexId, b: VertexId) -> bool {
        (self.vertices[0] == a && self.vertices[1] == b)
            || (self.vertices[0] == b && self.vertices[1] == a)
    }

    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if self.vertices[0] == v {
            Some(self.vertices[1])
        } else if self.vertices[1] == v {
            Some(self.vertices[0])
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Face {
    pub id: FaceId,
    /// Counter-clockwise boundary walk.
    pub boundary: Vec<(EdgeId, EdgeDirection)>,
}

impl Face {
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.boundary.iter().any(|(e, _)| *e == edge)
    }

    pub fn sorted_edge_ids(&self) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self.boundary.iter().map(|(e, _)| *e).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementKind {
    Door,
    Window,
    Opening,
    Fan,
    Duct,
    Damper,
    Filter,
    Crack,
    SelfRegulatingVent,
    CheckValve,
}

impl PlacementKind {
    pub const ALL: [PlacementKind; 10] = [
        PlacementKind::Door,
        PlacementKind::Window,
        PlacementKind::Opening,
        PlacementKind::Fan,
        PlacementKind::Duct,
        PlacementKind::Damper,
        PlacementKind::Filter,
        PlacementKind::Crack,
        PlacementKind::SelfRegulatingVent,
        PlacementKind::CheckValve,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlacementKind::Door => "door",
            PlacementKind::Window => "window",
            PlacementKind::Opening => "opening",
            PlacementKind::Fan => "fan",
            PlacementKind::Duct => "duct",
            PlacementKind::Damper => "damper",
            PlacementKind::Filter => "filter",
            PlacementKind::Crack => "crack",
            PlacementKind::SelfRegulatingVent => "self_regulating_vent",
            PlacementKind::CheckValve => "check_valve",
        }
    }

    /// Flow element family the airflow solver models this opening with.
    pub fn flow_element(self) -> &'static str {
        match self {
            PlacementKind::Door | PlacementKind::Opening => "TwoWayFlow",
            PlacementKind::Window
            | PlacementKind::Crack
            | PlacementKind::SelfRegulatingVent
            | PlacementKind::CheckValve => "PowerLawOrifice",
            PlacementKind::Fan => "Fan",
            PlacementKind::Duct => "Duct",
            PlacementKind::Damper => "Damper",
            PlacementKind::Filter => "Filter",
        }
    }
}

impl fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase().replace('-', "_");
        PlacementKind::ALL
            .into_iter()
            .find(|k| k.as_str() == tag)
            .ok_or_else(|| PlanError::UnknownPlacementKind(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub edge: EdgeId,
    /// Position along the edge from vertices[0], within [ALPHA_MIN, ALPHA_MAX].
    pub alpha: f64,
    pub kind: PlacementKind,
    pub configured: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneAssignment {
    pub face_id: FaceId,
    pub zone_id: ZoneId,
    pub name: String,
    /// Kelvin
    pub temperature: f64,
    /// m^3
    pub volume: f64,
    pub color: Color,
}

/// Partial edit of a zone; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneUpdate {
    pub name: Option<String>,
    pub temperature: Option<f64>,
    pub volume: Option<f64>,
    pub color: Option<Color>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_kind_round_trips_tags() {
        for k in PlacementKind::ALL {
            assert_eq!(k.as_str().parse::<PlacementKind>().ok(), Some(k));
        }
        assert_eq!("Self-Regulating-Vent".parse::<PlacementKind>().ok(), Some(PlacementKind::SelfRegulatingVent));
        assert!(matches!("skylight".parse::<PlacementKind>(), Err(PlanError::UnknownPlacementKind(_))));
    }

    #[test]
    fn edge_other_endpoint() {
        let e = Edge { vertices: [2, 7], face_ids: vec![], height: 3.0, thickness: 0.2, is_exterior: true };
        assert_eq!(e.other(2), Some(7));
        assert_eq!(e.other(7), Some(2));
        assert_eq!(e.other(3), None);
        assert!(e.connects(7, 2));
    }
}
