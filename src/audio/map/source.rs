use bevy::math::DVec2;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::audio::geometry::Segment;

/// Two opposite viewport corners. `origin` anchors the zone grid; the extent
/// is the absolute difference between the corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub origin: DVec2,
    pub corner: DVec2,
}

impl Viewport {
    pub fn new(origin: DVec2, corner: DVec2) -> Self {
        Self { origin, corner }
    }

    pub fn size(&self) -> DVec2 {
        (self.corner - self.origin).abs()
    }
}

impl From<[DVec2; 2]> for Viewport {
    fn from([origin, corner]: [DVec2; 2]) -> Self {
        Self { origin, corner }
    }
}

/// Raw map data handed over by the ingestion step: wall segments, points of
/// interest (emitters/listeners) and the viewport corners.
///
/// Insert or replace this resource to (re)build the zoned map.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MapSource {
    pub walls: Vec<Segment>,
    pub points: Vec<DVec2>,
    pub viewport: Viewport,
}

impl MapSource {
    pub fn new(walls: Vec<Segment>, points: Vec<DVec2>, viewport: impl Into<Viewport>) -> Self {
        Self {
            walls,
            points,
            viewport: viewport.into(),
        }
    }

    /// Build from closed polygons: each ring contributes one wall per edge,
    /// including the closing edge from its last vertex back to its first.
    pub fn from_polygons<P>(polygons: P, points: Vec<DVec2>, viewport: impl Into<Viewport>) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<[DVec2]>,
    {
        let mut walls = Vec::new();
        for polygon in polygons {
            let ring = polygon.as_ref();
            for (j, &start) in ring.iter().enumerate() {
                walls.push(Segment::new(start, ring[(j + 1) % ring.len()]));
            }
        }
        Self::new(walls, points, viewport)
    }

    pub fn from_ron(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// Zone grid origin.
    pub fn base(&self) -> DVec2 {
        self.viewport.origin
    }

    /// Absolute viewport extent on each axis.
    pub fn size(&self) -> DVec2 {
        self.viewport.size()
    }
}
