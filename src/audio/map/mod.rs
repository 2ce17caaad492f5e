use std::fmt;

use bevy::math::DVec2;
use bevy::prelude::*;
use earshot_macros::profile;
use serde::{Deserialize, Serialize};

use super::geometry::{self, Segment};
use super::graph::GraphError;

mod source;
mod zone;


pub use source::{MapSource, Viewport};
pub use zone::Zone;

/// Upper bound on the number of zones a single map may hold.
pub const MAX_ZONES: usize = 1 << 20;

/// Zone counts must be finite, and neither one axis nor the whole grid may
/// exceed [`MAX_ZONES`]. Checked in f64 so the product cannot overflow.
fn within_zone_limit(counts: DVec2) -> bool {
    let limit = MAX_ZONES as f64;
    // NaN fails every comparison, so it is rejected along with infinity
    counts.x <= limit && counts.y <= limit && counts.x * counts.y <= limit
}

/// How a wall is matched against a zone's coverage circle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallFilter {
    /// Endpoint test plus distance to the wall's infinite line. May keep walls
    /// whose extension, but not the wall itself, passes near the zone.
    #[default]
    LineApproximation,
    /// Distance to the closest point of the finite wall segment.
    ClampedSegment,
}

impl WallFilter {
    pub fn matches(self, center: DVec2, radius: f64, wall: &Segment) -> bool {
        match self {
            WallFilter::LineApproximation => geometry::segment_near_circle(center, radius, wall),
            WallFilter::ClampedSegment => geometry::segment_within_circle(center, radius, wall),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MapError {
    /// Speaking radius must be finite and strictly positive.
    InvalidSpeakingRadius(f64),
    /// The viewport extent is not finite or would need more than
    /// [`MAX_ZONES`] zones at this speaking radius.
    ViewportTooLarge { zones_x: f64, zones_y: f64 },
    Graph(GraphError),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::InvalidSpeakingRadius(radius) => {
                write!(f, "speaking radius must be finite and positive, got {}", radius)
            }
            MapError::ViewportTooLarge { zones_x, zones_y } => write!(
                f,
                "viewport needs {} x {} zones, limit is {}",
                zones_x, zones_y, MAX_ZONES
            ),
            MapError::Graph(e) => write!(f, "zone graph construction failed: {}", e),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Graph(e) => Some(e),
            MapError::InvalidSpeakingRadius(_) | MapError::ViewportTooLarge { .. } => None,
        }
    }
}

impl From<GraphError> for MapError {
    fn from(e: GraphError) -> Self {
        MapError::Graph(e)
    }
}

/// Result of a point-to-point query inside one zone.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioRoute {
    /// Travel distance around walls.
    pub distance: f64,
    /// Points visited, from the source to the destination inclusive.
    pub waypoints: Vec<DVec2>,
}

/// The environment split into a grid of overlapping zones, each with its own
/// line-of-sight graph.
///
/// # Layout
///
/// - **Spacing:** zone centers sit `zone_interval = speaking_radius / 2` apart,
///   starting at the viewport origin.
/// - **Coverage:** each zone includes walls and points within
///   `speaking_radius + zone_interval` of its center, so neighbors overlap and
///   a source moving across a grid line does not lose nearby geometry.
/// - **Grid:** `zones[x][y]`, with `floor(viewport_size / zone_interval)`
///   zones per axis.
///
/// Built once from a [`MapSource`] and read-only afterwards; re-ingesting a map
/// means building a new one.
///
/// # Example
///
/// ```rust
/// use bevy::math::DVec2;
/// use earshot::audio::map::{MapSource, WallFilter, ZonedAudioMap};
///
/// let source = MapSource::new(
///     Vec::new(),
///     vec![DVec2::new(5.0, 5.0), DVec2::new(15.0, 5.0)],
///     [DVec2::ZERO, DVec2::new(40.0, 40.0)],
/// );
/// let map = ZonedAudioMap::build(10.0, &source, WallFilter::default()).unwrap();
/// let route = map.route(DVec2::new(5.0, 5.0), DVec2::new(15.0, 5.0)).unwrap().unwrap();
/// assert_eq!(route.distance, 10.0);
/// ```
#[derive(Resource, Clone, Debug)]
pub struct ZonedAudioMap {
    base: DVec2,
    zone_interval: f64,
    speaking_radius: f64,
    zones: Vec<Vec<Zone>>,
}

impl ZonedAudioMap {
    #[profile]
    pub fn build(
        speaking_radius: f64,
        source: &MapSource,
        wall_filter: WallFilter,
    ) -> Result<Self, MapError> {
        if !speaking_radius.is_finite() || speaking_radius <= 0.0 {
            return Err(MapError::InvalidSpeakingRadius(speaking_radius));
        }

        let zone_interval = speaking_radius / 2.0;
        let coverage = speaking_radius + zone_interval;
        let base = source.base();
        let counts = (source.size() / zone_interval).floor();
        if !within_zone_limit(counts) {
            return Err(MapError::ViewportTooLarge {
                zones_x: counts.x,
                zones_y: counts.y,
            });
        }
        let (count_x, count_y) = (counts.x as usize, counts.y as usize);

        info!(
            "[AUDIO MAP] Building {} x {} zones (interval {}, coverage {}), {} walls, {} points",
            count_x,
            count_y,
            zone_interval,
            coverage,
            source.walls.len(),
            source.points.len()
        );

        let mut zones = Vec::with_capacity(count_x);
        for i in 0..count_x {
            let mut column = Vec::with_capacity(count_y);
            for j in 0..count_y {
                let center = base + DVec2::new(i as f64, j as f64) * zone_interval;
                let zone = Zone::build(
                    (i, j),
                    center,
                    coverage,
                    &source.walls,
                    &source.points,
                    wall_filter,
                )?;
                crate::profile_log!(
                    "[AUDIO MAP] Zone ({}, {}): {} walls, {} nodes, {} edges",
                    i,
                    j,
                    zone.walls().len(),
                    zone.graph().len(),
                    zone.graph().edge_count()
                );
                column.push(zone);
            }
            zones.push(column);
        }

        let map = Self {
            base,
            zone_interval,
            speaking_radius,
            zones,
        };
        if map.zone_count() == 0 {
            warn!("[AUDIO MAP] Viewport is smaller than one zone interval; no zones were built");
        }
        Ok(map)
    }

    pub fn base(&self) -> DVec2 {
        self.base
    }

    pub fn zone_interval(&self) -> f64 {
        self.zone_interval
    }

    pub fn speaking_radius(&self) -> f64 {
        self.speaking_radius
    }

    /// Inclusion radius of every zone.
    pub fn coverage(&self) -> f64 {
        self.speaking_radius + self.zone_interval
    }

    /// Number of zones along (x, y).
    pub fn zone_counts(&self) -> (usize, usize) {
        let x = self.zones.len();
        let y = self.zones.first().map_or(0, Vec::len);
        (x, y)
    }

    pub fn zone_count(&self) -> usize {
        self.zones.iter().map(Vec::len).sum()
    }

    pub fn zone(&self, x: usize, y: usize) -> Option<&Zone> {
        self.zones.get(x)?.get(y)
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().flatten()
    }

    /// Grid index of the zone owning `point`, or None outside the grid.
    pub fn zone_index_for_point(&self, point: DVec2) -> Option<(usize, usize)> {
        let index = ((point - self.base) / self.zone_interval).floor();
        let (count_x, count_y) = self.zone_counts();
        let in_x = index.x >= 0.0 && index.x < count_x as f64;
        let in_y = index.y >= 0.0 && index.y < count_y as f64;
        // Written as a positive check so NaN coordinates fall outside
        if !(in_x && in_y) {
            return None;
        }
        Some((index.x as usize, index.y as usize))
    }

    /// The single zone owning `point` by grid bucket.
    ///
    /// Neighboring zones may also contain `point` as a node; this returns only
    /// the one whose cell the point falls in.
    pub fn zone_for_point(&self, point: DVec2) -> Option<&Zone> {
        let (x, y) = self.zone_index_for_point(point)?;
        self.zone(x, y)
    }

    /// Shortest unobstructed route between two points of interest, resolved in
    /// the zone owning `from`.
    ///
    /// `Ok(None)` when `from` lies outside the grid, either point is not a node
    /// of that zone, or walls leave no route inside the zone.
    pub fn route(&self, from: DVec2, to: DVec2) -> Result<Option<AudioRoute>, GraphError> {
        let Some(zone) = self.zone_for_point(from) else {
            return Ok(None);
        };
        let (Some(source), Some(destination)) = (zone.node_at(from), zone.node_at(to)) else {
            return Ok(None);
        };
        if source == destination {
            return Ok(Some(AudioRoute {
                distance: 0.0,
                waypoints: vec![from],
            }));
        }

        let tree = zone.graph().compute_spt(source)?;
        let path = tree.path_to(destination);
        let (Some(path), Some(distance)) = (path, tree.distance_to(destination)) else {
            return Ok(None);
        };

        let mut waypoints = Vec::with_capacity(path.len() + 1);
        waypoints.push(from);
        waypoints.extend(path.iter().rev().filter_map(|&id| zone.graph().value(id).copied()));
        Ok(Some(AudioRoute { distance, waypoints }))
    }
}
