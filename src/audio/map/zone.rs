use bevy::math::DVec2;
use smallvec::SmallVec;

use crate::audio::geometry::{self, Segment};
use crate::audio::graph::{Graph, GraphError, NodeId};

use super::WallFilter;

/// One cell of the zoned map: the walls near it and a line-of-sight graph
/// over the points of interest within its coverage radius.
///
/// Zones overlap their neighbors, so a point of interest is usually a node
/// in several zones. Each zone owns its graph outright.
#[derive(Clone, Debug)]
pub struct Zone {
    pub(super) index: (usize, usize),
    pub(super) center: DVec2,
    pub(super) walls: SmallVec<[Segment; 8]>,
    pub(super) graph: Graph<DVec2>,
}

impl Zone {
    /// Select walls and points within `coverage` of `center` and connect every
    /// ordered pair of points that can see each other.
    pub(super) fn build(
        index: (usize, usize),
        center: DVec2,
        coverage: f64,
        walls: &[Segment],
        points: &[DVec2],
        wall_filter: WallFilter,
    ) -> Result<Self, GraphError> {
        let walls: SmallVec<[Segment; 8]> = walls
            .iter()
            .filter(|wall| wall_filter.matches(center, coverage, wall))
            .copied()
            .collect();

        let mut graph = Graph::new();
        let nodes: Vec<NodeId> = points
            .iter()
            .filter(|&&point| geometry::distance(point, center) <= coverage)
            .map(|&point| graph.add_node(point))
            .collect();

        for &from in &nodes {
            for &to in &nodes {
                if from == to {
                    continue;
                }
                let (Some(&a), Some(&b)) = (graph.value(from), graph.value(to)) else {
                    continue;
                };
                let sight_line = Segment::new(a, b);
                if walls.iter().any(|wall| geometry::segments_intersect(wall, &sight_line)) {
                    continue;
                }
                graph.add_directed_edge(from, to, geometry::distance(a, b))?;
            }
        }

        Ok(Self {
            index,
            center,
            walls,
            graph,
        })
    }

    /// Grid position as (x index, y index).
    pub fn index(&self) -> (usize, usize) {
        self.index
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn walls(&self) -> &[Segment] {
        &self.walls
    }

    pub fn graph(&self) -> &Graph<DVec2> {
        &self.graph
    }

    /// The node sitting exactly at `point`, if that point of interest belongs
    /// to this zone.
    pub fn node_at(&self, point: DVec2) -> Option<NodeId> {
        self.graph
            .nodes()
            .iter()
            .find(|node| *node.value() == point)
            .map(|node| node.id())
    }
}
