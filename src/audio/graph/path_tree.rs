use super::NodeId;

/// Snapshot of a single-source shortest-path run.
///
/// Holds one predecessor per node, so there is at most one path from the
/// source to any destination. The tree does not borrow the graph and is not
/// updated if the graph changes afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct PathTree {
    source: NodeId,
    previous: Vec<Option<NodeId>>,
    distances: Vec<f64>,
}

impl PathTree {
    pub(super) fn new(source: NodeId, previous: Vec<Option<NodeId>>, distances: Vec<f64>) -> Self {
        Self {
            source,
            previous,
            distances,
        }
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Number of nodes the tree was computed over.
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.previous.get(id.0).copied().flatten()
    }

    /// Shortest distance from the source, or None if `id` is unreachable or unknown.
    pub fn distance_to(&self, id: NodeId) -> Option<f64> {
        self.distances.get(id.0).copied().filter(|d| d.is_finite())
    }

    pub fn is_reachable(&self, id: NodeId) -> bool {
        self.distance_to(id).is_some()
    }

    /// The shortest path to `destination`, listed from the destination back
    /// toward the source. The source itself is not included.
    ///
    /// Returns None when the destination is unreachable, unknown, or is the
    /// source (there is no hop to report).
    pub fn path_to(&self, destination: NodeId) -> Option<Vec<NodeId>> {
        let mut path = Vec::new();
        let mut node = destination;

        // Chain length is bounded by the node count in a well-formed tree
        for _ in 0..self.previous.len() {
            let prev = self.predecessor(node)?;
            path.push(node);
            if prev == self.source {
                return Some(path);
            }
            node = prev;
        }
        None
    }
}
