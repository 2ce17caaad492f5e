use std::collections::BTreeMap;
use std::fmt;

use earshot_macros::profile;
use serde::{Deserialize, Serialize};

mod heap;
mod path_tree;

#[cfg(test)]
mod tests;

pub use path_tree::PathTree;

use heap::DecreaseKeyHeap;

/// Dense node index within one [`Graph`], assigned in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// A graph node: payload plus outgoing edges keyed by neighbor id.
#[derive(Clone, Debug)]
pub struct Node<T> {
    id: NodeId,
    value: T,
    edges: BTreeMap<NodeId, f64>,
}

impl<T> Node<T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Outgoing edges as (neighbor, weight), in ascending neighbor order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.edges.iter().map(|(&id, &weight)| (id, weight))
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GraphError {
    /// An operation referenced a node id this graph does not own.
    UnknownNode {
        id: NodeId,
        node_count: usize,
    },
    /// Edge weights must be non-negative and not NaN.
    InvalidWeight {
        from: NodeId,
        to: NodeId,
        weight: f64,
    },
    /// The priority queue reported queued entries but yielded none.
    HeapExhausted {
        remaining: usize,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::UnknownNode { id, node_count } => {
                write!(f, "node {} does not belong to this graph ({} nodes)", id.0, node_count)
            }
            GraphError::InvalidWeight { from, to, weight } => {
                write!(f, "edge {} -> {} has invalid weight {}", from.0, to.0, weight)
            }
            GraphError::HeapExhausted { remaining } => {
                write!(f, "priority queue reported {} entries but yielded none", remaining)
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Weighted directed graph over an arena of nodes.
///
/// Nodes live in a `Vec` indexed by [`NodeId`]; edges reference siblings by id,
/// never by pointer, so cloning is a plain deep copy that preserves ids and
/// edge direction.
///
/// # Example
///
/// ```rust
/// use earshot::audio::graph::Graph;
///
/// let mut graph = Graph::new();
/// let a = graph.add_node("a");
/// let b = graph.add_node("b");
/// let c = graph.add_node("c");
/// graph.add_edge(a, b, 1.0).unwrap();
/// graph.add_directed_edge(b, c, 2.0).unwrap();
///
/// let tree = graph.compute_spt(a).unwrap();
/// assert_eq!(tree.distance_to(c), Some(3.0));
/// assert_eq!(tree.path_to(c), Some(vec![c, b]));
/// ```
#[derive(Clone, Debug)]
pub struct Graph<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> Graph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0)
    }

    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|n| &n.value)
    }

    /// Weight of the directed edge `from -> to`, if present.
    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.node(from)?.edges.get(&to).copied()
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }

    pub fn add_node(&mut self, value: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            value,
            edges: BTreeMap::new(),
        });
        id
    }

    /// Insert an undirected edge (both directions, same weight).
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> Result<(), GraphError> {
        self.validate_edge(a, b, weight)?;
        self.nodes[a.0].edges.insert(b, weight);
        self.nodes[b.0].edges.insert(a, weight);
        Ok(())
    }

    /// Insert the single directed edge `from -> to`.
    pub fn add_directed_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        weight: f64,
    ) -> Result<(), GraphError> {
        self.validate_edge(from, to, weight)?;
        self.nodes[from.0].edges.insert(to, weight);
        Ok(())
    }

    /// Remove the directed edge `from -> to`, returning its weight.
    pub fn remove_directed_edge(&mut self, from: NodeId, to: NodeId) -> Option<f64> {
        self.nodes.get_mut(from.0)?.edges.remove(&to)
    }

    fn check_node(&self, id: NodeId) -> Result<(), GraphError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode {
                id,
                node_count: self.nodes.len(),
            })
        }
    }

    fn validate_edge(&self, from: NodeId, to: NodeId, weight: f64) -> Result<(), GraphError> {
        self.check_node(from)?;
        self.check_node(to)?;
        if weight.is_nan() || weight < 0.0 {
            return Err(GraphError::InvalidWeight { from, to, weight });
        }
        Ok(())
    }

    /// Compute the shortest-path tree rooted at `source` (Dijkstra).
    ///
    /// Every node is queued up front with its tentative distance, and each
    /// successful relaxation lowers the neighbor's key in place. Unreachable
    /// nodes keep an infinite distance and no predecessor.
    #[profile(5)]
    pub fn compute_spt(&self, source: NodeId) -> Result<PathTree, GraphError> {
        self.check_node(source)?;

        let node_count = self.nodes.len();
        let mut distances = vec![f64::INFINITY; node_count];
        let mut previous: Vec<Option<NodeId>> = vec![None; node_count];
        distances[source.0] = 0.0;

        let mut heap = DecreaseKeyHeap::with_capacity(node_count);
        for node in &self.nodes {
            heap.push(node.id, distances[node.id.0]);
        }

        while !heap.is_empty() {
            let Some((current, _)) = heap.pop() else {
                return Err(GraphError::HeapExhausted { remaining: heap.len() });
            };

            let base = distances[current.0];
            for (&neighbor, &weight) in &self.nodes[current.0].edges {
                let alt = base + weight;
                if alt < distances[neighbor.0] {
                    distances[neighbor.0] = alt;
                    previous[neighbor.0] = Some(current);
                    heap.decrease_key(neighbor, alt);
                }
            }
        }

        Ok(PathTree::new(source, previous, distances))
    }
}
