//! Tests for the weighted graph and its shortest-path tree.

use super::*;

/// Helper: line graph 0 - 1 - 2 - ... with unit weights
fn line_graph(n: usize) -> (Graph<usize>, Vec<NodeId>) {
    let mut graph = Graph::new();
    let ids: Vec<NodeId> = (0..n).map(|i| graph.add_node(i)).collect();
    for pair in ids.windows(2) {
        graph.add_edge(pair[0], pair[1], 1.0).unwrap();
    }
    (graph, ids)
}

/// Helper: random directed graph with `n` nodes and roughly `density` edge probability
fn random_graph(rng: &mut fastrand::Rng, n: usize, density: f64) -> Graph<usize> {
    let mut graph = Graph::new();
    let ids: Vec<NodeId> = (0..n).map(|i| graph.add_node(i)).collect();
    for &a in &ids {
        for &b in &ids {
            if a != b && rng.f64() < density {
                let weight = (rng.u32(0..20) as f64) * 0.5;
                graph.add_directed_edge(a, b, weight).unwrap();
            }
        }
    }
    graph
}

/// Independent all-pairs reference (Floyd-Warshall)
fn floyd_warshall<T>(graph: &Graph<T>) -> Vec<Vec<f64>> {
    let n = graph.len();
    let mut dist = vec![vec![f64::INFINITY; n]; n];
    for node in graph.nodes() {
        dist[node.id().0][node.id().0] = 0.0;
        for (to, weight) in node.edges() {
            let entry = &mut dist[node.id().0][to.0];
            *entry = entry.min(weight);
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let via = dist[i][k] + dist[k][j];
                if via < dist[i][j] {
                    dist[i][j] = via;
                }
            }
        }
    }
    dist
}

#[test]
fn test_add_node_assigns_sequential_ids() {
    let mut graph = Graph::new();
    let a = graph.add_node('a');
    let b = graph.add_node('b');
    assert_eq!(a, NodeId(0));
    assert_eq!(b, NodeId(1));
    assert_eq!(graph.value(b), Some(&'b'));
    assert_eq!(graph.node(b).map(|n| n.id()), Some(b));
    assert_eq!(graph.node(b).map(|n| n.degree()), Some(0));
}

#[test]
fn test_undirected_edge_writes_both_directions() {
    let mut graph = Graph::new();
    let a = graph.add_node(());
    let b = graph.add_node(());
    graph.add_edge(a, b, 2.5).unwrap();
    assert_eq!(graph.edge_weight(a, b), Some(2.5));
    assert_eq!(graph.edge_weight(b, a), Some(2.5));
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn test_directed_edge_writes_one_direction() {
    let mut graph = Graph::new();
    let a = graph.add_node(());
    let b = graph.add_node(());
    graph.add_directed_edge(a, b, 1.0).unwrap();
    assert_eq!(graph.edge_weight(a, b), Some(1.0));
    assert_eq!(graph.edge_weight(b, a), None);
}

#[test]
fn test_edge_to_unknown_node_is_rejected() {
    let mut graph = Graph::new();
    let a = graph.add_node(());
    let err = graph.add_edge(a, NodeId(3), 1.0).unwrap_err();
    assert_eq!(err, GraphError::UnknownNode { id: NodeId(3), node_count: 1 });
    assert_eq!(graph.edge_count(), 0, "Failed insert must not leave a half edge");
}

#[test]
fn test_negative_and_nan_weights_are_rejected() {
    let mut graph = Graph::new();
    let a = graph.add_node(());
    let b = graph.add_node(());
    assert!(matches!(
        graph.add_directed_edge(a, b, -1.0),
        Err(GraphError::InvalidWeight { .. })
    ));
    assert!(matches!(
        graph.add_edge(a, b, f64::NAN),
        Err(GraphError::InvalidWeight { .. })
    ));
    assert!(graph.add_edge(a, b, 0.0).is_ok(), "Zero weight is allowed");
}

#[test]
fn test_clone_preserves_ids_values_and_direction() {
    let mut graph = Graph::new();
    let a = graph.add_node("a");
    let b = graph.add_node("b");
    let c = graph.add_node("c");
    graph.add_directed_edge(a, b, 1.0).unwrap();
    graph.add_directed_edge(b, c, 4.0).unwrap();
    graph.add_edge(a, c, 9.0).unwrap();

    let copy = graph.clone();
    assert_eq!(copy.len(), graph.len());
    for node in graph.nodes() {
        assert_eq!(copy.value(node.id()), Some(node.value()));
        let original: Vec<_> = node.edges().collect();
        let cloned: Vec<_> = copy.node(node.id()).unwrap().edges().collect();
        assert_eq!(original, cloned, "Edges of node {:?} differ after clone", node.id());
    }
    assert_eq!(copy.edge_weight(b, a), None, "Clone must not symmetrize directed edges");
}

#[test]
fn test_mutating_clone_leaves_original_untouched() {
    let (graph, ids) = line_graph(3);
    let mut copy = graph.clone();

    assert_eq!(copy.remove_directed_edge(ids[0], ids[1]), Some(1.0));
    copy.add_directed_edge(ids[2], ids[0], 0.5).unwrap();

    assert_eq!(graph.edge_weight(ids[0], ids[1]), Some(1.0));
    assert_eq!(graph.edge_weight(ids[2], ids[0]), None);
    assert_eq!(graph.edge_count(), 4);
}

#[test]
fn test_spt_on_single_node_graph() {
    let mut graph = Graph::new();
    let only = graph.add_node(());
    let tree = graph.compute_spt(only).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.distance_to(only), Some(0.0));
    assert_eq!(tree.path_to(only), None, "Source has no path to itself");
}

#[test]
fn test_spt_unknown_source_fails() {
    let (graph, _) = line_graph(2);
    assert_eq!(
        graph.compute_spt(NodeId(2)).unwrap_err(),
        GraphError::UnknownNode { id: NodeId(2), node_count: 2 }
    );
}

#[test]
fn test_spt_disconnected_node_is_unreachable() {
    let (mut graph, ids) = line_graph(3);
    let island = graph.add_node(99);
    let tree = graph.compute_spt(ids[0]).unwrap();

    assert!(!tree.is_reachable(island));
    assert_eq!(tree.distance_to(island), None);
    assert_eq!(tree.predecessor(island), None);
    assert_eq!(tree.path_to(island), None);
    assert_eq!(tree.distance_to(ids[2]), Some(2.0));
}

#[test]
fn test_path_runs_from_destination_back_to_source() {
    let (graph, ids) = line_graph(4);
    let tree = graph.compute_spt(ids[0]).unwrap();
    assert_eq!(tree.source(), ids[0]);
    assert_eq!(tree.path_to(ids[3]), Some(vec![ids[3], ids[2], ids[1]]));
    assert_eq!(tree.path_to(ids[1]), Some(vec![ids[1]]));
}

#[test]
fn test_spt_prefers_cheaper_detour() {
    let mut graph = Graph::new();
    let a = graph.add_node(());
    let b = graph.add_node(());
    let c = graph.add_node(());
    graph.add_edge(a, c, 10.0).unwrap();
    graph.add_edge(a, b, 3.0).unwrap();
    graph.add_edge(b, c, 4.0).unwrap();

    let tree = graph.compute_spt(a).unwrap();
    assert_eq!(tree.distance_to(c), Some(7.0));
    assert_eq!(tree.predecessor(c), Some(b));
    assert_eq!(tree.path_to(c), Some(vec![c, b]));
}

#[test]
fn test_spt_follows_edge_direction() {
    let mut graph = Graph::new();
    let a = graph.add_node(());
    let b = graph.add_node(());
    graph.add_directed_edge(b, a, 1.0).unwrap();

    let tree = graph.compute_spt(a).unwrap();
    assert!(!tree.is_reachable(b));
    let tree = graph.compute_spt(b).unwrap();
    assert_eq!(tree.distance_to(a), Some(1.0));
}

#[test]
fn test_tree_is_a_snapshot() {
    let (mut graph, ids) = line_graph(2);
    let tree = graph.compute_spt(ids[0]).unwrap();
    let extra = graph.add_node(7);
    graph.add_edge(ids[1], extra, 1.0).unwrap();

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.distance_to(extra), None);
    assert_eq!(tree.distance_to(ids[1]), Some(1.0));
}

#[test]
fn test_spt_matches_brute_force_on_random_graphs() {
    let mut rng = fastrand::Rng::with_seed(1234);
    for round in 0..60 {
        let n = rng.usize(1..8);
        let graph = random_graph(&mut rng, n, 0.35);
        let reference = floyd_warshall(&graph);

        for source in 0..n {
            let tree = graph.compute_spt(NodeId(source)).unwrap();
            for dest in 0..n {
                let expected = reference[source][dest];
                let dest_id = NodeId(dest);
                if expected.is_infinite() {
                    assert_eq!(tree.distance_to(dest_id), None, "round {round}: {source}->{dest}");
                    assert_eq!(tree.path_to(dest_id), None);
                    continue;
                }
                let dist = tree.distance_to(dest_id).unwrap();
                assert!(
                    (dist - expected).abs() < 1e-9,
                    "round {round}: {source}->{dest} {dist} != {expected}"
                );

                if source == dest {
                    continue;
                }
                // Walking the reported path must add up to the reported distance
                let path = tree.path_to(dest_id).unwrap();
                let mut total = 0.0;
                let mut hops = path.clone();
                hops.push(NodeId(source));
                for pair in hops.windows(2) {
                    total += graph.edge_weight(pair[1], pair[0]).unwrap();
                }
                assert!(
                    (total - expected).abs() < 1e-9,
                    "round {round}: path weight {total} != {expected}"
                );
            }
        }
    }
}
