// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for community detection and path finding
//!
//! These tests verify critical invariants over generated graphs:
//! 1. Partition shape - every node in exactly one community, contiguous ids
//! 2. Component separation - communities never span components
//! 3. Determinism - same seed, same partition
//! 4. Path optimality - all searches agree on the shortest edge count
//! 5. Path bounds - trivial paths, length caps, timeouts

use graphlens::graph::{connected_components, WeightedGraph};
use graphlens::prelude::*;
use proptest::prelude::*;
use std::collections::HashSet;

// =============================================================================
// Test Helpers
// =============================================================================

fn node_id(i: usize) -> String {
    format!("n{i}")
}

fn make_graph(n: usize, raw_edges: &[(usize, usize, f64)]) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
    let nodes = (0..n).map(|i| NodeRecord::new(node_id(i))).collect();
    let edges = raw_edges
        .iter()
        .enumerate()
        .map(|(k, &(s, t, w))| EdgeRecord::new(format!("e{k}"), node_id(s % n), node_id(t % n)).with_weight(w))
        .collect();
    (nodes, edges)
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>)> {
    (1usize..24).prop_flat_map(|n| {
        (
            Just(n),
            proptest::collection::vec((0..n, 0..n, 0.1f64..5.0), 0..60),
        )
    })
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Outgoing),
        Just(Direction::Incoming),
        Just(Direction::Both),
    ]
}

fn seeded(seed: u64) -> CommunityDetector {
    CommunityDetector::new(DetectionConfig {
        random_seed: Some(seed),
        ..DetectionConfig::default()
    })
}

// =============================================================================
// Community Invariants
// =============================================================================

proptest! {
    #[test]
    fn every_node_in_exactly_one_community((n, raw) in graph_strategy(), seed in any::<u64>()) {
        let (nodes, edges) = make_graph(n, &raw);
        let result = seeded(seed).detect(&nodes, &edges);

        let total: usize = result.communities.iter().map(|c| c.size).sum();
        prop_assert_eq!(total, n);
        prop_assert_eq!(result.assignments.len(), n);

        let mut seen = HashSet::new();
        for community in &result.communities {
            prop_assert_eq!(community.size, community.members.len());
            for member in &community.members {
                prop_assert!(seen.insert(member.clone()), "{} listed twice", member);
                prop_assert_eq!(result.community_of(member), Some(community.id));
            }
        }
    }

    #[test]
    fn community_ids_are_contiguous((n, raw) in graph_strategy(), seed in any::<u64>()) {
        let (nodes, edges) = make_graph(n, &raw);
        let result = seeded(seed).detect(&nodes, &edges);

        for (i, community) in result.communities.iter().enumerate() {
            prop_assert_eq!(community.id, i);
            prop_assert!(community.size > 0);
        }
        for assignment in result.assignments.values() {
            prop_assert!(assignment.community_id < result.len());
            prop_assert!((0.0..=1.0).contains(&assignment.confidence));
        }
        prop_assert!(result.modularity <= 1.0 + 1e-9);
    }

    #[test]
    fn communities_never_span_components((n, raw) in graph_strategy(), seed in any::<u64>()) {
        let (nodes, edges) = make_graph(n, &raw);
        let result = seeded(seed).detect(&nodes, &edges);
        let graph = WeightedGraph::build(&nodes, &edges, true, 1.0);
        let components = connected_components(&graph);

        for community in &result.communities {
            let labels: HashSet<usize> = community
                .members
                .iter()
                .filter_map(|id| graph.index().index_of(id))
                .map(|i| components[i])
                .collect();
            prop_assert_eq!(labels.len(), 1);
        }
    }

    #[test]
    fn same_seed_same_partition((n, raw) in graph_strategy(), seed in any::<u64>()) {
        let (nodes, edges) = make_graph(n, &raw);
        let first = seeded(seed).detect(&nodes, &edges);
        let second = seeded(seed).detect(&nodes, &edges);

        prop_assert_eq!(&first.assignments, &second.assignments);
        prop_assert_eq!(&first.communities, &second.communities);
        prop_assert_eq!(first.modularity.to_bits(), second.modularity.to_bits());
        prop_assert_eq!(first.iterations, second.iterations);
    }
}

// =============================================================================
// Path Invariants
// =============================================================================

proptest! {
    #[test]
    fn searches_agree_on_shortest_length(
        (n, raw) in graph_strategy(),
        source in 0usize..24,
        target in 0usize..24,
        direction in direction_strategy(),
        max_length in 1usize..6,
    ) {
        let (nodes, edges) = make_graph(n, &raw);
        let mut finder = PathFinder::new();
        finder.set_graph(&nodes, &edges);
        let (source, target) = (node_id(source % n), node_id(target % n));

        let lengths: Vec<Option<usize>> = [Algorithm::Bfs, Algorithm::Dijkstra, Algorithm::Bidirectional]
            .into_iter()
            .map(|algorithm| {
                let options = PathOptions {
                    algorithm,
                    direction,
                    max_length,
                    ..PathOptions::default()
                };
                let result = finder.find_path(&source, &target, &options);
                assert!(!result.timed_out);
                result.best().map(|p| p.length)
            })
            .collect();

        prop_assert_eq!(lengths[0], lengths[1]);
        prop_assert_eq!(lengths[0], lengths[2]);
    }

    #[test]
    fn paths_are_valid_and_bounded(
        (n, raw) in graph_strategy(),
        source in 0usize..24,
        target in 0usize..24,
        max_length in 1usize..6,
        max_paths in 1usize..4,
        algorithm in prop_oneof![Just(Algorithm::Bfs), Just(Algorithm::Dijkstra), Just(Algorithm::Bidirectional)],
    ) {
        let (nodes, edges) = make_graph(n, &raw);
        let mut finder = PathFinder::new();
        finder.set_graph(&nodes, &edges);
        let (source, target) = (node_id(source % n), node_id(target % n));
        let options = PathOptions {
            algorithm,
            max_length,
            max_paths,
            ..PathOptions::default()
        };

        let result = finder.find_path(&source, &target, &options);
        prop_assert_eq!(result.found, !result.paths.is_empty());
        prop_assert!(result.paths.len() <= max_paths);
        for path in &result.paths {
            prop_assert!(path.length <= max_length);
            prop_assert_eq!(path.node_ids.len(), path.length + 1);
            prop_assert_eq!(path.edge_ids.len(), path.length);
            prop_assert_eq!(path.node_ids.first(), Some(&source));
            prop_assert_eq!(path.node_ids.last(), Some(&target));
        }
    }

    #[test]
    fn path_to_self_is_trivial((n, raw) in graph_strategy(), node in 0usize..24) {
        let (nodes, edges) = make_graph(n, &raw);
        let mut finder = PathFinder::new();
        finder.set_graph(&nodes, &edges);
        let id = node_id(node % n);

        let result = finder.find_path(&id, &id, &PathOptions::default());
        prop_assert!(result.found);
        prop_assert_eq!(result.nodes_visited, 1);
        prop_assert_eq!(result.paths[0].length, 0);
        prop_assert_eq!(&result.paths[0].node_ids, &vec![id.clone()]);
    }
}

#[test]
fn test_zero_timeout_always_times_out() {
    let (nodes, edges) = make_graph(6, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0), (4, 5, 1.0)]);
    let mut finder = PathFinder::new();
    finder.set_graph(&nodes, &edges);

    for algorithm in [Algorithm::Bfs, Algorithm::Dijkstra, Algorithm::Bidirectional] {
        let options = PathOptions {
            algorithm,
            timeout_ms: 0,
            ..PathOptions::default()
        };
        let result = finder.find_path("n0", "n5", &options);
        assert!(!result.found, "{algorithm}");
        assert!(result.timed_out, "{algorithm}");
        assert!(result.error.is_none(), "{algorithm}");
    }
}
