// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use arbitrary::Arbitrary;
use graphlens::prelude::*;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Query {
    node_count: u8,
    edges: Vec<(u8, u8, u8)>,
    source: u8,
    target: u8,
    algorithm: u8,
    direction: u8,
    max_length: u8,
    max_paths: u8,
}

fuzz_target!(|query: Query| {
    let n = usize::from(query.node_count % 32) + 1;
    let nodes: Vec<NodeRecord> = (0..n).map(|i| NodeRecord::new(format!("n{i}"))).collect();
    let edges: Vec<EdgeRecord> = query
        .edges
        .iter()
        .enumerate()
        .map(|(k, &(s, t, w))| {
            EdgeRecord::new(
                format!("e{k}"),
                format!("n{}", usize::from(s) % n),
                format!("n{}", usize::from(t) % n),
            )
            .with_weight(f64::from(w) / 16.0)
        })
        .collect();

    let options = PathOptions {
        algorithm: match query.algorithm % 3 {
            0 => Algorithm::Bfs,
            1 => Algorithm::Dijkstra,
            _ => Algorithm::Bidirectional,
        },
        direction: match query.direction % 3 {
            0 => Direction::Outgoing,
            1 => Direction::Incoming,
            _ => Direction::Both,
        },
        weight_strategy: WeightStrategy::Property,
        max_length: usize::from(query.max_length % 12),
        max_paths: usize::from(query.max_paths % 4) + 1,
        ..PathOptions::default()
    };

    let mut finder = PathFinder::new();
    finder.set_graph(&nodes, &edges);
    let source = format!("n{}", usize::from(query.source) % n);
    let target = format!("n{}", usize::from(query.target) % n);
    let result = finder.find_path(&source, &target, &options);

    for path in &result.paths {
        assert!(source == target || path.length <= options.max_length);
        assert_eq!(path.node_ids.len(), path.length + 1);
    }
});
