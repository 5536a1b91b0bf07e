// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Breadth-first search

use super::arena::PathArena;
use super::budget::{SearchBudget, SearchOutcome};
use crate::graph::{DirectedGraph, Direction};
use std::collections::VecDeque;

/// Level-order search; the first route to reach `target` has the fewest
/// edges. Nodes at depth `max_length` are not expanded.
pub(crate) fn search(
    graph: &DirectedGraph,
    source: usize,
    target: usize,
    direction: Direction,
    max_length: usize,
    budget: &SearchBudget,
) -> SearchOutcome {
    let mut arena = PathArena::default();
    let mut visited = vec![false; graph.node_count()];
    visited[source] = true;
    let mut visited_count = 1;

    let mut queue = VecDeque::from([arena.root(source)]);
    while let Some(slot) = queue.pop_front() {
        if budget.expired() {
            return SearchOutcome::timed_out(visited_count);
        }

        let current = *arena.get(slot);
        if current.hops >= max_length {
            continue;
        }

        for entry in graph.neighbors(current.node, direction) {
            if visited[entry.target] {
                continue;
            }
            visited[entry.target] = true;
            visited_count += 1;

            let next = arena.extend(slot, entry, current.distance + 1.0);
            if entry.target == target {
                return SearchOutcome::found(arena.route(next), visited_count);
            }
            queue.push_back(next);
        }
    }

    SearchOutcome::exhausted(visited_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WeightStrategy;
    use crate::types::{EdgeRecord, NodeRecord};

    fn chain() -> DirectedGraph {
        let nodes: Vec<NodeRecord> = ["A", "B", "C", "D"].iter().map(|id| NodeRecord::new(*id)).collect();
        let edges = vec![
            EdgeRecord::new("ab", "A", "B"),
            EdgeRecord::new("bc", "B", "C"),
            EdgeRecord::new("cd", "C", "D"),
        ];
        DirectedGraph::build(&nodes, &edges, &WeightStrategy::Uniform)
    }

    #[test]
    fn test_bfs_follows_chain() {
        let graph = chain();
        let outcome = search(&graph, 0, 3, Direction::Outgoing, 10, &SearchBudget::start(5_000));
        let route = outcome.route.unwrap();
        assert_eq!(route.nodes, vec![0, 1, 2, 3]);
        assert_eq!(route.cumulative, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(outcome.nodes_visited, 4);
    }

    #[test]
    fn test_bfs_respects_direction() {
        let graph = chain();
        let budget = SearchBudget::start(5_000);
        assert!(search(&graph, 3, 0, Direction::Outgoing, 10, &budget).route.is_none());

        let route = search(&graph, 3, 0, Direction::Incoming, 10, &budget).route.unwrap();
        assert_eq!(route.nodes, vec![3, 2, 1, 0]);
        assert!(route.links.iter().all(|l| l.is_reverse));
    }

    #[test]
    fn test_bfs_respects_max_length() {
        let graph = chain();
        let budget = SearchBudget::start(5_000);
        let outcome = search(&graph, 0, 3, Direction::Outgoing, 2, &budget);
        assert!(outcome.route.is_none());
        assert!(!outcome.timed_out);
        assert!(search(&graph, 0, 3, Direction::Outgoing, 3, &budget).route.is_some());
    }

    #[test]
    fn test_bfs_times_out() {
        let graph = chain();
        let outcome = search(&graph, 0, 3, Direction::Both, 10, &SearchBudget::start(0));
        assert!(outcome.timed_out);
        assert!(outcome.route.is_none());
        assert_eq!(outcome.nodes_visited, 1);
    }
}
