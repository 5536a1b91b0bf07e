// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Weighted shortest path

use super::arena::PathArena;
use super::budget::{SearchBudget, SearchOutcome};
use crate::graph::{AdjacencyEntry, DirectedGraph, Direction};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// Heap entry ordered so the smallest distance pops first; equal distances
/// pop in push order.
#[derive(Debug, Clone, Copy)]
struct QueueItem {
    distance: f64,
    seq: usize,
    slot: usize,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Limits on which steps a search may take
#[derive(Debug, Clone, Copy)]
pub(crate) struct Constraints<'a> {
    pub direction: Direction,
    /// Maximum edge count along the predecessor chain
    pub max_length: usize,
    /// Nodes that may not be entered
    pub banned_nodes: Option<&'a [bool]>,
    /// Edges that may not be taken out of the given node
    pub banned_edges: Option<(usize, &'a HashSet<usize>)>,
}

impl<'a> Constraints<'a> {
    pub(crate) fn new(direction: Direction, max_length: usize) -> Self {
        Self {
            direction,
            max_length,
            banned_nodes: None,
            banned_edges: None,
        }
    }

    fn allows(&self, from: usize, entry: &AdjacencyEntry) -> bool {
        if self.banned_nodes.is_some_and(|banned| banned[entry.target]) {
            return false;
        }
        !matches!(self.banned_edges, Some((node, edges)) if node == from && edges.contains(&entry.edge))
    }
}

/// Dijkstra over the strategy weights stored in the adjacency
pub(crate) fn search(
    graph: &DirectedGraph,
    source: usize,
    target: usize,
    direction: Direction,
    max_length: usize,
    budget: &SearchBudget,
) -> SearchOutcome {
    shortest(
        graph,
        source,
        target,
        &Constraints::new(direction, max_length),
        budget,
        |entry| entry.weight,
    )
}

/// Minimum-cost search under `constraints`, pricing steps with `weigh`.
///
/// The hop cap applies to the best-known predecessor chain, so a cheaper
/// route longer than `max_length` edges is never considered.
pub(crate) fn shortest<F>(
    graph: &DirectedGraph,
    source: usize,
    target: usize,
    constraints: &Constraints<'_>,
    budget: &SearchBudget,
    weigh: F,
) -> SearchOutcome
where
    F: Fn(&AdjacencyEntry) -> f64,
{
    let n = graph.node_count();
    let mut arena = PathArena::default();
    let mut distances = vec![f64::INFINITY; n];
    let mut finalized = vec![false; n];
    let mut heap = BinaryHeap::new();
    let mut seq = 0;

    distances[source] = 0.0;
    let mut discovered = 1;
    heap.push(QueueItem {
        distance: 0.0,
        seq,
        slot: arena.root(source),
    });

    while let Some(item) = heap.pop() {
        if budget.expired() {
            return SearchOutcome::timed_out(discovered);
        }

        let current = *arena.get(item.slot);
        if finalized[current.node] {
            continue;
        }
        finalized[current.node] = true;

        if current.node == target {
            return SearchOutcome::found(arena.route(item.slot), discovered);
        }
        if current.hops >= constraints.max_length {
            continue;
        }

        for entry in graph.neighbors(current.node, constraints.direction) {
            if finalized[entry.target] || !constraints.allows(current.node, entry) {
                continue;
            }
            let distance = current.distance + weigh(entry);
            if distance < distances[entry.target] {
                if distances[entry.target].is_infinite() {
                    discovered += 1;
                }
                distances[entry.target] = distance;
                seq += 1;
                heap.push(QueueItem {
                    distance,
                    seq,
                    slot: arena.extend(item.slot, entry, distance),
                });
            }
        }
    }

    SearchOutcome::exhausted(discovered)
}
