// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Bidirectional breadth-first search
//!
//! The source side walks `direction`, the target side walks the flipped
//! direction, so every edge on the backward chain is valid once reversed.
//! Whole levels are expanded alternately; every meeting found during a
//! level is a candidate and the one with the fewest total edges wins.

use super::arena::{PathArena, Route};
use super::budget::{SearchBudget, SearchOutcome};
use crate::graph::{DirectedGraph, Direction};

/// One half of the search
struct Frontier {
    arena: PathArena,
    /// Arena slot per graph node once visited by this side
    visited: Vec<Option<usize>>,
    level: Vec<usize>,
    depth: usize,
    direction: Direction,
}

impl Frontier {
    fn new(origin: usize, node_count: usize, direction: Direction) -> Self {
        let mut arena = PathArena::default();
        let root = arena.root(origin);
        let mut visited = vec![None; node_count];
        visited[origin] = Some(root);
        Self {
            arena,
            visited,
            level: vec![root],
            depth: 0,
            direction,
        }
    }
}

/// Meeting of the two sides: a slot in each arena for the same graph node
#[derive(Debug, Clone, Copy)]
struct Meeting {
    forward: usize,
    backward: usize,
    hops: usize,
}

pub(crate) fn search(
    graph: &DirectedGraph,
    source: usize,
    target: usize,
    direction: Direction,
    max_length: usize,
    budget: &SearchBudget,
) -> SearchOutcome {
    let n = graph.node_count();
    let mut forward = Frontier::new(source, n, direction);
    let mut backward = Frontier::new(target, n, direction.flip());
    let mut visited_count = 2;
    let mut forward_turn = true;

    while !forward.level.is_empty()
        && !backward.level.is_empty()
        && forward.depth + backward.depth < max_length
    {
        let (active, other) = if forward_turn {
            (&mut forward, &backward)
        } else {
            (&mut backward, &forward)
        };

        let mut best: Option<(usize, usize, usize)> = None;
        let mut next_level = Vec::new();
        for &slot in &active.level {
            if budget.expired() {
                return SearchOutcome::timed_out(visited_count);
            }
            let node = active.arena.get(slot).node;
            for entry in graph.neighbors(node, active.direction) {
                if active.visited[entry.target].is_some() {
                    continue;
                }
                let next = active.arena.extend(slot, entry, (active.depth + 1) as f64);
                active.visited[entry.target] = Some(next);

                match other.visited[entry.target] {
                    Some(theirs) => {
                        let hops = active.depth + 1 + other.arena.get(theirs).hops;
                        if best.map_or(true, |(_, _, h)| hops < h) {
                            best = Some((next, theirs, hops));
                        }
                    }
                    None => visited_count += 1,
                }
                next_level.push(next);
            }
        }
        active.level = next_level;
        active.depth += 1;

        if let Some((mine, theirs, hops)) = best {
            let meeting = if forward_turn {
                Meeting { forward: mine, backward: theirs, hops }
            } else {
                Meeting { forward: theirs, backward: mine, hops }
            };
            return SearchOutcome::found(splice(&forward, &backward, meeting), visited_count);
        }
        forward_turn = !forward_turn;
    }

    SearchOutcome::exhausted(visited_count)
}

fn splice(forward: &Frontier, backward: &Frontier, meeting: Meeting) -> Route {
    let mut route = forward.arena.route(meeting.forward);
    backward.arena.append_reversed(meeting.backward, &mut route);
    debug_assert_eq!(route.hops(), meeting.hops);
    route
}
