// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Loopless k-shortest paths (Yen's method)

use super::arena::{Link, Route};
use super::budget::SearchBudget;
use super::dijkstra::{shortest, Constraints};
use crate::graph::{DirectedGraph, Direction};
use std::collections::HashSet;

/// How extra routes are priced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cost {
    /// Every edge costs one
    Hops,
    /// Strategy weight stored on the adjacency entry
    Weight,
}

/// Routes ranked shortest first, starting with the primary route
#[derive(Debug, Clone, Default)]
pub(crate) struct Ranked {
    pub routes: Vec<Route>,
    /// Nodes discovered by the spur searches
    pub nodes_visited: usize,
    pub timed_out: bool,
}

struct Candidate {
    route: Route,
    seq: usize,
}

fn same_route(a: &Route, b: &Route) -> bool {
    a.nodes == b.nodes && a.links == b.links
}

/// Extend `first` with up to `k - 1` further loopless routes.
pub(crate) fn rank(
    graph: &DirectedGraph,
    first: Route,
    k: usize,
    direction: Direction,
    max_length: usize,
    cost: Cost,
    budget: &SearchBudget,
) -> Ranked {
    let target = first.nodes.last().copied().unwrap_or_default();
    let mut ranked = Ranked {
        routes: vec![first],
        ..Ranked::default()
    };
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut seq = 0;
    let mut banned_nodes = vec![false; graph.node_count()];

    while ranked.routes.len() < k {
        let previous = ranked.routes[ranked.routes.len() - 1].clone();

        for i in 0..previous.hops() {
            if budget.expired() {
                ranked.timed_out = true;
                return ranked;
            }
            let spur = previous.nodes[i];
            let root_nodes = &previous.nodes[..=i];
            let root_links: &[Link] = &previous.links[..i];

            let banned_edges: HashSet<usize> = ranked
                .routes
                .iter()
                .filter(|r| r.hops() > i && r.nodes[..=i] == *root_nodes && r.links[..i] == *root_links)
                .map(|r| r.links[i].edge)
                .collect();

            banned_nodes.fill(false);
            for &node in &root_nodes[..i] {
                banned_nodes[node] = true;
            }

            let constraints = Constraints {
                banned_nodes: Some(&banned_nodes),
                banned_edges: Some((spur, &banned_edges)),
                ..Constraints::new(direction, max_length.saturating_sub(i))
            };
            let outcome = shortest(graph, spur, target, &constraints, budget, |entry| match cost {
                Cost::Hops => 1.0,
                Cost::Weight => entry.weight,
            });
            ranked.nodes_visited += outcome.nodes_visited;
            if outcome.timed_out {
                ranked.timed_out = true;
                return ranked;
            }
            let Some(spur_route) = outcome.route else {
                continue;
            };

            let mut route = Route {
                nodes: root_nodes.to_vec(),
                links: root_links.to_vec(),
                cumulative: previous.cumulative[..=i].to_vec(),
            };
            let offset = route.cost();
            for (step, link) in spur_route.links.iter().enumerate() {
                route.nodes.push(spur_route.nodes[step + 1]);
                route.links.push(*link);
                route.cumulative.push(offset + spur_route.cumulative[step + 1]);
            }

            let known = ranked.routes.iter().any(|r| same_route(r, &route))
                || candidates.iter().any(|c| same_route(&c.route, &route));
            if !known {
                candidates.push(Candidate { route, seq });
                seq += 1;
            }
        }

        let best = candidates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.route
                    .cost()
                    .total_cmp(&b.route.cost())
                    .then_with(|| a.route.hops().cmp(&b.route.hops()))
                    .then_with(|| a.seq.cmp(&b.seq))
            })
            .map(|(position, _)| position);
        match best {
            Some(position) => ranked.routes.push(candidates.swap_remove(position).route),
            None => break,
        }
    }

    ranked
}
