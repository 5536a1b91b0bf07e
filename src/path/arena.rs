// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Search-tree arena and route reconstruction
//!
//! Frontier entries are `PathNode` records stored in one vector; each
//! points at its predecessor by arena index, so a path is recovered by
//! walking indices back to the root and reversing.

use crate::graph::AdjacencyEntry;

/// One traversed edge in a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Link {
    /// Edge index in the directed graph
    pub edge: usize,
    /// Walked against the edge's declared direction
    pub is_reverse: bool,
}

/// A node sequence with the links between consecutive nodes.
///
/// `nodes.len() == links.len() + 1` and `cumulative[i]` is the cost of
/// reaching `nodes[i]`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Route {
    pub nodes: Vec<usize>,
    pub links: Vec<Link>,
    pub cumulative: Vec<f64>,
}

impl Route {
    /// Zero-length route at one node
    pub(crate) fn single(node: usize) -> Self {
        Self {
            nodes: vec![node],
            links: Vec::new(),
            cumulative: vec![0.0],
        }
    }

    /// Number of edges
    pub(crate) fn hops(&self) -> usize {
        self.links.len()
    }

    /// Cost of the whole route
    pub(crate) fn cost(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Append one step
    pub(crate) fn push(&mut self, node: usize, link: Link, step_cost: f64) {
        let total = self.cost() + step_cost;
        self.nodes.push(node);
        self.links.push(link);
        self.cumulative.push(total);
    }
}

/// A frontier entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PathNode {
    /// Graph node index
    pub node: usize,
    /// Cost from the search origin
    pub distance: f64,
    /// Edge count from the search origin
    pub hops: usize,
    /// Arena index of the predecessor, `None` at the origin
    pub previous: Option<usize>,
    /// Edge used to arrive here, `None` at the origin
    pub edge: Option<usize>,
    /// Whether that edge was walked in reverse
    pub is_reverse: bool,
}

/// Flat storage for `PathNode` chains
#[derive(Debug, Default)]
pub(crate) struct PathArena {
    nodes: Vec<PathNode>,
}

impl PathArena {
    /// Add a search origin
    pub(crate) fn root(&mut self, node: usize) -> usize {
        self.nodes.push(PathNode {
            node,
            distance: 0.0,
            hops: 0,
            previous: None,
            edge: None,
            is_reverse: false,
        });
        self.nodes.len() - 1
    }

    /// Add the node reached from `from` through `entry`
    pub(crate) fn extend(&mut self, from: usize, entry: &AdjacencyEntry, distance: f64) -> usize {
        let hops = self.nodes[from].hops + 1;
        self.nodes.push(PathNode {
            node: entry.target,
            distance,
            hops,
            previous: Some(from),
            edge: Some(entry.edge),
            is_reverse: entry.is_reverse,
        });
        self.nodes.len() - 1
    }

    pub(crate) fn get(&self, slot: usize) -> &PathNode {
        &self.nodes[slot]
    }

    /// Rebuild the route from the origin to `slot`
    pub(crate) fn route(&self, slot: usize) -> Route {
        let mut chain = Vec::new();
        let mut cursor = Some(slot);
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            chain.push(node);
            cursor = node.previous;
        }
        chain.reverse();

        let mut route = Route {
            nodes: Vec::with_capacity(chain.len()),
            links: Vec::with_capacity(chain.len().saturating_sub(1)),
            cumulative: Vec::with_capacity(chain.len()),
        };
        for node in chain {
            route.nodes.push(node.node);
            route.cumulative.push(node.distance);
            if let Some(edge) = node.edge {
                route.links.push(Link {
                    edge,
                    is_reverse: node.is_reverse,
                });
            }
        }
        route
    }

    /// Append the chain ending at `slot`, walked from `slot` back to its
    /// origin, to `route`. Every edge is flipped and costs one hop.
    pub(crate) fn append_reversed(&self, slot: usize, route: &mut Route) {
        let mut current = &self.nodes[slot];
        while let (Some(previous), Some(edge)) = (current.previous, current.edge) {
            let next = &self.nodes[previous];
            route.push(
                next.node,
                Link {
                    edge,
                    is_reverse: !current.is_reverse,
                },
                1.0,
            );
            current = next;
        }
    }
}
