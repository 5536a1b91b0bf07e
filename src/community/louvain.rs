// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Louvain local moving and aggregation
//!
//! 1. **Local moving**: every node starts alone; nodes are visited (in a
//!    seeded shuffled order) and moved to the neighboring community with the
//!    largest positive gain `k_i,in(C) - γ·Σtot(C)·k_i / 2m`.
//! 2. **Aggregation**: each community collapses into one super-node.
//!    Internal edges become a self-loop, external edges are summed.
//! 3. Repeat on the aggregated graph until nothing compresses.
//!
//! Blondel et al. (2008). "Fast unfolding of communities in large networks."

use super::DetectionConfig;
use crate::graph::WeightedGraph;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// One level of the multi-level hierarchy
#[derive(Debug, Clone)]
pub(crate) struct LevelGraph {
    /// Off-diagonal neighbors, sorted by index
    adjacency: Vec<Vec<(usize, f64)>>,
    /// Diagonal entry `A_ii`, already counted from both endpoints
    self_loops: Vec<f64>,
    degrees: Vec<f64>,
    total_weight: f64,
}

impl LevelGraph {
    pub(crate) fn from_graph(graph: &WeightedGraph) -> Self {
        let n = graph.node_count();
        let mut adjacency = Vec::with_capacity(n);
        let mut self_loops = vec![0.0; n];
        for (node, self_loop) in self_loops.iter_mut().enumerate() {
            let mut row = Vec::with_capacity(graph.neighbors(node).len());
            for &(neighbor, w) in graph.neighbors(node) {
                if neighbor == node {
                    *self_loop += w;
                } else {
                    row.push((neighbor, w));
                }
            }
            adjacency.push(row);
        }
        Self {
            adjacency,
            self_loops,
            degrees: graph.degrees().to_vec(),
            total_weight: graph.total_weight(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.degrees.len()
    }
}

/// Per-node accumulator of edge weight towards each neighboring community
struct NeighborWeights {
    weights: Vec<f64>,
    marked: Vec<bool>,
    touched: Vec<usize>,
}

impl NeighborWeights {
    fn new(n: usize) -> Self {
        Self {
            weights: vec![0.0; n],
            marked: vec![false; n],
            touched: Vec::new(),
        }
    }

    fn add(&mut self, community: usize, w: f64) {
        if !self.marked[community] {
            self.marked[community] = true;
            self.touched.push(community);
        }
        self.weights[community] += w;
    }

    fn get(&self, community: usize) -> f64 {
        self.weights[community]
    }

    fn clear(&mut self) {
        for &c in &self.touched {
            self.weights[c] = 0.0;
            self.marked[c] = false;
        }
        self.touched.clear();
    }
}

/// Outcome of one local-moving phase
#[derive(Debug, Clone)]
pub(crate) struct LocalMoves {
    /// Community label per level node (labels are level node indices)
    pub membership: Vec<usize>,
    /// Whether each level node changed community at least once
    pub moved: Vec<bool>,
    /// Passes over the node set
    pub passes: usize,
    /// Modularity of `membership` on this level's graph
    pub modularity: f64,
}

/// Phase 1: greedy node moves until a pass moves nothing or the pass budget
/// is spent. `rng` shuffles the visit order each pass when present.
pub(crate) fn local_moving(
    graph: &LevelGraph,
    resolution: f64,
    max_passes: usize,
    mut rng: Option<&mut StdRng>,
) -> LocalMoves {
    let n = graph.len();
    let m2 = graph.total_weight;
    let mut membership: Vec<usize> = (0..n).collect();
    let mut moved = vec![false; n];
    let mut sigma_tot = graph.degrees.clone();
    let mut internal = graph.self_loops.clone();
    let mut order: Vec<usize> = (0..n).collect();
    let mut neighbor_weights = NeighborWeights::new(n);
    let mut passes = 0;

    for pass in 0..max_passes {
        if let Some(rng) = rng.as_deref_mut() {
            order.shuffle(rng);
        }
        passes += 1;
        let mut moves = 0usize;

        for &node in &order {
            let current = membership[node];
            let k_i = graph.degrees[node];
            for &(neighbor, w) in &graph.adjacency[node] {
                neighbor_weights.add(membership[neighbor], w);
            }

            // Take the node out of its community
            let k_in_current = neighbor_weights.get(current);
            sigma_tot[current] -= k_i;
            internal[current] -= 2.0 * k_in_current + graph.self_loops[node];

            let gain = |k_in: f64, tot: f64| k_in - resolution * tot * k_i / m2;
            let mut best = current;
            let mut best_gain = gain(k_in_current, sigma_tot[current]);
            for &community in &neighbor_weights.touched {
                if community == current {
                    continue;
                }
                let candidate = gain(neighbor_weights.get(community), sigma_tot[community]);
                if candidate > best_gain && candidate > 0.0 {
                    best = community;
                    best_gain = candidate;
                }
            }

            sigma_tot[best] += k_i;
            internal[best] += 2.0 * neighbor_weights.get(best) + graph.self_loops[node];
            if best != current {
                membership[node] = best;
                moved[node] = true;
                moves += 1;
            }
            neighbor_weights.clear();
        }

        trace!(pass, moves, "Local moving pass");
        if moves == 0 {
            break;
        }
    }

    let modularity = (0..n)
        .map(|c| internal[c] / m2 - resolution * (sigma_tot[c] / m2).powi(2))
        .sum();

    LocalMoves {
        membership,
        moved,
        passes,
        modularity,
    }
}

/// Phase 2: collapse each community into a super-node.
///
/// Returns the aggregated graph and, per level node, its super-node index.
/// Super-nodes are numbered by first encounter in level-node order.
pub(crate) fn aggregate(graph: &LevelGraph, membership: &[usize]) -> (LevelGraph, Vec<usize>) {
    let mut relabel = vec![usize::MAX; graph.len()];
    let mut count = 0;
    let super_of: Vec<usize> = membership
        .iter()
        .map(|&c| {
            if relabel[c] == usize::MAX {
                relabel[c] = count;
                count += 1;
            }
            relabel[c]
        })
        .collect();

    let mut rows: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
    let mut self_loops = vec![0.0; count];
    let mut degrees = vec![0.0; count];
    for (node, &s) in super_of.iter().enumerate() {
        self_loops[s] += graph.self_loops[node];
        degrees[s] += graph.degrees[node];
        for &(neighbor, w) in &graph.adjacency[node] {
            let t = super_of[neighbor];
            if s == t {
                // Seen from both endpoints, so the loop carries 2w
                self_loops[s] += w;
            } else {
                *rows[s].entry(t).or_insert(0.0) += w;
            }
        }
    }

    let next = LevelGraph {
        adjacency: rows.into_iter().map(|row| row.into_iter().collect()).collect(),
        self_loops,
        degrees,
        total_weight: graph.total_weight,
    };
    (next, super_of)
}

/// Result of the full multi-level run, on original node indices
#[derive(Debug, Clone)]
pub(crate) struct LouvainOutcome {
    /// Final community label per original node (not yet contiguous)
    pub membership: Vec<usize>,
    /// Last level at which each node's community changed
    pub node_levels: Vec<usize>,
    /// Total local-moving passes
    pub iterations: usize,
    /// Levels whose local-moving phase ran
    pub levels: usize,
}

/// Run local moving and aggregation until aggregation stops compressing.
///
/// The graph must carry positive total weight.
pub(crate) fn run(graph: &WeightedGraph, config: &DetectionConfig) -> LouvainOutcome {
    let n = graph.node_count();
    let seed = config.random_seed.unwrap_or_else(rand::random);
    debug!(
        seed,
        resolution = config.resolution,
        max_iterations = config.max_iterations,
        min_modularity_gain = config.min_modularity_gain,
        "Starting Louvain"
    );
    let mut rng = StdRng::seed_from_u64(seed);

    let mut level_graph = LevelGraph::from_graph(graph);
    let mut node_to_super: Vec<usize> = (0..n).collect();
    let mut node_levels = vec![0; n];
    let mut iterations = 0;
    let mut levels = 0;

    loop {
        let level = levels;
        let moves = local_moving(
            &level_graph,
            config.resolution,
            config.max_iterations,
            config.randomize_order.then_some(&mut rng),
        );
        iterations += moves.passes;
        levels += 1;

        let mut seen = vec![false; level_graph.len()];
        let communities = moves
            .membership
            .iter()
            .filter(|&&c| !std::mem::replace(&mut seen[c], true))
            .count();
        debug!(
            level,
            nodes = level_graph.len(),
            communities,
            passes = moves.passes,
            modularity = moves.modularity,
            "Louvain level complete"
        );

        if communities == level_graph.len() {
            break;
        }

        for (original, &super_node) in node_to_super.iter().enumerate() {
            if moves.moved[super_node] {
                node_levels[original] = level;
            }
        }
        let (next, super_of) = aggregate(&level_graph, &moves.membership);
        for super_node in &mut node_to_super {
            *super_node = super_of[*super_node];
        }
        if communities == 1 {
            break;
        }
        level_graph = next;
    }

    LouvainOutcome {
        membership: node_to_super,
        node_levels,
        iterations,
        levels,
    }
}
