// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Partition quality

use crate::graph::WeightedGraph;

/// Modularity of a partition on the original graph.
///
/// ```text
/// Q = (1/2m) · Σ_{i<j, c_i = c_j} (w_ij − γ·k_i·k_j / 2m)
/// ```
///
/// Each unordered pair of distinct nodes is counted once; the per-community
/// sum of `k_i·k_j` is taken as `((Σk)² − Σk²) / 2`. Returns `0.0` for a
/// graph without weight.
///
/// `membership[i]` is the community of node `i`; labels need not be
/// contiguous but must be smaller than the node count.
#[must_use]
pub fn modularity(graph: &WeightedGraph, membership: &[usize], resolution: f64) -> f64 {
    let m2 = graph.total_weight();
    if m2 <= 0.0 {
        return 0.0;
    }

    let n = graph.node_count();
    let mut pair_weight = vec![0.0; n];
    let mut degree_sum = vec![0.0; n];
    let mut degree_sq = vec![0.0; n];

    for (node, &community) in membership.iter().enumerate().take(n) {
        let k = graph.degree(node);
        degree_sum[community] += k;
        degree_sq[community] += k * k;
        for &(neighbor, w) in graph.neighbors(node) {
            if neighbor > node && membership[neighbor] == community {
                pair_weight[community] += w;
            }
        }
    }

    let q: f64 = (0..n)
        .map(|c| pair_weight[c] - resolution * (degree_sum[c].powi(2) - degree_sq[c]) / (2.0 * m2))
        .sum();
    q / m2
}
