// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Community detection
//!
//! Partitions a node/edge graph into densely connected communities with the
//! Louvain method and scores the result with modularity:
//!
//! ```text
//! Q = (1/2m) × Σ_{i<j} [w_ij − γ·k_i·k_j / 2m] × δ(c_i, c_j)
//! ```
//!
//! Higher resolution `γ` favors smaller communities. Every input node gets
//! exactly one assignment and community ids are contiguous from zero.
//! Degenerate inputs (empty graph, no edges, a single node) return
//! well-formed trivial results instead of errors.

mod louvain;
mod modularity;

pub use modularity::modularity;

use crate::graph::WeightedGraph;
use crate::types::{EdgeRecord, NodeRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use tracing::debug;

// =============================================================================
// Configuration
// =============================================================================

/// Louvain tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Resolution `γ`; higher values produce smaller communities
    pub resolution: f64,
    /// Maximum local-moving passes per level
    pub max_iterations: usize,
    /// Accepted and logged, but does not gate the local-moving loop
    pub min_modularity_gain: f64,
    /// Read edge weights instead of `default_weight`
    pub use_weights: bool,
    /// Weight for edges without a usable weight
    pub default_weight: f64,
    /// Seed for the visit-order shuffle; drawn at random when absent
    pub random_seed: Option<u64>,
    /// Shuffle the node visit order on every pass
    pub randomize_order: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_iterations: 10,
            min_modularity_gain: 0.0001,
            use_weights: true,
            default_weight: 1.0,
            random_seed: None,
            randomize_order: true,
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Final community of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityAssignment {
    /// Node id
    pub node_id: String,
    /// Contiguous community id
    pub community_id: usize,
    /// Share of the node's weighted degree inside its community
    pub confidence: f64,
    /// Last aggregation level at which the node changed community
    pub level: usize,
}

/// One detected community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    /// Contiguous community id
    pub id: usize,
    /// Number of members
    pub size: usize,
    /// Member node ids in input order
    pub members: Vec<String>,
    /// Weight of edges with both endpoints inside, each counted once
    pub internal_weight: f64,
    /// Sum of member weighted degrees
    pub total_degree: f64,
}

/// Summed edge weight between two communities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityLink {
    /// Lower community id
    pub source: usize,
    /// Higher community id
    pub target: usize,
    /// Total weight of edges crossing between them
    pub weight: f64,
}

/// Output of [`CommunityDetector::detect`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityDetectionResult {
    /// Assignment per node id
    pub assignments: BTreeMap<String, CommunityAssignment>,
    /// Communities ordered by id
    pub communities: Vec<Community>,
    /// Inter-community weights, for boundary rendering
    pub links: Vec<CommunityLink>,
    /// Modularity of the final partition on the original graph
    pub modularity: f64,
    /// Total local-moving passes across all levels
    pub iterations: usize,
    /// Wall-clock time in milliseconds
    #[serde(rename = "computeTime")]
    pub compute_time_ms: f64,
    /// Levels whose local-moving phase ran
    pub levels: usize,
}

impl CommunityDetectionResult {
    /// Number of communities
    #[must_use]
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    /// Whether no communities were found (empty graph)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// Community id of a node
    #[must_use]
    pub fn community_of(&self, node_id: &str) -> Option<usize> {
        self.assignments.get(node_id).map(|a| a.community_id)
    }

    /// Members of a community
    #[must_use]
    pub fn members_of(&self, community_id: usize) -> Option<&[String]> {
        self.communities
            .get(community_id)
            .map(|c| c.members.as_slice())
    }
}

// =============================================================================
// Detector
// =============================================================================

/// Louvain community detector
#[derive(Debug, Clone, Default)]
pub struct CommunityDetector {
    config: DetectionConfig,
}

impl CommunityDetector {
    /// Create a detector with the given configuration
    #[must_use]
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Partition the graph into communities.
    ///
    /// Edges with unknown endpoints are ignored. Identical input and
    /// `random_seed` give identical output.
    #[must_use]
    pub fn detect(&self, nodes: &[NodeRecord], edges: &[EdgeRecord]) -> CommunityDetectionResult {
        let started = Instant::now();
        let graph = WeightedGraph::build(
            nodes,
            edges,
            self.config.use_weights,
            self.config.default_weight,
        );
        let n = graph.node_count();

        if n == 0 {
            debug!("Empty graph, no communities");
            return CommunityDetectionResult {
                compute_time_ms: elapsed_ms(started),
                ..CommunityDetectionResult::default()
            };
        }

        let (membership, node_levels, iterations, levels) = if graph.total_weight() > 0.0 {
            let outcome = louvain::run(&graph, &self.config);
            (
                outcome.membership,
                outcome.node_levels,
                outcome.iterations,
                outcome.levels,
            )
        } else {
            debug!(nodes = n, "Graph carries no edge weight, keeping singletons");
            ((0..n).collect(), vec![0; n], 1, 1)
        };

        let mut result = self.finalize(&graph, &membership, &node_levels);
        result.iterations = iterations;
        result.levels = levels;
        result.compute_time_ms = elapsed_ms(started);

        debug!(
            nodes = n,
            communities = result.len(),
            modularity = result.modularity,
            levels,
            iterations,
            "Community detection complete"
        );
        result
    }

    /// Renumber communities by first encounter and derive the result records
    fn finalize(
        &self,
        graph: &WeightedGraph,
        membership: &[usize],
        node_levels: &[usize],
    ) -> CommunityDetectionResult {
        let n = graph.node_count();
        let mut relabel = vec![usize::MAX; n];
        let mut communities: Vec<Community> = Vec::new();
        let mut final_membership = Vec::with_capacity(n);

        for (node, &label) in membership.iter().enumerate() {
            if relabel[label] == usize::MAX {
                relabel[label] = communities.len();
                communities.push(Community {
                    id: communities.len(),
                    size: 0,
                    members: Vec::new(),
                    internal_weight: 0.0,
                    total_degree: 0.0,
                });
            }
            let id = relabel[label];
            let community = &mut communities[id];
            community.size += 1;
            community.members.push(graph.index().id(node).to_string());
            community.total_degree += graph.degree(node);
            final_membership.push(id);
        }

        let mut assignments = BTreeMap::new();
        let mut crossing: HashMap<(usize, usize), f64> = HashMap::new();
        for (node, &id) in final_membership.iter().enumerate() {
            let mut inside = 0.0;
            for &(neighbor, w) in graph.neighbors(node) {
                let other = final_membership[neighbor];
                if other == id {
                    inside += w;
                } else if id < other {
                    *crossing.entry((id, other)).or_insert(0.0) += w;
                }
            }
            communities[id].internal_weight += inside / 2.0;

            let degree = graph.degree(node);
            let node_id = graph.index().id(node).to_string();
            assignments.insert(
                node_id.clone(),
                CommunityAssignment {
                    node_id,
                    community_id: id,
                    confidence: if degree > 0.0 { (inside / degree).min(1.0) } else { 1.0 },
                    level: node_levels[node],
                },
            );
        }

        let mut links: Vec<CommunityLink> = crossing
            .into_iter()
            .map(|((source, target), weight)| CommunityLink {
                source,
                target,
                weight,
            })
            .collect();
        links.sort_by_key(|link| (link.source, link.target));

        CommunityDetectionResult {
            assignments,
            communities,
            links,
            modularity: modularity(graph, &final_membership, self.config.resolution),
            ..CommunityDetectionResult::default()
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
