// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Dense graph structures built from caller node/edge records
//!
//! Both consumers index the string ids once, up front, and work on `usize`
//! indices and flat vectors afterwards. Edges referencing unknown ids are
//! dropped silently; the count is only logged.

use crate::error::Error;
use crate::types::{EdgeRecord, NodeRecord};
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

// =============================================================================
// Node Index
// =============================================================================

/// Bidirectional map between node ids and dense indices
#[derive(Debug, Clone, Default)]
pub struct NodeIndexMap {
    ids: Vec<String>,
    indices: HashMap<String, usize>,
}

impl NodeIndexMap {
    /// Index a node list. The first occurrence of a duplicate id wins.
    #[must_use]
    pub fn from_nodes(nodes: &[NodeRecord]) -> Self {
        let mut map = Self {
            ids: Vec::with_capacity(nodes.len()),
            indices: HashMap::with_capacity(nodes.len()),
        };
        for node in nodes {
            if !map.indices.contains_key(&node.id) {
                map.indices.insert(node.id.clone(), map.ids.len());
                map.ids.push(node.id.clone());
            }
        }
        map
    }

    /// Dense index of a node id
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.indices.get(id).copied()
    }

    /// Node id at a dense index
    #[must_use]
    pub fn id(&self, index: usize) -> &str {
        &self.ids[index]
    }

    /// All ids in index order
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of distinct nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no nodes were indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn endpoints(&self, edge: &EdgeRecord) -> Option<(usize, usize)> {
        Some((
            self.index_of(edge.source.id())?,
            self.index_of(edge.target.id())?,
        ))
    }
}

/// Edge acceptance counts for one build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Edges whose endpoints both resolved
    pub accepted_edges: usize,
    /// Edges dropped for referencing unknown nodes
    pub dropped_edges: usize,
}

// =============================================================================
// Undirected Weighted Graph (community detection)
// =============================================================================

/// Undirected weighted adjacency used by community detection
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    index: NodeIndexMap,
    /// Per node, `(neighbor, weight)` sorted by neighbor; parallel edges summed
    adjacency: Vec<Vec<(usize, f64)>>,
    degrees: Vec<f64>,
    /// Sum of edge weights counted from both endpoints (`2m`)
    total_weight: f64,
    stats: BuildStats,
}

impl WeightedGraph {
    /// Build the undirected structure.
    ///
    /// Each accepted edge adds its weight to `adjacency[s][t]` and
    /// `adjacency[t][s]`, so a self-loop contributes twice to its node.
    /// When `use_weights` is off, or an edge carries no usable weight,
    /// `default_weight` is used.
    #[must_use]
    pub fn build(
        nodes: &[NodeRecord],
        edges: &[EdgeRecord],
        use_weights: bool,
        default_weight: f64,
    ) -> Self {
        let index = NodeIndexMap::from_nodes(nodes);
        let n = index.len();
        let mut rows: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        let mut degrees = vec![0.0; n];
        let mut total_weight = 0.0;
        let mut stats = BuildStats::default();

        for edge in edges {
            let Some((s, t)) = index.endpoints(edge) else {
                stats.dropped_edges += 1;
                continue;
            };
            let w = match edge.weight {
                Some(w) if use_weights && w.is_finite() && w >= 0.0 => w,
                _ => default_weight,
            };
            *rows[s].entry(t).or_insert(0.0) += w;
            *rows[t].entry(s).or_insert(0.0) += w;
            degrees[s] += w;
            degrees[t] += w;
            total_weight += 2.0 * w;
            stats.accepted_edges += 1;
        }

        debug!(
            nodes = n,
            accepted = stats.accepted_edges,
            dropped = stats.dropped_edges,
            "Built weighted graph"
        );

        Self {
            index,
            adjacency: rows.into_iter().map(|row| row.into_iter().collect()).collect(),
            degrees,
            total_weight,
            stats,
        }
    }

    /// Id/index table
    #[must_use]
    pub fn index(&self) -> &NodeIndexMap {
        &self.index
    }

    /// Number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// Neighbors of a node with summed weights, including a self-loop entry
    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[(usize, f64)] {
        &self.adjacency[node]
    }

    /// Weighted degree of a node
    #[must_use]
    pub fn degree(&self, node: usize) -> f64 {
        self.degrees[node]
    }

    /// All weighted degrees
    #[must_use]
    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }

    /// Total weight `2m`
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Edge acceptance counts
    #[must_use]
    pub fn stats(&self) -> BuildStats {
        self.stats
    }
}

/// Connected component label per node, numbered by first encounter
#[must_use]
pub fn connected_components(graph: &WeightedGraph) -> Vec<usize> {
    let n = graph.node_count();
    let mut sets = UnionFind::<usize>::new(n);
    for node in 0..n {
        for &(neighbor, _) in graph.neighbors(node) {
            sets.union(node, neighbor);
        }
    }

    let mut labels = vec![usize::MAX; n];
    let mut next = 0;
    sets.into_labeling()
        .into_iter()
        .map(|root| {
            if labels[root] == usize::MAX {
                labels[root] = next;
                next += 1;
            }
            labels[root]
        })
        .collect()
}

// =============================================================================
// Directed Graph (path finding)
// =============================================================================

/// An accepted edge with resolved endpoint indices
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    /// Edge id from the input
    pub id: String,
    /// Source node index
    pub source: usize,
    /// Target node index
    pub target: usize,
    /// Weight from the input, if any
    pub weight: Option<f64>,
    /// Predicate from the input, if any
    pub predicate: Option<String>,
}

/// One traversable step out of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjacencyEntry {
    /// Node reached by this step
    pub target: usize,
    /// Index of the edge in [`DirectedGraph::edge`]
    pub edge: usize,
    /// Cost of the step under the build's weight strategy
    pub weight: f64,
    /// Whether the edge is walked against its declared direction
    pub is_reverse: bool,
}

/// Forward and reverse adjacency used by path finding
#[derive(Debug, Clone, Default)]
pub struct DirectedGraph {
    index: NodeIndexMap,
    edges: Vec<GraphEdge>,
    forward: Vec<Vec<AdjacencyEntry>>,
    reverse: Vec<Vec<AdjacencyEntry>>,
    stats: BuildStats,
}

impl DirectedGraph {
    /// Build forward/reverse adjacency, weighting every edge with `strategy`
    #[must_use]
    pub fn build(nodes: &[NodeRecord], edges: &[EdgeRecord], strategy: &WeightStrategy) -> Self {
        let index = NodeIndexMap::from_nodes(nodes);
        let n = index.len();
        let mut graph = Self {
            forward: vec![Vec::new(); n],
            reverse: vec![Vec::new(); n],
            edges: Vec::with_capacity(edges.len()),
            stats: BuildStats::default(),
            index,
        };

        for record in edges {
            let Some((source, target)) = graph.index.endpoints(record) else {
                graph.stats.dropped_edges += 1;
                continue;
            };
            let edge = GraphEdge {
                id: record.id.clone(),
                source,
                target,
                weight: record.weight,
                predicate: record.predicate.clone(),
            };
            let weight = strategy.weight_of(&edge);
            let slot = graph.edges.len();
            graph.forward[source].push(AdjacencyEntry {
                target,
                edge: slot,
                weight,
                is_reverse: false,
            });
            graph.reverse[target].push(AdjacencyEntry {
                target: source,
                edge: slot,
                weight,
                is_reverse: true,
            });
            graph.edges.push(edge);
            graph.stats.accepted_edges += 1;
        }

        debug!(
            nodes = n,
            accepted = graph.stats.accepted_edges,
            dropped = graph.stats.dropped_edges,
            strategy = strategy.name(),
            "Built directed graph"
        );

        graph
    }

    /// Id/index table
    #[must_use]
    pub fn index(&self) -> &NodeIndexMap {
        &self.index
    }

    /// Number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// Number of accepted edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Accepted edge by index
    #[must_use]
    pub fn edge(&self, edge: usize) -> &GraphEdge {
        &self.edges[edge]
    }

    /// Edge acceptance counts
    #[must_use]
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Steps out of `node` permitted by `direction`
    pub fn neighbors(
        &self,
        node: usize,
        direction: Direction,
    ) -> impl Iterator<Item = &AdjacencyEntry> + '_ {
        let forward = match direction {
            Direction::Outgoing | Direction::Both => self.forward[node].as_slice(),
            Direction::Incoming => &[],
        };
        let reverse = match direction {
            Direction::Incoming | Direction::Both => self.reverse[node].as_slice(),
            Direction::Outgoing => &[],
        };
        forward.iter().chain(reverse.iter())
    }
}

// =============================================================================
// Direction
// =============================================================================

/// Which edge orientations a search may follow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow edges source to target only
    Outgoing,
    /// Follow edges target to source only
    Incoming,
    /// Follow edges either way
    #[default]
    Both,
}

impl Direction {
    /// The orientation a backward frontier must use
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Outgoing => Self::Incoming,
            Self::Incoming => Self::Outgoing,
            Self::Both => Self::Both,
        }
    }

    /// Lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outgoing => "outgoing",
            Self::Incoming => "incoming",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "outgoing" | "out" => Ok(Self::Outgoing),
            "incoming" | "in" => Ok(Self::Incoming),
            "both" | "any" => Ok(Self::Both),
            _ => Err(Error::UnknownValue {
                kind: "direction",
                value: s.to_string(),
                expected: "outgoing, incoming, both",
            }),
        }
    }
}

// =============================================================================
// Weight Strategies
// =============================================================================

/// Caller-supplied edge cost function
pub type EdgeWeightFn = Arc<dyn Fn(&GraphEdge) -> f64 + Send + Sync>;

/// Weights for predicate-driven costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredicateWeights {
    /// Predicates that make an edge cheaper
    pub preferred: Vec<String>,
    /// Predicates that make an edge more expensive
    pub avoided: Vec<String>,
    /// Cost of a preferred edge
    pub preferred_weight: f64,
    /// Cost of an avoided edge
    pub avoided_weight: f64,
    /// Cost of any other edge
    pub default_weight: f64,
}

impl Default for PredicateWeights {
    fn default() -> Self {
        Self {
            preferred: Vec::new(),
            avoided: Vec::new(),
            preferred_weight: 0.5,
            avoided_weight: 5.0,
            default_weight: 1.0,
        }
    }
}

/// How a path search prices each edge
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WeightStrategy {
    /// Every edge costs 1
    #[default]
    Uniform,
    /// The edge's own weight, 1 when absent
    Property,
    /// Cost chosen by the edge predicate
    Predicate(PredicateWeights),
    /// Caller-supplied function
    #[serde(skip)]
    Custom(EdgeWeightFn),
}

impl WeightStrategy {
    /// Wrap a cost function
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&GraphEdge) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Cost of one edge. Negative or non-finite costs are replaced by 1.
    #[must_use]
    pub fn weight_of(&self, edge: &GraphEdge) -> f64 {
        let w = match self {
            Self::Uniform => 1.0,
            Self::Property => edge.weight.unwrap_or(1.0),
            Self::Predicate(p) => match edge.predicate.as_deref() {
                Some(pred) if p.preferred.iter().any(|x| x == pred) => p.preferred_weight,
                Some(pred) if p.avoided.iter().any(|x| x == pred) => p.avoided_weight,
                _ => p.default_weight,
            },
            Self::Custom(f) => f(edge),
        };
        if w.is_finite() && w >= 0.0 {
            w
        } else {
            1.0
        }
    }

    /// Short name for logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Property => "property",
            Self::Predicate(_) => "predicate",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for WeightStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => f.write_str("Uniform"),
            Self::Property => f.write_str("Property"),
            Self::Predicate(p) => f.debug_tuple("Predicate").field(p).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl PartialEq for WeightStrategy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Uniform, Self::Uniform) | (Self::Property, Self::Property) => true,
            (Self::Predicate(a), Self::Predicate(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
