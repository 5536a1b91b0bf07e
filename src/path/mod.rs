// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Path finding
//!
//! [`PathFinder`] holds a directed graph and answers `find_path` queries
//! with breadth-first, Dijkstra or bidirectional breadth-first search.
//! Missing endpoints, unreachable targets and timeouts all come back as
//! a [`PathFindingResult`]; nothing here returns `Err`.

mod arena;
mod bfs;
mod bidirectional;
mod budget;
mod dijkstra;
mod k_shortest;

use crate::error::{Error, PathError};
use crate::graph::{DirectedGraph, Direction, WeightStrategy};
use crate::types::{EdgeRecord, NodeRecord};
use arena::Route;
use budget::{SearchBudget, SearchOutcome};
use k_shortest::Cost;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

// =============================================================================
// Options
// =============================================================================

/// Search strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Breadth-first, fewest edges
    #[default]
    Bfs,
    /// Lowest total weight
    Dijkstra,
    /// Breadth-first from both ends, fewest edges
    Bidirectional,
}

impl Algorithm {
    /// Lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bfs => "bfs",
            Self::Dijkstra => "dijkstra",
            Self::Bidirectional => "bidirectional",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bfs" => Ok(Self::Bfs),
            "dijkstra" => Ok(Self::Dijkstra),
            "bidirectional" | "bidi" => Ok(Self::Bidirectional),
            _ => Err(Error::UnknownValue {
                kind: "algorithm",
                value: s.to_string(),
                expected: "bfs, dijkstra, bidirectional",
            }),
        }
    }
}

/// Per-query search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptions {
    /// Search strategy
    pub algorithm: Algorithm,
    /// Maximum number of edges in a returned path
    pub max_length: usize,
    /// Edge orientations the search may follow
    pub direction: Direction,
    /// Edge pricing; only Dijkstra reads it
    pub weight_strategy: WeightStrategy,
    /// Wall-clock budget for the whole query
    pub timeout_ms: u64,
    /// Number of paths to return, shortest first
    pub max_paths: usize,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Bfs,
            max_length: 10,
            direction: Direction::Both,
            weight_strategy: WeightStrategy::Uniform,
            timeout_ms: 5000,
            max_paths: 1,
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// One node on a path and the edge used to reach it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStep {
    /// Node reached
    pub node_id: String,
    /// `None` for the first step
    pub edge_id: Option<String>,
    /// Edge walked against its declared direction
    pub is_reverse: bool,
    /// Cost from the source up to this node
    pub cumulative_weight: f64,
}

/// A path from source to target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    /// `"{source}->{target}#{rank}"`
    pub id: String,
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Nodes in order, starting at the source
    pub steps: Vec<PathStep>,
    /// Edge count for BFS searches, summed weight for Dijkstra
    pub total_weight: f64,
    /// Number of edges
    pub length: usize,
    /// Node ids in order
    pub node_ids: Vec<String>,
    /// Edge ids in order
    pub edge_ids: Vec<String>,
}

impl Path {
    fn from_route(graph: &DirectedGraph, route: &Route, rank: usize) -> Self {
        let index = graph.index();
        let steps: Vec<PathStep> = route
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &node)| {
                let link = i.checked_sub(1).map(|prev| route.links[prev]);
                PathStep {
                    node_id: index.id(node).to_string(),
                    edge_id: link.map(|l| graph.edge(l.edge).id.clone()),
                    is_reverse: link.is_some_and(|l| l.is_reverse),
                    cumulative_weight: route.cumulative[i],
                }
            })
            .collect();

        let node_ids: Vec<String> = steps.iter().map(|s| s.node_id.clone()).collect();
        let edge_ids: Vec<String> = steps.iter().filter_map(|s| s.edge_id.clone()).collect();
        let source = node_ids.first().cloned().unwrap_or_default();
        let target = node_ids.last().cloned().unwrap_or_default();

        Self {
            id: format!("{source}->{target}#{rank}"),
            source,
            target,
            steps,
            total_weight: route.cost(),
            length: route.hops(),
            node_ids,
            edge_ids,
        }
    }
}

/// Outcome of one `find_path` query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathFindingResult {
    /// At least one path was found
    pub found: bool,
    /// Shortest first
    pub paths: Vec<Path>,
    /// Requested source
    pub source_id: String,
    /// Requested target
    pub target_id: String,
    /// Strategy used
    pub algorithm: Algorithm,
    /// Nodes discovered, summed over the primary search and any spur searches
    pub nodes_visited: usize,
    /// Wall-clock time of the query
    pub search_time_ms: f64,
    /// The budget ran out before the search finished
    pub timed_out: bool,
    /// Set when an endpoint is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PathFindingResult {
    fn empty(source: &str, target: &str, algorithm: Algorithm) -> Self {
        Self {
            found: false,
            paths: Vec::new(),
            source_id: source.to_string(),
            target_id: target.to_string(),
            algorithm,
            nodes_visited: 0,
            search_time_ms: 0.0,
            timed_out: false,
            error: None,
        }
    }

    /// The first (shortest) path, if any
    #[must_use]
    pub fn best(&self) -> Option<&Path> {
        self.paths.first()
    }
}

// =============================================================================
// PathFinder
// =============================================================================

/// Path queries over one node/edge set
#[derive(Debug, Default)]
pub struct PathFinder {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    strategy: WeightStrategy,
    graph: DirectedGraph,
}

impl PathFinder {
    /// An empty finder; every query reports a missing source until
    /// [`PathFinder::set_graph`] runs
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the graph. Edges with unknown endpoints are dropped.
    pub fn set_graph(&mut self, nodes: &[NodeRecord], edges: &[EdgeRecord]) {
        self.nodes = nodes.to_vec();
        self.edges = edges.to_vec();
        self.rebuild();
    }

    /// Reweight the held graph
    pub fn set_weight_strategy(&mut self, strategy: WeightStrategy) {
        if strategy != self.strategy {
            self.strategy = strategy;
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        self.graph = DirectedGraph::build(&self.nodes, &self.edges, &self.strategy);
    }

    /// Number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Accepted edges only
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Find up to `options.max_paths` paths from `source` to `target`
    pub fn find_path(&mut self, source: &str, target: &str, options: &PathOptions) -> PathFindingResult {
        let budget = SearchBudget::start(options.timeout_ms);
        let mut result = PathFindingResult::empty(source, target, options.algorithm);

        let endpoints = self.resolve(source, target);
        let (from, to) = match endpoints {
            Ok(pair) => pair,
            Err(err) => {
                debug!(%source, %target, error = %err, "Path endpoint missing");
                result.error = Some(err.to_string());
                result.search_time_ms = budget.elapsed_ms();
                return result;
            }
        };

        if from == to {
            result.found = true;
            result.paths.push(Path::from_route(&self.graph, &Route::single(from), 0));
            result.nodes_visited = 1;
            result.search_time_ms = budget.elapsed_ms();
            return result;
        }

        if options.algorithm == Algorithm::Dijkstra {
            self.set_weight_strategy(options.weight_strategy.clone());
        }

        let graph = &self.graph;
        let SearchOutcome {
            route,
            nodes_visited,
            timed_out,
        } = match options.algorithm {
            Algorithm::Bfs => bfs::search(graph, from, to, options.direction, options.max_length, &budget),
            Algorithm::Dijkstra => {
                dijkstra::search(graph, from, to, options.direction, options.max_length, &budget)
            }
            Algorithm::Bidirectional => {
                bidirectional::search(graph, from, to, options.direction, options.max_length, &budget)
            }
        };
        result.nodes_visited = nodes_visited;
        result.timed_out = timed_out;

        if let Some(route) = route {
            let routes = if options.max_paths > 1 {
                let cost = match options.algorithm {
                    Algorithm::Dijkstra => Cost::Weight,
                    Algorithm::Bfs | Algorithm::Bidirectional => Cost::Hops,
                };
                let ranked = k_shortest::rank(
                    graph,
                    route,
                    options.max_paths,
                    options.direction,
                    options.max_length,
                    cost,
                    &budget,
                );
                result.nodes_visited += ranked.nodes_visited;
                result.timed_out = ranked.timed_out;
                ranked.routes
            } else {
                vec![route]
            };
            result.found = true;
            result.paths = routes
                .iter()
                .enumerate()
                .map(|(rank, route)| Path::from_route(graph, route, rank))
                .collect();
        }
        result.search_time_ms = budget.elapsed_ms();

        if result.timed_out {
            warn!(
                %source,
                %target,
                algorithm = %options.algorithm,
                timeout_ms = options.timeout_ms,
                nodes_visited = result.nodes_visited,
                "Path search timed out"
            );
        } else {
            debug!(
                %source,
                %target,
                algorithm = %options.algorithm,
                found = result.found,
                paths = result.paths.len(),
                nodes_visited = result.nodes_visited,
                elapsed_ms = result.search_time_ms,
                "Path search finished"
            );
        }

        result
    }

    fn resolve(&self, source: &str, target: &str) -> Result<(usize, usize), PathError> {
        let index = self.graph.index();
        let from = index
            .index_of(source)
            .ok_or_else(|| PathError::SourceNotFound(source.to_string()))?;
        let to = index
            .index_of(target)
            .ok_or_else(|| PathError::TargetNotFound(target.to_string()))?;
        Ok((from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finder(ids: &[&str], edges: &[(&str, &str, &str)]) -> PathFinder {
        let nodes: Vec<NodeRecord> = ids.iter().map(|id| NodeRecord::new(*id)).collect();
        let edges: Vec<EdgeRecord> = edges
            .iter()
            .map(|(id, s, t)| EdgeRecord::new(*id, *s, *t))
            .collect();
        let mut finder = PathFinder::new();
        finder.set_graph(&nodes, &edges);
        finder
    }

    fn options(algorithm: Algorithm) -> PathOptions {
        PathOptions {
            algorithm,
            ..PathOptions::default()
        }
    }

    #[test]
    fn test_default_options() {
        let options = PathOptions::default();
        assert_eq!(options.algorithm, Algorithm::Bfs);
        assert_eq!(options.max_length, 10);
        assert_eq!(options.direction, Direction::Both);
        assert_eq!(options.weight_strategy, WeightStrategy::Uniform);
        assert_eq!(options.timeout_ms, 5000);
        assert_eq!(options.max_paths, 1);
    }

    #[test]
    fn test_algorithm_parse_and_display() {
        assert_eq!("Dijkstra".parse::<Algorithm>().unwrap(), Algorithm::Dijkstra);
        assert_eq!("bidi".parse::<Algorithm>().unwrap(), Algorithm::Bidirectional);
        assert_eq!(Algorithm::Bfs.to_string(), "bfs");
        assert!("astar".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_query_before_set_graph_reports_missing_source() {
        let mut finder = PathFinder::new();
        let result = finder.find_path("a", "b", &PathOptions::default());
        assert!(!result.found);
        assert_eq!(result.error.as_deref(), Some("source node not found: a"));
        assert_eq!(result.nodes_visited, 0);
    }

    #[test]
    fn test_missing_target_is_reported() {
        let mut finder = finder(&["a"], &[]);
        let result = finder.find_path("a", "zz", &PathOptions::default());
        assert!(!result.found);
        assert!(!result.timed_out);
        assert_eq!(result.error.as_deref(), Some("target node not found: zz"));
    }

    #[test]
    fn test_same_endpoint_is_trivial() {
        let mut finder = finder(&["a", "b"], &[("ab", "a", "b")]);
        let result = finder.find_path("a", "a", &PathOptions::default());
        assert!(result.found);
        assert_eq!(result.nodes_visited, 1);
        let path = result.best().unwrap();
        assert_eq!(path.length, 0);
        assert_eq!(path.node_ids, vec!["a"]);
        assert!(path.edge_ids.is_empty());
        assert_eq!(path.id, "a->a#0");
    }

    #[test]
    fn test_path_fields_for_reverse_walk() {
        let mut finder = finder(&["a", "b", "c"], &[("ab", "a", "b"), ("cb", "c", "b")]);
        let result = finder.find_path("a", "c", &options(Algorithm::Bfs));
        let path = result.best().unwrap();
        assert_eq!(path.node_ids, vec!["a", "b", "c"]);
        assert_eq!(path.edge_ids, vec!["ab", "cb"]);
        assert_eq!(path.length, 2);
        assert!((path.total_weight - 2.0).abs() < f64::EPSILON);
        assert!(!path.steps[1].is_reverse);
        assert!(path.steps[2].is_reverse);
        assert_eq!(path.steps[0].edge_id, None);
        assert_eq!(path.id, "a->c#0");
    }

    #[test]
    fn test_dijkstra_reads_weight_strategy() {
        let nodes: Vec<NodeRecord> = ["a", "b", "c"].iter().map(|id| NodeRecord::new(*id)).collect();
        let edges = vec![
            EdgeRecord::new("ac", "a", "c").with_weight(9.0),
            EdgeRecord::new("ab", "a", "b").with_weight(1.0),
            EdgeRecord::new("bc", "b", "c").with_weight(1.0),
        ];
        let mut finder = PathFinder::new();
        finder.set_graph(&nodes, &edges);

        let uniform = finder.find_path("a", "c", &options(Algorithm::Dijkstra));
        assert_eq!(uniform.best().unwrap().length, 1);

        let weighted = PathOptions {
            algorithm: Algorithm::Dijkstra,
            weight_strategy: WeightStrategy::Property,
            ..PathOptions::default()
        };
        let result = finder.find_path("a", "c", &weighted);
        let path = result.best().unwrap();
        assert_eq!(path.node_ids, vec!["a", "b", "c"]);
        assert!((path.total_weight - 2.0).abs() < f64::EPSILON);
        assert_eq!(finder.edge_count(), 3);
    }

    #[test]
    fn test_max_paths_returns_ranked_paths() {
        let mut finder = finder(
            &["a", "b", "c", "d"],
            &[("ab", "a", "b"), ("bd", "b", "d"), ("ac", "a", "c"), ("cd", "c", "d")],
        );
        let options = PathOptions {
            max_paths: 3,
            ..PathOptions::default()
        };
        let result = finder.find_path("a", "d", &options);
        assert_eq!(result.paths.len(), 2);
        assert_eq!(result.paths[1].id, "a->d#1");
        assert!(result.paths.iter().all(|p| p.length == 2));

        // Spur searches add to the primary search's count
        let single = finder.find_path("a", "d", &PathOptions::default());
        assert!(result.nodes_visited > single.nodes_visited);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let mut finder = finder(&["a", "b"], &[("ab", "a", "b")]);
        let result = finder.find_path("a", "b", &PathOptions::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["sourceId"], "a");
        assert_eq!(json["algorithm"], "bfs");
        assert_eq!(json["paths"][0]["nodeIds"][1], "b");
        assert_eq!(json["paths"][0]["steps"][1]["cumulativeWeight"], 1.0);
        assert!(json.get("error").is_none());
    }
}
