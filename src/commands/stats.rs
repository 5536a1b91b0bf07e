// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Stats command - structural summary of a graph document

use super::Output;
use crate::graph::{connected_components, WeightedGraph};
use crate::input;
use crate::types::GraphInput;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Structural summary of a graph
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    /// Distinct node ids
    pub nodes: usize,
    /// Edges with both endpoints present
    pub edges: usize,
    /// Edges referencing unknown nodes
    pub dropped_edges: usize,
    /// Edges from a node to itself
    pub self_loops: usize,
    /// Nodes with no incident edge
    pub isolated_nodes: usize,
    /// Connected components, ignoring direction
    pub components: usize,
    /// Node count of the largest component
    pub largest_component: usize,
    /// Sum of accepted edge weights
    pub total_weight: f64,
}

impl GraphStats {
    /// Summarize `input`
    #[must_use]
    pub fn compute(input: &GraphInput) -> Self {
        let graph = WeightedGraph::build(&input.nodes, &input.edges, true, 1.0);
        let labels = connected_components(&graph);

        let mut sizes = vec![0usize; labels.iter().max().map_or(0, |max| max + 1)];
        for &label in &labels {
            sizes[label] += 1;
        }

        let index = graph.index();
        let self_loops = input
            .edges
            .iter()
            .filter(|edge| {
                edge.source.id() == edge.target.id() && index.index_of(edge.source.id()).is_some()
            })
            .count();
        let isolated_nodes = (0..graph.node_count())
            .filter(|&node| graph.neighbors(node).is_empty())
            .count();

        let stats = graph.stats();
        Self {
            nodes: graph.node_count(),
            edges: stats.accepted_edges,
            dropped_edges: stats.dropped_edges,
            self_loops,
            isolated_nodes,
            components: sizes.len(),
            largest_component: sizes.iter().copied().max().unwrap_or(0),
            total_weight: graph.total_weight() / 2.0,
        }
    }
}

/// Run the stats command
pub fn run(path: &Path, out: Output) -> Result<()> {
    let input = input::load(path)
        .with_context(|| format!("Failed to load graph from {}", path.display()))?;
    let stats = GraphStats::compute(&input);

    if out.json {
        return out.print_json(&stats);
    }

    println!("{}", out.heading(path.display()));
    println!("  nodes              {}", out.accent(stats.nodes));
    println!("  edges              {}", out.accent(stats.edges));
    if stats.dropped_edges > 0 {
        println!(
            "  dropped edges      {}",
            out.warn(stats.dropped_edges)
        );
    }
    println!("  self-loops         {}", stats.self_loops);
    println!("  isolated nodes     {}", stats.isolated_nodes);
    println!("  components         {}", stats.components);
    println!("  largest component  {}", stats.largest_component);
    println!("  total weight       {:.2}", stats.total_weight);
    Ok(())
}
