// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Path command - find paths between two nodes of a graph document

use super::Output;
use crate::graph::{Direction, PredicateWeights, WeightStrategy};
use crate::input;
use crate::path::{Algorithm, PathFinder, PathFindingResult, PathOptions};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tracing::info;

/// Edge pricing selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Weights {
    /// Every edge costs 1
    Uniform,
    /// Use each edge's `weight`
    Property,
    /// Price by predicate with `--prefer` / `--avoid`
    Predicate,
}

/// Arguments for `graphlens path`
#[derive(Debug, Clone, Args)]
pub struct PathArgs {
    /// Graph document (JSON), or `-` for stdin
    pub input: PathBuf,

    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Search algorithm (bfs, dijkstra, bidirectional)
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    /// Maximum edges in a path
    #[arg(short = 'l', long)]
    pub max_length: Option<usize>,

    /// Edge orientation (outgoing, incoming, both)
    #[arg(short, long)]
    pub direction: Option<Direction>,

    /// Edge pricing for dijkstra
    #[arg(short, long, value_enum)]
    pub weights: Option<Weights>,

    /// Cheaper predicates for `--weights predicate`
    #[arg(long, value_delimiter = ',')]
    pub prefer: Vec<String>,

    /// Costlier predicates for `--weights predicate`
    #[arg(long, value_delimiter = ',')]
    pub avoid: Vec<String>,

    /// Search timeout in milliseconds
    #[arg(short, long)]
    pub timeout_ms: Option<u64>,

    /// Number of paths to return
    #[arg(short = 'k', long)]
    pub max_paths: Option<usize>,
}

impl PathArgs {
    /// Layer the flags over configured defaults
    #[must_use]
    pub fn apply(&self, mut options: PathOptions) -> PathOptions {
        if let Some(algorithm) = self.algorithm {
            options.algorithm = algorithm;
        }
        if let Some(max_length) = self.max_length {
            options.max_length = max_length;
        }
        if let Some(direction) = self.direction {
            options.direction = direction;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            options.timeout_ms = timeout_ms;
        }
        if let Some(max_paths) = self.max_paths {
            options.max_paths = max_paths;
        }
        match self.weights {
            Some(Weights::Uniform) => options.weight_strategy = WeightStrategy::Uniform,
            Some(Weights::Property) => options.weight_strategy = WeightStrategy::Property,
            Some(Weights::Predicate) => {
                options.weight_strategy = WeightStrategy::Predicate(PredicateWeights {
                    preferred: self.prefer.clone(),
                    avoided: self.avoid.clone(),
                    ..PredicateWeights::default()
                });
            }
            None => {}
        }
        options
    }
}

/// Run the path command
pub fn run(args: &PathArgs, defaults: PathOptions, out: Output) -> Result<()> {
    let graph = input::load(&args.input)
        .with_context(|| format!("Failed to load graph from {}", args.input.display()))?;

    let options = args.apply(defaults);
    info!(
        source = %args.source,
        target = %args.target,
        algorithm = %options.algorithm,
        direction = %options.direction,
        "Finding path"
    );

    let mut finder = PathFinder::new();
    finder.set_graph(&graph.nodes, &graph.edges);
    let result = finder.find_path(&args.source, &args.target, &options);

    if out.json {
        out.print_json(&result)?;
    } else {
        print_result(&result, out);
    }

    if let Some(error) = &result.error {
        anyhow::bail!("{error}");
    }
    Ok(())
}

fn print_result(result: &PathFindingResult, out: Output) {
    let stats = out.dim(format!(
        "{}, {} nodes visited, {:.2} ms",
        result.algorithm, result.nodes_visited, result.search_time_ms
    ));

    if let Some(error) = &result.error {
        println!("{}", out.warn(error));
        return;
    }
    if !result.found {
        let reason = if result.timed_out {
            "search timed out"
        } else {
            "no path"
        };
        println!(
            "{} {} -> {}",
            out.warn(reason),
            out.accent(&result.source_id),
            out.accent(&result.target_id)
        );
        println!("{stats}");
        return;
    }

    for path in &result.paths {
        println!(
            "{} length {} weight {:.2}",
            out.heading(&path.id),
            path.length,
            path.total_weight
        );
        let hops: Vec<String> = path
            .steps
            .iter()
            .map(|step| {
                let node = out.accent(&step.node_id);
                match &step.edge_id {
                    Some(edge) if step.is_reverse => format!("<-[{edge}]- {node}"),
                    Some(edge) => format!("-[{edge}]-> {node}"),
                    None => node,
                }
            })
            .collect();
        println!("  {}", hops.join(" "));
    }
    if result.timed_out {
        println!("{}", out.warn("search timed out before all paths were ranked"));
    }
    println!("{stats}");
}
