// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Communities command - Louvain partition of a graph document

use super::Output;
use crate::community::{CommunityDetectionResult, CommunityDetector, DetectionConfig};
use crate::input;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Arguments for `graphlens communities`
#[derive(Debug, Clone, Args)]
pub struct CommunitiesArgs {
    /// Graph document (JSON), or `-` for stdin
    pub input: PathBuf,

    /// Resolution; higher values give smaller communities
    #[arg(short, long)]
    pub resolution: Option<f64>,

    /// Seed for the visit-order shuffle
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Maximum local-moving passes per level
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Treat every edge as weight `default_weight`
    #[arg(long)]
    pub ignore_weights: bool,

    /// Visit nodes in input order instead of shuffling
    #[arg(long)]
    pub no_shuffle: bool,

    /// Print members of each community
    #[arg(short, long)]
    pub members: bool,
}

impl CommunitiesArgs {
    /// Layer the flags over configured defaults
    #[must_use]
    pub fn apply(&self, mut config: DetectionConfig) -> DetectionConfig {
        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if let Some(seed) = self.seed {
            config.random_seed = Some(seed);
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if self.ignore_weights {
            config.use_weights = false;
        }
        if self.no_shuffle {
            config.randomize_order = false;
        }
        config
    }
}

/// Run the communities command
pub fn run(args: &CommunitiesArgs, defaults: DetectionConfig, out: Output) -> Result<()> {
    let graph = input::load(&args.input)
        .with_context(|| format!("Failed to load graph from {}", args.input.display()))?;

    let config = args.apply(defaults);
    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        resolution = config.resolution,
        "Detecting communities"
    );
    let result = CommunityDetector::new(config).detect(&graph.nodes, &graph.edges);

    if out.json {
        return out.print_json(&result);
    }
    print_summary(&result, args.members, out);
    Ok(())
}

fn print_summary(result: &CommunityDetectionResult, members: bool, out: Output) {
    if result.is_empty() {
        println!("Graph has no nodes");
        return;
    }

    println!(
        "{} {} communities, modularity {:.4}",
        out.heading("Found"),
        out.accent(result.len()),
        result.modularity
    );
    println!(
        "{}",
        out.dim(format!(
            "{} levels, {} passes, {:.2} ms",
            result.levels, result.iterations, result.compute_time_ms
        ))
    );
    println!();

    for community in &result.communities {
        println!(
            "  {} size {} internal {:.2} degree {:.2}",
            out.accent(format!("#{}", community.id)),
            community.size,
            community.internal_weight,
            community.total_degree
        );
        if members {
            println!("    {}", community.members.join(", "));
        }
    }

    if !result.links.is_empty() {
        println!();
        println!("{}", out.heading("Links"));
        for link in &result.links {
            println!("  #{} - #{}  {:.2}", link.source, link.target, link.weight);
        }
    }
}
