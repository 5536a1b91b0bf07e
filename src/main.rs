// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Graphlens CLI - communities and paths in knowledge graphs

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use graphlens::commands::{self, Output};
use graphlens::config::Config;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graphlens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "GRAPHLENS_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    no_color: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition a graph into communities (Louvain)
    Communities(commands::communities::CommunitiesArgs),

    /// Find paths between two nodes
    Path(commands::path::PathArgs),

    /// Summarize graph structure
    Stats {
        /// Graph document (JSON), or `-` for stdin
        input: std::path::PathBuf,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Flags win over the configured level; RUST_LOG wins over both
    let log_level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let out = Output::new(cli.json, !cli.no_color && std::io::stdout().is_terminal());

    match cli.command {
        Commands::Communities(args) => commands::communities::run(&args, config.detection, out),
        Commands::Path(args) => commands::path::run(&args, config.path, out),
        Commands::Stats { input } => commands::stats::run(&input, out),
        Commands::Config { action } => {
            commands::config::run(action, &config, cli.config.as_deref(), out)
        }
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command(), &mut std::io::stdout())
        }
    }
}
