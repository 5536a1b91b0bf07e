// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - inspect the effective configuration

use super::Output;
use crate::config::{self, Config};
use anyhow::Result;
use clap::Subcommand;
use std::path::Path;

/// `graphlens config` actions
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Print the merged configuration as TOML
    Show,
    /// Print the configuration file location
    Path,
}

/// Run the config command
pub fn run(action: ConfigAction, config: &Config, explicit: Option<&Path>, out: Output) -> Result<()> {
    match action {
        ConfigAction::Show => {
            if out.json {
                out.print_json(config)?;
            } else {
                print!("{}", config.to_toml()?);
            }
        }
        ConfigAction::Path => {
            let location = explicit.map(Path::to_path_buf).or_else(config::default_path);
            match location {
                Some(path) => {
                    let note = if path.exists() { "" } else { " (not present)" };
                    println!("{}{}", path.display(), out.dim(note));
                }
                None => println!("{}", out.warn("no configuration directory on this platform")),
            }
        }
    }
    Ok(())
}
