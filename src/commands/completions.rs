// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Completions command - shell completion scripts

use anyhow::Result;
use clap_complete::Shell;
use std::io::Write;

/// Write the completion script for `shell` to `writer`
pub fn run(shell: Shell, command: &mut clap::Command, writer: &mut dyn Write) -> Result<()> {
    let name = command.get_name().to_string();
    clap_complete::generate(shell, command, name, writer);
    Ok(())
}
