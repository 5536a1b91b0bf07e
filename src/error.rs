// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types
//!
//! The algorithms themselves never fail: missing endpoints, exhausted
//! searches and timeouts are reported inside result records. These errors
//! cover the surfaces around them (input files, configuration, option
//! parsing).

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for `graphlens`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised outside the algorithm cores
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read an input file
    #[error("failed to read {path}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input was not a valid graph document
    #[error("invalid graph document: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration could not be rendered as TOML
    #[error("failed to render configuration: {0}")]
    Toml(#[from] toml::ser::Error),

    /// An option value was not recognized
    #[error("unknown {kind} '{value}', expected one of: {expected}")]
    UnknownValue {
        /// Option kind (algorithm, direction, ...)
        kind: &'static str,
        /// Value supplied
        value: String,
        /// Accepted values
        expected: &'static str,
    },
}

/// A path search endpoint absent from the graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The source node does not exist
    #[error("source node not found: {0}")]
    SourceNotFound(String),
    /// The target node does not exist
    #[error("target node not found: {0}")]
    TargetNotFound(String),
}
