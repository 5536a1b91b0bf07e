// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Graphlens library - graph analytics for knowledge-graph visualization
//!
//! This crate partitions a node/edge graph into densely connected
//! communities (Louvain modularity optimization) and finds paths between
//! two nodes under configurable weighting and direction rules. Both
//! operate on plain in-memory records; nothing here renders or persists.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod commands;
pub mod community;
pub mod config;
pub mod error;
pub mod graph;
pub mod input;
pub mod path;

/// Plain node/edge records accepted by every algorithm
pub mod types {
    use serde::{Deserialize, Serialize};

    // =========================================================================
    // Node
    // =========================================================================

    /// A node supplied by the caller. Only `id` is read by the algorithms.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NodeRecord {
        /// Opaque unique identifier
        pub id: String,
        /// Display label (caller metadata)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub label: Option<String>,
        /// Source path in the host vault (caller metadata)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub path: Option<String>,
    }

    impl NodeRecord {
        /// Create a node carrying only an id
        #[must_use]
        pub fn new(id: impl Into<String>) -> Self {
            Self {
                id: id.into(),
                label: None,
                path: None,
            }
        }
    }

    // =========================================================================
    // Edge
    // =========================================================================

    /// An edge endpoint, given either as a raw id or as an embedded node
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum EndpointRef {
        /// Bare node id
        Id(String),
        /// Embedded node object; only its `id` matters
        Node {
            /// Referenced node id
            id: String,
        },
    }

    impl EndpointRef {
        /// The node id this endpoint refers to
        #[must_use]
        pub fn id(&self) -> &str {
            match self {
                Self::Id(id) | Self::Node { id } => id,
            }
        }
    }

    impl From<&str> for EndpointRef {
        fn from(id: &str) -> Self {
            Self::Id(id.to_string())
        }
    }

    impl From<String> for EndpointRef {
        fn from(id: String) -> Self {
            Self::Id(id)
        }
    }

    impl From<&NodeRecord> for EndpointRef {
        fn from(node: &NodeRecord) -> Self {
            Self::Node { id: node.id.clone() }
        }
    }

    /// An edge supplied by the caller
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct EdgeRecord {
        /// Unique identifier
        pub id: String,
        /// Source endpoint
        pub source: EndpointRef,
        /// Target endpoint
        pub target: EndpointRef,
        /// Optional numeric weight
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub weight: Option<f64>,
        /// Relationship predicate, used by predicate weighting
        #[serde(default, alias = "property", skip_serializing_if = "Option::is_none")]
        pub predicate: Option<String>,
    }

    impl EdgeRecord {
        /// Create an unweighted edge between two node ids
        #[must_use]
        pub fn new(id: impl Into<String>, source: impl Into<EndpointRef>, target: impl Into<EndpointRef>) -> Self {
            Self {
                id: id.into(),
                source: source.into(),
                target: target.into(),
                weight: None,
                predicate: None,
            }
        }

        /// Set the edge weight
        #[must_use]
        pub fn with_weight(mut self, weight: f64) -> Self {
            self.weight = Some(weight);
            self
        }

        /// Set the edge predicate
        #[must_use]
        pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
            self.predicate = Some(predicate.into());
            self
        }
    }

    // =========================================================================
    // Graph Document
    // =========================================================================

    /// A complete node/edge document, as read by the CLI
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct GraphInput {
        /// All nodes
        #[serde(default)]
        pub nodes: Vec<NodeRecord>,
        /// All edges
        #[serde(default)]
        pub edges: Vec<EdgeRecord>,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::community::{
        Community, CommunityAssignment, CommunityDetectionResult, CommunityDetector,
        DetectionConfig,
    };
    pub use crate::graph::{Direction, WeightStrategy};
    pub use crate::path::{Algorithm, Path, PathFinder, PathFindingResult, PathOptions};
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
