// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Wall-clock budget checked at every frontier pop

use std::time::{Duration, Instant};

/// Deadline shared by every phase of one `find_path` call
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchBudget {
    started: Instant,
    timeout: Duration,
}

impl SearchBudget {
    pub(crate) fn start(timeout_ms: u64) -> Self {
        Self {
            started: Instant::now(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// A zero timeout is always expired
    pub(crate) fn expired(&self) -> bool {
        self.started.elapsed() >= self.timeout
    }

    pub(crate) fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

/// What a single search produced
#[derive(Debug, Clone, Default)]
pub(crate) struct SearchOutcome {
    pub route: Option<super::arena::Route>,
    pub nodes_visited: usize,
    pub timed_out: bool,
}

impl SearchOutcome {
    pub(crate) fn found(route: super::arena::Route, nodes_visited: usize) -> Self {
        Self {
            route: Some(route),
            nodes_visited,
            timed_out: false,
        }
    }

    pub(crate) fn exhausted(nodes_visited: usize) -> Self {
        Self {
            route: None,
            nodes_visited,
            timed_out: false,
        }
    }

    pub(crate) fn timed_out(nodes_visited: usize) -> Self {
        Self {
            route: None,
            nodes_visited,
            timed_out: true,
        }
    }
}
