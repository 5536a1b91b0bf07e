// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use graphlens::community::{CommunityDetector, DetectionConfig};
use graphlens::input;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(graph) = input::parse(text) else {
        return;
    };

    let detector = CommunityDetector::new(DetectionConfig {
        random_seed: Some(0),
        ..DetectionConfig::default()
    });
    let result = detector.detect(&graph.nodes, &graph.edges);

    let total: usize = result.communities.iter().map(|c| c.size).sum();
    assert_eq!(total, result.assignments.len());
    let _ = serde_json::to_string(&result);
});
