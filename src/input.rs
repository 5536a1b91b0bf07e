// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Graph document loading

use crate::error::{Error, Result};
use crate::types::GraphInput;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read a JSON graph document from `path`, or from stdin when `path` is `-`
pub fn load(path: &Path) -> Result<GraphInput> {
    let text = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
        buffer
    } else {
        std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?
    };

    let input = parse(&text)?;
    debug!(
        source = %path.display(),
        nodes = input.nodes.len(),
        edges = input.edges.len(),
        "Loaded graph document"
    );
    Ok(input)
}

/// Parse a JSON graph document
pub fn parse(text: &str) -> Result<GraphInput> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_accepts_both_endpoint_forms() {
        let input = parse(
            r#"{
                "nodes": [{"id": "a"}, {"id": "b", "label": "B"}],
                "edges": [
                    {"id": "e1", "source": "a", "target": {"id": "b"}, "weight": 2.0},
                    {"id": "e2", "source": {"id": "b"}, "target": "a", "property": "knows"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(input.nodes.len(), 2);
        assert_eq!(input.edges[0].target.id(), "b");
        assert_eq!(input.edges[0].weight, Some(2.0));
        assert_eq!(input.edges[1].source.id(), "b");
        assert_eq!(input.edges[1].predicate.as_deref(), Some("knows"));
    }

    #[test]
    fn test_missing_edges_default_to_empty() {
        let input = parse(r#"{"nodes": [{"id": "solo"}]}"#).unwrap();
        assert!(input.edges.is_empty());
    }

    #[test]
    fn test_load_reads_file_and_reports_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"nodes": [{{"id": "x"}}], "edges": []}}"#).unwrap();
        assert_eq!(load(file.path()).unwrap().nodes[0].id, "x");

        let err = load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(matches!(parse("{not json").unwrap_err(), Error::Json(_)));
    }
}
