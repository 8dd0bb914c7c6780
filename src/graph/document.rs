//! Loading graphs from JSON or YAML documents

use std::fs;
use std::path::Path;

use super::Graph;
use crate::error::{Result, config};

/// Read a graph document, choosing the format from the file extension
///
/// `.yaml` and `.yml` are parsed as YAML, everything else as JSON.
///
/// # Errors
///
/// Returns `StoreError::GraphReadFailed` or `StoreError::GraphParseFailed`.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let content = fs::read_to_string(path)
        .map_err(|e| config::graph_read_failed(path.display().to_string(), e.to_string()))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let parsed: std::result::Result<Graph, String> = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    };
    parsed.map_err(|reason| config::graph_parse_failed(path.display().to_string(), reason))
}
