//! Node materialization
//!
//! Every node gets an install path. Nodes kept in place use their own location;
//! the others get `<store>/<key>` with a copy of their payload. All payload files of
//! all nodes are copied by a single copy-engine call.

use std::fs;
use std::path::Path;

use crate::common::fs::{CopyOptions, plan_tree_copy};
use crate::config::StoreConfig;
use crate::copy_engine::CopyEngine;
use crate::error::{Result, copy};
use crate::graph::ValidatedGraph;

use super::LocationMap;

/// What materialization did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeStats {
    pub copied_nodes: usize,
    pub kept_in_place: usize,
    pub files: usize,
}

/// Create the install directory of every node and copy payloads into them
///
/// # Errors
///
/// Returns `StoreError::CopyFailed` for any directory or file that cannot be copied.
/// Work done before the failure is left on disk.
pub fn materialize_nodes(
    graph: &ValidatedGraph<'_>,
    location: &Path,
    config: &StoreConfig,
    engine: &CopyEngine,
) -> Result<(LocationMap, MaterializeStats)> {
    let options = CopyOptions::excluding(config.excluded_files.iter().cloned());
    let mut locations = LocationMap::default();
    let mut stats = MaterializeStats::default();
    let mut actions = Vec::new();

    for node in graph.nodes() {
        if node.keep_in_place() {
            tracing::debug!(key = node.key(), "keeping node in place");
            locations.insert(node.key(), node.location());
            stats.kept_in_place += 1;
            continue;
        }

        let dest = location.join(node.key());
        fs::create_dir(&dest).map_err(|e| copy::from_io(node.location(), &dest, &e))?;
        let node_actions = plan_tree_copy(node.location(), &dest, &options)?;
        tracing::debug!(key = node.key(), files = node_actions.len(), "planned node copy");

        actions.extend(node_actions);
        locations.insert(node.key(), dest);
        stats.copied_nodes += 1;
    }

    stats.files = actions.len();
    engine.copy_files(actions)?;
    Ok((locations, stats))
}
