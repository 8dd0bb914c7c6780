//! Resolved install paths per node key

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// Node key -> absolute install path
///
/// Filled once while nodes are materialized, then only read by the linker and the
/// shim generator.
#[derive(Debug, Default)]
pub struct LocationMap {
    paths: HashMap<String, PathBuf>,
}

impl LocationMap {
    pub(crate) fn insert(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.paths.insert(key.into(), path.into());
    }

    /// Install path of `key`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownNode` if the node was never materialized.
    pub fn get(&self, key: &str) -> Result<&Path> {
        self.paths
            .get(key)
            .map(PathBuf::as_path)
            .ok_or_else(|| StoreError::UnknownNode {
                key: key.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
