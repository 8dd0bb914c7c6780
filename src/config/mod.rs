//! Store configuration
//!
//! Holds the layout names used on disk and the tuning knobs of the copy engine.
//! Defaults match what Node-style package managers expect; the worker cap can be
//! overridden with the `WORKERS_LIMIT` environment variable.

use crate::error::{Result, config};

/// Environment variable capping the number of copy workers
pub const WORKERS_LIMIT_ENV: &str = "WORKERS_LIMIT";

/// Cap used when no limit is configured
pub const DEFAULT_WORKERS_LIMIT: usize = 999;

/// Name of the per-package dependency directory
pub const NAMESPACE_DIR: &str = "node_modules";

/// Name of the bin shim directory inside the namespace directory
pub const BIN_DIR: &str = ".bin";

/// Store bookkeeping files that are never copied into the store
pub const EXCLUDED_FILES: &[&str] = &[".yarn-metadata.json", ".yarn-tarball.tgz"];

/// Order in which a busy copy worker drains batches queued behind the active one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BacklogOrder {
    /// Oldest queued batch first
    #[default]
    Fifo,
    /// Most recently queued batch first
    Lifo,
}

/// Configuration for a store installation
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Upper bound on copy workers; `None` means [`DEFAULT_WORKERS_LIMIT`]
    pub workers_limit: Option<usize>,
    pub backlog_order: BacklogOrder,
    pub namespace_dir: String,
    pub bin_dir: String,
    /// File names skipped when copying a node's payload
    pub excluded_files: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            workers_limit: None,
            backlog_order: BacklogOrder::default(),
            namespace_dir: NAMESPACE_DIR.to_string(),
            bin_dir: BIN_DIR.to_string(),
            excluded_files: EXCLUDED_FILES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl StoreConfig {
    /// Build the default configuration, applying `WORKERS_LIMIT` if set
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ConfigInvalid` if `WORKERS_LIMIT` is not a positive integer.
    pub fn from_env() -> Result<Self> {
        let workers_limit = match std::env::var(WORKERS_LIMIT_ENV) {
            Ok(value) => Some(parse_workers_limit(&value)?),
            Err(_) => None,
        };
        Ok(Self {
            workers_limit,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_workers_limit(mut self, limit: usize) -> Self {
        self.workers_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_backlog_order(mut self, order: BacklogOrder) -> Self {
        self.backlog_order = order;
        self
    }

    /// Number of copy workers: `min(limit, ceil(cpus / 2))`, never zero
    pub fn pool_size(&self) -> usize {
        let cpus = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
        pool_size_for(self.workers_limit.unwrap_or(DEFAULT_WORKERS_LIMIT), cpus)
    }

    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.excluded_files.iter().any(|f| f == file_name)
    }
}

/// Parse a worker cap as given on the command line or in the environment
///
/// # Errors
///
/// Returns `StoreError::ConfigInvalid` unless the value is an integer greater than zero.
pub fn parse_workers_limit(value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(config::invalid(format!(
            "{WORKERS_LIMIT_ENV} must be a positive integer, got '{value}'"
        ))),
    }
}

pub(crate) fn pool_size_for(limit: usize, cpus: usize) -> usize {
    limit.min(cpus.div_ceil(2)).max(1)
}
