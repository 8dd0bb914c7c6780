//! Local store installation
//!
//! This module handles:
//! - Validating the store location, the graph and its bins before any write
//! - Materializing node payloads into `<store>/<key>` (or keeping them in place)
//! - Building `node_modules` symlinks for every link plus one self-link per node
//! - Writing bin shims for dependents
//!
//! The installation process:
//! 1. Validate location, graph and bins (fail fast, nothing written)
//! 2. Materialize nodes through the copy engine
//! 3. Derive the self-link-augmented link list
//! 4. Link namespace directories
//! 5. Generate bin shims

pub mod bins;
pub mod linker;
pub mod locations;
pub mod materialize;
pub mod shim;

use std::path::Path;

pub use bins::{BinLayout, generate_bins};
pub use linker::{NamespacePlan, link_nodes, plan_namespaces};
pub use locations::LocationMap;
pub use materialize::{MaterializeStats, materialize_nodes};
pub use shim::{LinkShim, ShimGenerator};

use crate::config::StoreConfig;
use crate::copy_engine::CopyEngine;
use crate::error::Result;
use crate::graph::{Graph, ValidatedGraph, validate_bins, validate_graph, validate_location};

/// Installation stages, reported in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Validate,
    Materialize,
    Link,
    Bins,
}

impl InstallStage {
    pub fn label(self) -> &'static str {
        match self {
            InstallStage::Validate => "validating graph",
            InstallStage::Materialize => "copying packages",
            InstallStage::Link => "linking dependencies",
            InstallStage::Bins => "creating bin shims",
        }
    }
}

/// Receives stage updates during an installation
pub trait ProgressReporter {
    fn stage(&mut self, stage: InstallStage);
}

/// Counts from a finished installation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InstallSummary {
    pub nodes: MaterializeStats,
    pub links: usize,
    pub shims: usize,
}

/// Installs dependency graphs into empty store directories
pub struct StoreInstaller {
    config: StoreConfig,
    engine: CopyEngine,
    shims: Box<dyn ShimGenerator>,
}

impl StoreInstaller {
    pub fn new(config: StoreConfig) -> Self {
        let engine = CopyEngine::new(&config);
        Self {
            config,
            engine,
            shims: Box::new(LinkShim),
        }
    }

    /// Use another shim generator instead of [`LinkShim`]
    #[must_use]
    pub fn with_shim_generator(mut self, generator: impl ShimGenerator + 'static) -> Self {
        self.shims = Box::new(generator);
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Run every check `install` runs, without writing anything
    ///
    /// # Errors
    ///
    /// Returns the first input error found.
    pub fn validate<'g>(&self, graph: &'g Graph, location: &Path) -> Result<ValidatedGraph<'g>> {
        validate_location(location)?;
        let validated = validate_graph(graph)?;
        validate_bins(&validated)?;
        Ok(validated)
    }

    /// Install `graph` into the empty directory `location`
    ///
    /// # Errors
    ///
    /// Input errors are returned before anything is written. Copy, link and shim
    /// errors abort the installation and leave partial state on disk.
    pub fn install(&self, graph: &Graph, location: &Path) -> Result<InstallSummary> {
        self.install_with_progress(graph, location, None)
    }

    /// Like [`StoreInstaller::install`], reporting each stage as it starts
    ///
    /// # Errors
    ///
    /// See [`StoreInstaller::install`].
    pub fn install_with_progress(
        &self,
        graph: &Graph,
        location: &Path,
        mut progress: Option<&mut dyn ProgressReporter>,
    ) -> Result<InstallSummary> {
        let mut report = |stage: InstallStage| {
            tracing::debug!(stage = stage.label(), "install stage");
            if let Some(p) = progress.as_deref_mut() {
                p.stage(stage);
            }
        };

        report(InstallStage::Validate);
        let validated = self.validate(graph, location)?;
        tracing::info!(
            nodes = graph.nodes().len(),
            links = graph.links().len(),
            location = %location.display(),
            "installing local store"
        );

        report(InstallStage::Materialize);
        let (locations, nodes) =
            materialize_nodes(&validated, location, &self.config, &self.engine)?;

        let links = validated.augmented_links();

        report(InstallStage::Link);
        let linked = link_nodes(&validated, &links, &locations, &self.config.namespace_dir)?;

        report(InstallStage::Bins);
        let layout = BinLayout {
            namespace_dir: &self.config.namespace_dir,
            bin_dir: &self.config.bin_dir,
        };
        let shims = generate_bins(&validated, &links, &locations, layout, self.shims.as_ref())?;

        let summary = InstallSummary {
            nodes,
            links: linked,
            shims,
        };
        tracing::info!(
            files = summary.nodes.files,
            links = summary.links,
            shims = summary.shims,
            "local store installed"
        );
        Ok(summary)
    }
}

impl Default for StoreInstaller {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

/// Install `graph` into the empty directory `location`, configured from the environment
///
/// # Errors
///
/// Returns `StoreError::ConfigInvalid` for a bad `WORKERS_LIMIT`, otherwise see
/// [`StoreInstaller::install`].
pub fn install_local_store(graph: &Graph, location: &Path) -> Result<()> {
    StoreInstaller::new(StoreConfig::from_env()?)
        .install(graph, location)
        .map(|_| ())
}
