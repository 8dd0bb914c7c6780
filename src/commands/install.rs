//! Install command implementation
//!
//! The installation process:
//! 1. Load the graph document and resolve a relative store location
//! 2. Build the store configuration (`--workers` / `WORKERS_LIMIT`)
//! 3. Run the installer with a stage progress bar
//! 4. Print a summary

use std::path::{Path, PathBuf};

use local_store::config::StoreConfig;
use local_store::error::Result;
use local_store::graph::load_graph;
use local_store::installer::{InstallSummary, StoreInstaller};
use local_store::progress::ProgressDisplay;

use crate::cli::InstallArgs;

/// Run install command
pub fn run(args: InstallArgs) -> Result<()> {
    let graph = load_graph(&args.graph)?;
    let location = resolve_location(&args.location);
    let config = configure(&args);
    tracing::debug!(
        workers_limit = ?config.workers_limit,
        pool_size = config.pool_size(),
        "store configuration"
    );

    let installer = StoreInstaller::new(config);
    let mut progress = ProgressDisplay::new(!args.quiet);

    match installer.install_with_progress(&graph, &location, Some(&mut progress)) {
        Ok(summary) => {
            progress.finish("installed");
            print_summary(&location, &summary);
            Ok(())
        }
        Err(e) => {
            progress.abandon();
            Err(e)
        }
    }
}

/// `--workers` already carries `WORKERS_LIMIT` through clap's env fallback
fn configure(args: &InstallArgs) -> StoreConfig {
    let config = StoreConfig::default();
    match args.workers {
        Some(limit) => config.with_workers_limit(limit),
        None => config,
    }
}

/// Relative locations are taken from the current directory; anything that cannot be
/// resolved is passed through so the installer reports it
fn resolve_location(location: &Path) -> PathBuf {
    if location.is_absolute() {
        return location.to_path_buf();
    }
    dunce::canonicalize(location).unwrap_or_else(|_| location.to_path_buf())
}

fn print_summary(location: &Path, summary: &InstallSummary) {
    println!(
        "Installed {} package(s) into {}",
        summary.nodes.copied_nodes + summary.nodes.kept_in_place,
        location.display()
    );
    if summary.nodes.kept_in_place > 0 {
        println!("  kept in place: {}", summary.nodes.kept_in_place);
    }
    println!("  files copied: {}", summary.nodes.files);
    println!("  links: {}", summary.links);
    println!("  bin shims: {}", summary.shims);
}
