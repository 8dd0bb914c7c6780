//! Validation of the install location and the dependency graph
//!
//! This module provides:
//! - Location checks (absolute, existing, empty directory)
//! - Graph consistency checks (keys, names, node locations, link endpoints)
//! - Bin checks (names, collisions after propagation along links)
//!
//! All checks are read-only and report the first problem found.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{Graph, Node, ValidatedGraph};
use crate::error::{Result, input};

static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^(@[a-z0-9\-~][a-z0-9\-._~]*/)?[a-zA-Z0-9\-~][a-zA-Z0-9\-._~]*$")
        .expect("package name pattern is valid")
});

/// Characters a bin name can never contain
const ILLEGAL_BIN_CHARS: &[char] = &['/', '\\', '\n'];

/// True if `name` matches `(@scope/)?name`
pub fn is_valid_package_name(name: &str) -> bool {
    PACKAGE_NAME.is_match(name)
}

/// Check that the store location is an absolute path to an existing, empty directory
///
/// # Errors
///
/// Returns the matching `StoreError::Location*` variant for the first failed check.
pub fn validate_location(location: &Path) -> Result<()> {
    let shown = || location.display().to_string();

    if !location.is_absolute() {
        return Err(input::location_not_absolute(shown()));
    }
    let Ok(metadata) = fs::metadata(location) else {
        return Err(input::location_not_found(shown()));
    };
    if !metadata.is_dir() {
        return Err(input::location_not_directory(shown()));
    }
    let mut entries = fs::read_dir(location).map_err(|_| input::location_not_found(shown()))?;
    if entries.next().is_some() {
        return Err(input::location_not_empty(shown()));
    }
    Ok(())
}

/// Validate a graph and index it by key
///
/// Checks run in this order and stop at the first failure: duplicate key, invalid
/// package name, relative node location, node location not a directory, unknown link
/// source, unknown link target, two dependencies with the same name on one source.
///
/// # Errors
///
/// Returns an input `StoreError` describing the first violation.
pub fn validate_graph(graph: &Graph) -> Result<ValidatedGraph<'_>> {
    if let Some(key) = first_duplicate_key(graph) {
        return Err(input::duplicate_key(key));
    }

    if let Some(node) = graph.nodes.iter().find(|n| !is_valid_package_name(&n.name)) {
        return Err(input::invalid_name(&node.name));
    }

    if let Some(node) = graph.nodes.iter().find(|n| !n.location.is_absolute()) {
        return Err(input::node_location_not_absolute(
            node.location.display().to_string(),
        ));
    }

    if let Some(node) = graph.nodes.iter().find(|n| !n.location.is_dir()) {
        return Err(input::node_location_not_directory(
            node.location.display().to_string(),
        ));
    }

    let validated = ValidatedGraph::new(graph);

    if let Some(link) = graph.links.iter().find(|l| validated.node(&l.source).is_none()) {
        return Err(input::invalid_link_source(&link.source));
    }
    if let Some(link) = graph.links.iter().find(|l| validated.node(&l.target).is_none()) {
        return Err(input::invalid_link_target(&link.target));
    }

    check_ambiguous_dependencies(&validated)?;

    Ok(validated)
}

/// Validate bin names and make sure no package receives two scripts under one name
///
/// Propagation is simulated over [`ValidatedGraph::augmented_links`], so a package's own
/// bins count as installed in its own bin directory. Nodes kept in place at the same
/// location share one bin directory.
///
/// # Errors
///
/// Returns `StoreError::InvalidBinName` or `StoreError::BinCollision`.
pub fn validate_bins(graph: &ValidatedGraph<'_>) -> Result<()> {
    for node in graph.nodes() {
        if let Some(bin) = node.bins.keys().find(|b| b.contains(ILLEGAL_BIN_CHARS)) {
            return Err(input::invalid_bin_name(&node.key, bin));
        }
    }

    // namespace -> bin name -> (providing node key, script)
    let mut installed: HashMap<InstallSite<'_>, HashMap<&str, (&str, &str)>> = HashMap::new();
    for link in graph.augmented_links() {
        let (Some(source), Some(target)) = (graph.node(link.source()), graph.node(link.target()))
        else {
            continue;
        };
        let bins = installed.entry(InstallSite::of(source)).or_default();
        for (bin, script) in &target.bins {
            let provided = (target.key.as_str(), script.as_str());
            match bins.get(bin.as_str()) {
                Some(existing) if *existing != provided => {
                    return Err(input::bin_collision(bin, link.source()));
                }
                Some(_) => {}
                None => {
                    bins.insert(bin.as_str(), provided);
                }
            }
        }
    }
    Ok(())
}

/// Earliest key in node order that occurs more than once
fn first_duplicate_key(graph: &Graph) -> Option<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for node in &graph.nodes {
        *counts.entry(node.key.as_str()).or_default() += 1;
    }
    graph
        .nodes
        .iter()
        .map(|n| n.key.as_str())
        .find(|key| counts.get(key).copied().unwrap_or(0) > 1)
}

/// Directory a node's namespace lives in
///
/// Copied nodes each get their own `<store>/<key>`; nodes kept in place share a namespace
/// when their locations are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum InstallSite<'g> {
    InPlace(&'g Path),
    Store(&'g str),
}

impl<'g> InstallSite<'g> {
    fn of(node: &'g Node) -> Self {
        if node.keep_in_place {
            InstallSite::InPlace(&node.location)
        } else {
            InstallSite::Store(&node.key)
        }
    }
}

/// Simulate namespace entries over the augmented links, so a dependency named like its
/// dependent is caught here rather than when the entry already exists on disk.
fn check_ambiguous_dependencies(graph: &ValidatedGraph<'_>) -> Result<()> {
    // namespace -> entry name -> (source key, target site)
    let mut namespaces: HashMap<InstallSite<'_>, HashMap<&str, (&str, InstallSite<'_>)>> =
        HashMap::new();

    for link in graph.augmented_links() {
        let (Some(source), Some(target)) = (graph.node(&link.source), graph.node(&link.target))
        else {
            continue;
        };
        let entries = namespaces.entry(InstallSite::of(source)).or_default();
        let wanted = (source.key.as_str(), InstallSite::of(target));
        match entries.get(target.name.as_str()) {
            // the same source naming two targets alike, or a shared namespace disagreeing
            Some(&(owner, site)) if owner == wanted.0 || site != wanted.1 => {
                return Err(input::ambiguous_dependency(&source.key, &target.name));
            }
            Some(_) => {}
            None => {
                entries.insert(target.name.as_str(), wanted);
            }
        }
    }
    Ok(())
}
