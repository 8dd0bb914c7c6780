//! Dependency graph model
//!
//! A [`Graph`] is a set of [`Node`]s (package payloads on disk) and an ordered list of
//! [`Link`]s between them. Graphs are plain values: once built or deserialized they are
//! only read. [`validation::validate_graph`] turns a `&Graph` into a [`ValidatedGraph`],
//! the only form the installer stages accept.
//!
//! ```text
//!   Link { source: "fookey", target: "barkey" }
//!     => <store>/fookey/node_modules/bar -> <store>/barkey
//! ```

pub mod document;
pub mod validation;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use document::load_graph;
pub use validation::{validate_bins, validate_graph, validate_location};

/// One package payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    key: String,
    name: String,
    location: PathBuf,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    bins: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    keep_in_place: bool,
}

impl Node {
    pub fn new(key: impl Into<String>, name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            location: location.into(),
            bins: BTreeMap::new(),
            keep_in_place: false,
        }
    }

    /// Add a bin script, given relative to the node's install root
    #[must_use]
    pub fn with_bin(mut self, name: impl Into<String>, script: impl Into<String>) -> Self {
        self.bins.insert(name.into(), script.into());
        self
    }

    /// Use the payload where it is instead of copying it into the store
    #[must_use]
    pub fn kept_in_place(mut self) -> Self {
        self.keep_in_place = true;
        self
    }

    /// Unique key of the node
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Package name, exposed to dependents in their namespace directory
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the payload
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn bins(&self) -> &BTreeMap<String, String> {
        &self.bins
    }

    pub fn keep_in_place(&self) -> bool {
        self.keep_in_place
    }
}

/// "`source` depends on `target`"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    source: String,
    target: String,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_self_link(&self) -> bool {
        self.source == self.target
    }
}

/// Dependency graph to install
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    links: Vec<Link>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        Self { nodes, links }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }
}

/// A graph that passed [`validate_graph`]
///
/// Keys are unique and every link endpoint resolves to a node.
#[derive(Debug)]
pub struct ValidatedGraph<'g> {
    graph: &'g Graph,
    index: HashMap<&'g str, &'g Node>,
}

impl<'g> ValidatedGraph<'g> {
    pub(crate) fn new(graph: &'g Graph) -> Self {
        let index = graph.nodes.iter().map(|n| (n.key.as_str(), n)).collect();
        Self { graph, index }
    }

    pub fn nodes(&self) -> &'g [Node] {
        &self.graph.nodes
    }

    pub fn links(&self) -> &'g [Link] {
        &self.graph.links
    }

    pub fn node(&self, key: &str) -> Option<&'g Node> {
        self.index.get(key).copied()
    }

    /// Links with every explicit self-link dropped and exactly one self-link per node
    /// appended, in node order. This is the link set that is materialized on disk.
    pub fn augmented_links(&self) -> Vec<Link> {
        self.graph
            .links
            .iter()
            .filter(|l| !l.is_self_link())
            .cloned()
            .chain(self.graph.nodes.iter().map(|n| Link::new(&n.key, &n.key)))
            .collect()
    }
}
