//! local-store - install a resolved dependency graph as a local package store
//!
//! Given a graph of package payloads already present on disk and the dependency links
//! between them, [`install_local_store`] builds a self-contained store:
//!
//! ```text
//!   <store>/<key>/                      copy of the node's payload
//!   <store>/<key>/node_modules/<name>   symlink to each dependency (and to itself)
//!   <store>/<key>/node_modules/.bin/    shims for dependencies' bin scripts
//! ```
//!
//! Nodes marked `keepInPlace` are linked where they already are instead of being copied.

pub mod common;
pub mod config;
pub mod copy_engine;
pub mod error;
pub mod graph;
pub mod installer;
pub mod logging;
pub mod progress;

pub use config::StoreConfig;
pub use copy_engine::{CopyAction, CopyEngine, CopyReport, copy_files};
pub use error::{Result, StoreError};
pub use graph::{Graph, Link, Node, ValidatedGraph};
pub use installer::{StoreInstaller, install_local_store};
