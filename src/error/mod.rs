//! Error types and handling for local-store
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`input`]: Location, graph and bin validation failures
//! - [`copy`]: Payload and copy-engine failures
//! - [`link`]: Namespace symlink failures
//! - [`shim`]: Bin shim failures
//! - [`config`]: Configuration and graph document errors
//! - [`fs`]: Generic file system errors

pub mod config;
pub mod copy;
pub mod fs;
pub mod input;
pub mod link;
pub mod shim;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for local-store operations
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    // Location errors
    #[error("Location is not an absolute path: \"{path}\"")]
    #[diagnostic(code(local_store::input::location_not_absolute))]
    LocationNotAbsolute { path: String },

    #[error("Location does not exist: \"{path}\"")]
    #[diagnostic(
        code(local_store::input::location_not_found),
        help("Create an empty directory and pass its absolute path")
    )]
    LocationNotFound { path: String },

    #[error("Location is not a directory: \"{path}\"")]
    #[diagnostic(code(local_store::input::location_not_directory))]
    LocationNotDirectory { path: String },

    #[error("Location is not an empty directory: \"{path}\"")]
    #[diagnostic(
        code(local_store::input::location_not_empty),
        help("A store can only be installed into a fresh, empty directory")
    )]
    LocationNotEmpty { path: String },

    // Graph errors
    #[error("Multiple nodes have the following key: \"{key}\"")]
    #[diagnostic(code(local_store::input::duplicate_key))]
    DuplicateNodeKey { key: String },

    #[error("Package name invalid: \"{name}\"")]
    #[diagnostic(
        code(local_store::input::invalid_name),
        help("Package names follow the format name or @scope/name")
    )]
    InvalidPackageName { name: String },

    #[error("Location of a node is not absolute: \"{path}\"")]
    #[diagnostic(code(local_store::input::node_location_not_absolute))]
    NodeLocationNotAbsolute { path: String },

    #[error("Location of a node is not a directory: \"{path}\"")]
    #[diagnostic(code(local_store::input::node_location_not_directory))]
    NodeLocationNotDirectory { path: String },

    #[error("Invalid link source: \"{key}\"")]
    #[diagnostic(code(local_store::input::invalid_link_source))]
    InvalidLinkSource { key: String },

    #[error("Invalid link target: \"{key}\"")]
    #[diagnostic(code(local_store::input::invalid_link_target))]
    InvalidLinkTarget { key: String },

    #[error("Package \"{package}\" depends on multiple packages called \"{name}\"")]
    #[diagnostic(code(local_store::input::ambiguous_dependency))]
    AmbiguousDependency { package: String, name: String },

    // Bin errors
    #[error("Package \"{package}\" exposes a bin script with an invalid name: \"{bin}\"")]
    #[diagnostic(
        code(local_store::input::invalid_bin_name),
        help("Bin names cannot contain '/', '\\' or newlines")
    )]
    InvalidBinName { package: String, bin: String },

    #[error(
        "Several different scripts called \"{bin}\" need to be installed at the same location ({package})."
    )]
    #[diagnostic(code(local_store::input::bin_collision))]
    BinCollision { bin: String, package: String },

    // Copy errors
    #[error("Failed to copy '{src}' to '{dest}': {reason}")]
    #[diagnostic(code(local_store::copy::failed))]
    CopyFailed {
        src: String,
        dest: String,
        reason: String,
    },

    #[error("Copy worker failed: {message}")]
    #[diagnostic(code(local_store::copy::worker_failed))]
    WorkerFailed { message: String },

    // Link errors
    #[error("Failed to link '{path}' to '{target}': {reason}")]
    #[diagnostic(code(local_store::link::failed))]
    LinkFailed {
        path: String,
        target: String,
        reason: String,
    },

    #[error("Failed to rebuild namespace directory '{path}': {reason}")]
    #[diagnostic(code(local_store::link::namespace_failed))]
    NamespaceRebuildFailed { path: String, reason: String },

    // Shim errors
    #[error("Failed to create shim '{bin}' at '{path}': {reason}")]
    #[diagnostic(code(local_store::shim::failed))]
    ShimFailed {
        bin: String,
        path: String,
        reason: String,
    },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(local_store::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Failed to read graph file: {path}: {reason}")]
    #[diagnostic(code(local_store::graph::read_failed))]
    GraphReadFailed { path: String, reason: String },

    #[error("Failed to parse graph file: {path}: {reason}")]
    #[diagnostic(
        code(local_store::graph::parse_failed),
        help("Graph files are JSON (.json) or YAML (.yaml, .yml) documents with nodes and links")
    )]
    GraphParseFailed { path: String, reason: String },

    #[error("Node '{key}' has no install location")]
    #[diagnostic(code(local_store::graph::unknown_node))]
    UnknownNode { key: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(local_store::fs::io_error))]
    IoError { message: String },
}

impl StoreError {
    /// True for rejections raised before anything is written to disk.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            StoreError::LocationNotAbsolute { .. }
                | StoreError::LocationNotFound { .. }
                | StoreError::LocationNotDirectory { .. }
                | StoreError::LocationNotEmpty { .. }
                | StoreError::DuplicateNodeKey { .. }
                | StoreError::InvalidPackageName { .. }
                | StoreError::NodeLocationNotAbsolute { .. }
                | StoreError::NodeLocationNotDirectory { .. }
                | StoreError::InvalidLinkSource { .. }
                | StoreError::InvalidLinkTarget { .. }
                | StoreError::AmbiguousDependency { .. }
                | StoreError::InvalidBinName { .. }
                | StoreError::BinCollision { .. }
        )
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for StoreError {
    fn from(err: serde_yaml::Error) -> Self {
        StoreError::GraphParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::GraphParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::DuplicateNodeKey {
            key: "a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Multiple nodes have the following key: \"a\""
        );
    }

    #[test]
    fn test_error_code() {
        let err = input::duplicate_key("a");
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("local_store::input::duplicate_key".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let store_err: StoreError = io_err.into();
        assert!(matches!(store_err, StoreError::IoError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid json content");
        let store_err: StoreError = parse_result.unwrap_err().into();
        assert!(matches!(store_err, StoreError::GraphParseFailed { .. }));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse_result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: content: [unclosed");
        let store_err: StoreError = parse_result.unwrap_err().into();
        assert!(matches!(store_err, StoreError::GraphParseFailed { .. }));
    }

    #[test]
    fn test_input_errors_are_classified() {
        assert!(input::location_not_empty("/tmp/x").is_input_error());
        assert!(input::bin_collision("x", "a").is_input_error());
        assert!(!copy::failed("/a", "/b", "denied").is_input_error());
        assert!(!link::failed("/a", "/b", "exists").is_input_error());
        assert!(!shim::failed("x", "/a/.bin/x", "denied").is_input_error());
    }

    test_error_contains!(
        test_ambiguous_dependency_error,
        input::ambiguous_dependency("fookey", "bar"),
        "Package \"fookey\" depends on multiple packages called \"bar\""
    );

    test_error_contains!(
        test_invalid_bin_name_error,
        input::invalid_bin_name("a", "x/y"),
        "exposes a bin script with an invalid name",
        "x/y"
    );

    test_error_contains!(
        test_bin_collision_error,
        input::bin_collision("x", "root"),
        "Several different scripts called \"x\"",
        "(root)"
    );

    test_error_contains!(
        test_copy_failed_error,
        copy::failed("/src/a", "/dest/a", "permission denied"),
        "/src/a",
        "/dest/a",
        "permission denied"
    );

    test_error_contains!(
        test_graph_read_failed_error,
        config::graph_read_failed("/tmp/graph.json", "No such file or directory"),
        "Failed to read graph file: /tmp/graph.json",
        "No such file or directory"
    );

    test_error_contains!(
        test_config_invalid_error,
        config::invalid("WORKERS_LIMIT must be a positive integer"),
        "Invalid configuration",
        "WORKERS_LIMIT"
    );
}
