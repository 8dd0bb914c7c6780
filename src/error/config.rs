//! Configuration and graph document errors

use super::StoreError;

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> StoreError {
    StoreError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a graph read failed error
pub fn graph_read_failed(path: impl Into<String>, reason: impl Into<String>) -> StoreError {
    StoreError::GraphReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a graph parse failed error
pub fn graph_parse_failed(path: impl Into<String>, reason: impl Into<String>) -> StoreError {
    StoreError::GraphParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
