//! Link errors

use std::path::Path;

use super::StoreError;

/// Creates a link failed error
pub fn failed(
    path: impl Into<String>,
    target: impl Into<String>,
    reason: impl Into<String>,
) -> StoreError {
    StoreError::LinkFailed {
        path: path.into(),
        target: target.into(),
        reason: reason.into(),
    }
}

pub fn from_io(path: &Path, target: &Path, err: &std::io::Error) -> StoreError {
    failed(
        path.display().to_string(),
        target.display().to_string(),
        err.to_string(),
    )
}

/// Creates a namespace rebuild error
pub fn namespace_failed(path: &Path, err: &std::io::Error) -> StoreError {
    StoreError::NamespaceRebuildFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
