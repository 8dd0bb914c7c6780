//! Copy errors

use std::path::Path;

use super::StoreError;

/// Creates a copy failed error
pub fn failed(
    src: impl Into<String>,
    dest: impl Into<String>,
    reason: impl Into<String>,
) -> StoreError {
    StoreError::CopyFailed {
        src: src.into(),
        dest: dest.into(),
        reason: reason.into(),
    }
}

/// Creates a copy failed error from an io error on a source/destination pair
pub fn from_io(src: &Path, dest: &Path, err: &std::io::Error) -> StoreError {
    failed(
        src.display().to_string(),
        dest.display().to_string(),
        err.to_string(),
    )
}

/// Creates a worker failed error
pub fn worker_failed(message: impl Into<String>) -> StoreError {
    StoreError::WorkerFailed {
        message: message.into(),
    }
}
