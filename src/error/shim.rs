//! Shim errors

use super::StoreError;

/// Creates a shim failed error
pub fn failed(
    bin: impl Into<String>,
    path: impl Into<String>,
    reason: impl Into<String>,
) -> StoreError {
    StoreError::ShimFailed {
        bin: bin.into(),
        path: path.into(),
        reason: reason.into(),
    }
}
