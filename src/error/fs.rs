//! File system errors

use super::StoreError;

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> StoreError {
    StoreError::IoError {
        message: message.into(),
    }
}

/// Creates an IO error with the path that caused it
pub fn io_error_at(path: &std::path::Path, err: &std::io::Error) -> StoreError {
    io_error(format!("{}: {}", path.display(), err))
}
