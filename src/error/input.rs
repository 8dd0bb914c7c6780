//! Input validation errors
//!
//! Every error here is raised before the installer touches the disk.

use super::StoreError;

/// Creates a location-not-absolute error
pub fn location_not_absolute(path: impl Into<String>) -> StoreError {
    StoreError::LocationNotAbsolute { path: path.into() }
}

/// Creates a location-not-found error
pub fn location_not_found(path: impl Into<String>) -> StoreError {
    StoreError::LocationNotFound { path: path.into() }
}

/// Creates a location-not-directory error
pub fn location_not_directory(path: impl Into<String>) -> StoreError {
    StoreError::LocationNotDirectory { path: path.into() }
}

/// Creates a location-not-empty error
pub fn location_not_empty(path: impl Into<String>) -> StoreError {
    StoreError::LocationNotEmpty { path: path.into() }
}

/// Creates a duplicate node key error
pub fn duplicate_key(key: impl Into<String>) -> StoreError {
    StoreError::DuplicateNodeKey { key: key.into() }
}

/// Creates an invalid package name error
pub fn invalid_name(name: impl Into<String>) -> StoreError {
    StoreError::InvalidPackageName { name: name.into() }
}

pub fn node_location_not_absolute(path: impl Into<String>) -> StoreError {
    StoreError::NodeLocationNotAbsolute { path: path.into() }
}

pub fn node_location_not_directory(path: impl Into<String>) -> StoreError {
    StoreError::NodeLocationNotDirectory { path: path.into() }
}

pub fn invalid_link_source(key: impl Into<String>) -> StoreError {
    StoreError::InvalidLinkSource { key: key.into() }
}

pub fn invalid_link_target(key: impl Into<String>) -> StoreError {
    StoreError::InvalidLinkTarget { key: key.into() }
}

/// Creates an error for a package linking two dependencies with the same name
pub fn ambiguous_dependency(package: impl Into<String>, name: impl Into<String>) -> StoreError {
    StoreError::AmbiguousDependency {
        package: package.into(),
        name: name.into(),
    }
}

pub fn invalid_bin_name(package: impl Into<String>, bin: impl Into<String>) -> StoreError {
    StoreError::InvalidBinName {
        package: package.into(),
        bin: bin.into(),
    }
}

/// Creates a bin collision error for the package receiving both scripts
pub fn bin_collision(bin: impl Into<String>, package: impl Into<String>) -> StoreError {
    StoreError::BinCollision {
        bin: bin.into(),
        package: package.into(),
    }
}
