//! Common test utilities for local-store integration tests

use std::path::{Path, PathBuf};

use local_store::Graph;
use tempfile::TempDir;

/// Package sources plus an empty store directory, under one temp dir
#[allow(dead_code)]
pub struct TestStore {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Root of the temp dir, resolved through symlinks
    pub root: PathBuf,
    /// Empty store directory
    pub store: PathBuf,
}

#[allow(dead_code)]
impl TestStore {
    /// Create a new test store
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = dunce::canonicalize(temp.path()).expect("Failed to resolve temp directory");
        let store = root.join("store");
        std::fs::create_dir_all(&store).expect("Failed to create store directory");
        Self { temp, root, store }
    }

    /// Create a package directory with the given files
    pub fn package(&self, dir: &str, files: &[(&str, &str)]) -> PathBuf {
        let package_path = self.root.join("packages").join(dir);
        std::fs::create_dir_all(&package_path).expect("Failed to create package directory");
        for (path, content) in files {
            write_file(&package_path.join(path), content);
        }
        package_path
    }

    /// Install path of a copied node
    pub fn installed(&self, key: &str) -> PathBuf {
        self.store.join(key)
    }

    /// Namespace entry `name` inside the install path of `key`
    pub fn entry(&self, key: &str, name: &str) -> PathBuf {
        self.installed(key).join("node_modules").join(name)
    }

    /// Write `graph` as a JSON document and return its path
    pub fn write_graph(&self, graph: &Graph) -> PathBuf {
        let path = self.root.join("graph.json");
        let json = serde_json::to_string_pretty(graph).expect("Failed to serialize graph");
        write_file(&path, &json);
        path
    }

    /// Number of entries directly inside the store directory
    pub fn store_entries(&self) -> usize {
        std::fs::read_dir(&self.store)
            .expect("Failed to read store directory")
            .count()
    }

    /// Get path to local-store binary
    pub fn local_store_bin() -> PathBuf {
        PathBuf::from(env!("CARGO_BIN_EXE_local-store"))
    }
}

/// Write a file, creating parent directories
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}
