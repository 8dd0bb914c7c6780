//! Bin shims for dependents
//!
//! For every link whose target declares bins, each bin whose script exists gets a shim
//! in `<source>/node_modules/.bin/<bin>`. Missing scripts are skipped. Name collisions
//! are rejected earlier by `validate_bins`.

use std::fs;
use std::path::Path;

use crate::error::{Result, fs as fs_error, shim};
use crate::graph::{Link, ValidatedGraph};

use super::LocationMap;
use super::shim::ShimGenerator;

/// Where bin shims are written, relative to a node's install path
#[derive(Debug, Clone, Copy)]
pub struct BinLayout<'a> {
    pub namespace_dir: &'a str,
    pub bin_dir: &'a str,
}

impl BinLayout<'_> {
    fn bin_dir_of(&self, install_path: &Path) -> std::path::PathBuf {
        install_path.join(self.namespace_dir).join(self.bin_dir)
    }
}

/// Create shims for every bin reachable through `links`; returns how many were written
///
/// # Errors
///
/// Returns `StoreError::ShimFailed` when the generator fails, or an io error when the
/// bin directory cannot be created.
pub fn generate_bins(
    graph: &ValidatedGraph<'_>,
    links: &[Link],
    locations: &LocationMap,
    layout: BinLayout<'_>,
    generator: &dyn ShimGenerator,
) -> Result<usize> {
    let mut written = 0;

    for l in links {
        let Some(target) = graph.node(l.target()) else {
            continue;
        };
        if target.bins().is_empty() {
            continue;
        }

        let bin_dir = layout.bin_dir_of(locations.get(l.source())?);
        fs::create_dir_all(&bin_dir).map_err(|e| fs_error::io_error_at(&bin_dir, &e))?;
        let target_root = locations.get(l.target())?;

        for (bin, script) in target.bins() {
            let script_path = target_root.join(script);
            if !script_path.exists() {
                tracing::debug!(
                    bin = bin.as_str(),
                    script = %script_path.display(),
                    "bin script missing, skipping"
                );
                continue;
            }
            let shim_path = bin_dir.join(bin);
            generator
                .generate(&script_path, &shim_path)
                .map_err(|e| shim::failed(bin, shim_path.display().to_string(), e.to_string()))?;
            written += 1;
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::graph::{Graph, Node, validate_graph};
    use std::io;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records calls instead of touching the disk
    #[derive(Default)]
    struct RecordingShim {
        calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    impl ShimGenerator for RecordingShim {
        fn generate(&self, script: &Path, shim: &Path) -> io::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((script.to_path_buf(), shim.to_path_buf()));
            Ok(())
        }
    }

    struct FailingShim;

    impl ShimGenerator for FailingShim {
        fn generate(&self, _script: &Path, _shim: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    const LAYOUT: BinLayout<'static> = BinLayout {
        namespace_dir: "node_modules",
        bin_dir: ".bin",
    };

    fn setup() -> (TempDir, Graph, LocationMap) {
        let temp = TempDir::new().unwrap();
        let app = temp.path().join("app");
        let tool = temp.path().join("tool");
        fs::create_dir_all(&app).unwrap();
        fs::create_dir_all(tool.join("bin")).unwrap();
        fs::write(tool.join("bin/tool.js"), "").unwrap();

        let graph = Graph::new(
            vec![
                Node::new("app", "app", &app),
                Node::new("tool", "tool", &tool)
                    .with_bin("tool", "bin/tool.js")
                    .with_bin("ghost", "bin/ghost.js"),
            ],
            vec![],
        );
        let mut locations = LocationMap::default();
        locations.insert("app", app);
        locations.insert("tool", tool);
        (temp, graph, locations)
    }

    #[test]
    fn test_generate_bins_skips_missing_scripts() {
        let (temp, graph, locations) = setup();
        let validated = validate_graph(&graph).unwrap();
        let recorder = RecordingShim::default();

        let written = generate_bins(
            &validated,
            &[Link::new("app", "tool")],
            &locations,
            LAYOUT,
            &recorder,
        )
        .unwrap();

        assert_eq!(written, 1);
        let calls = recorder.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            (
                temp.path().join("tool/bin/tool.js"),
                temp.path().join("app/node_modules/.bin/tool"),
            )
        );
        assert!(temp.path().join("app/node_modules/.bin").is_dir());
    }

    #[test]
    fn test_generate_bins_ignores_targets_without_bins() {
        let (temp, graph, locations) = setup();
        let validated = validate_graph(&graph).unwrap();

        let written = generate_bins(
            &validated,
            &[Link::new("tool", "app")],
            &locations,
            LAYOUT,
            &RecordingShim::default(),
        )
        .unwrap();

        assert_eq!(written, 0);
        assert!(!temp.path().join("tool/node_modules").exists());
    }

    #[test]
    fn test_generate_bins_reports_generator_failure() {
        let (_temp, graph, locations) = setup();
        let validated = validate_graph(&graph).unwrap();

        let err = generate_bins(
            &validated,
            &[Link::new("app", "tool")],
            &locations,
            LAYOUT,
            &FailingShim,
        )
        .unwrap_err();

        assert!(matches!(err, StoreError::ShimFailed { bin, .. } if bin == "tool"));
    }
}
