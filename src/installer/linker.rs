//! Namespace directory linking
//!
//! Links are grouped by namespace directory first, so each directory is computed in full
//! and rebuilt exactly once:
//!
//! ```text
//!   links: (a -> b) (a -> c) (a -> a)
//!   <a>/node_modules/            removed, then recreated
//!   <a>/node_modules/bar   -> <b>
//!   <a>/node_modules/@s/c  -> <c>
//!   <a>/node_modules/foo   -> <a>
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError, link};
use crate::graph::{Link, ValidatedGraph};

use super::LocationMap;

/// Desired contents of one source's namespace directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePlan {
    pub dir: PathBuf,
    /// (package name, install path it resolves to), in link order
    pub entries: Vec<(String, PathBuf)>,
}

/// Group `links` into one plan per namespace directory
///
/// Plans keep the order of their first link. Sources sharing an install path (nodes kept
/// in place at the same location) share one plan; an entry already planned there with the
/// same target is not repeated.
///
/// # Errors
///
/// Returns `StoreError::UnknownNode` if a link endpoint has no install location.
pub fn plan_namespaces(
    graph: &ValidatedGraph<'_>,
    links: &[Link],
    locations: &LocationMap,
    namespace_dir: &str,
) -> Result<Vec<NamespacePlan>> {
    let mut plans: Vec<NamespacePlan> = Vec::new();
    let mut by_dir: HashMap<PathBuf, usize> = HashMap::new();

    for l in links {
        let target = graph.node(l.target()).ok_or_else(|| StoreError::UnknownNode {
            key: l.target().to_string(),
        })?;
        let dir = locations.get(l.source())?.join(namespace_dir);
        let index = match by_dir.get(&dir) {
            Some(&index) => index,
            None => {
                plans.push(NamespacePlan {
                    dir: dir.clone(),
                    entries: Vec::new(),
                });
                by_dir.insert(dir, plans.len() - 1);
                plans.len() - 1
            }
        };
        let entry = (target.name().to_string(), locations.get(l.target())?.to_path_buf());
        if !plans[index].entries.contains(&entry) {
            plans[index].entries.push(entry);
        }
    }

    Ok(plans)
}

/// Rebuild every namespace directory from `links`; returns the number of entries created
///
/// # Errors
///
/// Returns `StoreError::NamespaceRebuildFailed` or `StoreError::LinkFailed`.
pub fn link_nodes(
    graph: &ValidatedGraph<'_>,
    links: &[Link],
    locations: &LocationMap,
    namespace_dir: &str,
) -> Result<usize> {
    let plans = plan_namespaces(graph, links, locations, namespace_dir)?;
    let mut created = 0;
    for plan in &plans {
        materialize_namespace(plan)?;
        created += plan.entries.len();
    }
    Ok(created)
}

/// Replace the namespace directory with exactly the planned entries
fn materialize_namespace(plan: &NamespacePlan) -> Result<()> {
    remove_existing(&plan.dir).map_err(|e| link::namespace_failed(&plan.dir, &e))?;
    fs::create_dir_all(&plan.dir).map_err(|e| link::namespace_failed(&plan.dir, &e))?;

    for (name, target) in &plan.entries {
        let entry = entry_path(&plan.dir, name);
        if let Some(parent) = entry.parent() {
            fs::create_dir_all(parent).map_err(|e| link::from_io(&entry, target, &e))?;
        }
        symlink_dir(target, &entry).map_err(|e| link::from_io(&entry, target, &e))?;
        tracing::trace!(entry = %entry.display(), target = %target.display(), "linked");
    }
    Ok(())
}

/// `@scope/name` lives in a `@scope` subdirectory
fn entry_path(dir: &Path, name: &str) -> PathBuf {
    name.split('/').fold(dir.to_path_buf(), |path, part| path.join(part))
}

fn remove_existing(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, Node, validate_graph};
    use tempfile::TempDir;

    struct Setup {
        temp: TempDir,
        graph: Graph,
    }

    impl Setup {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            for dir in ["src", "store/a", "store/b", "store/c"] {
                fs::create_dir_all(temp.path().join(dir)).unwrap();
            }
            let src = temp.path().join("src");
            let graph = Graph::new(
                vec![
                    Node::new("a", "app", &src),
                    Node::new("b", "bar", &src),
                    Node::new("c", "@scope/cee", &src),
                ],
                vec![],
            );
            Self { temp, graph }
        }

        fn store(&self, key: &str) -> PathBuf {
            self.temp.path().join("store").join(key)
        }

        fn locations(&self) -> LocationMap {
            let mut map = LocationMap::default();
            for key in ["a", "b", "c"] {
                map.insert(key, self.store(key));
            }
            map
        }
    }

    #[test]
    fn test_plan_groups_links_by_source() {
        let setup = Setup::new();
        let validated = validate_graph(&setup.graph).unwrap();
        let links = vec![
            Link::new("a", "b"),
            Link::new("b", "c"),
            Link::new("a", "c"),
            Link::new("a", "a"),
        ];

        let plans = plan_namespaces(&validated, &links, &setup.locations(), "node_modules").unwrap();

        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].dir, setup.store("a").join("node_modules"));
        let names: Vec<&str> = plans[0].entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["bar", "@scope/cee", "app"]);
        assert_eq!(plans[1].entries, vec![("@scope/cee".to_string(), setup.store("c"))]);
    }

    #[test]
    fn test_plan_merges_sources_sharing_an_install_path() {
        let setup = Setup::new();
        let validated = validate_graph(&setup.graph).unwrap();
        let mut locations = setup.locations();
        // a and b kept in place at the same directory
        locations.insert("b", setup.store("a"));
        let links = vec![
            Link::new("a", "c"),
            Link::new("b", "c"),
            Link::new("a", "a"),
            Link::new("b", "b"),
        ];

        let plans = plan_namespaces(&validated, &links, &locations, "node_modules").unwrap();

        assert_eq!(plans.len(), 1);
        let names: Vec<&str> = plans[0].entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["@scope/cee", "app", "bar"]);

        let created = link_nodes(&validated, &links, &locations, "node_modules").unwrap();
        assert_eq!(created, 3);
        let ns = setup.store("a").join("node_modules");
        assert_eq!(fs::read_link(ns.join("@scope/cee")).unwrap(), setup.store("c"));
        assert_eq!(fs::read_link(ns.join("bar")).unwrap(), setup.store("a"));
    }

    #[test]
    fn test_link_nodes_keeps_every_sibling_entry() {
        let setup = Setup::new();
        let validated = validate_graph(&setup.graph).unwrap();
        let links = vec![Link::new("a", "b"), Link::new("a", "c"), Link::new("a", "a")];

        let created = link_nodes(&validated, &links, &setup.locations(), "node_modules").unwrap();
        assert_eq!(created, 3);

        let ns = setup.store("a").join("node_modules");
        assert_eq!(fs::read_link(ns.join("bar")).unwrap(), setup.store("b"));
        assert_eq!(fs::read_link(ns.join("@scope/cee")).unwrap(), setup.store("c"));
        assert_eq!(fs::read_link(ns.join("app")).unwrap(), setup.store("a"));
    }

    #[test]
    fn test_link_nodes_replaces_existing_namespace() {
        let setup = Setup::new();
        let validated = validate_graph(&setup.graph).unwrap();
        let ns = setup.store("a").join("node_modules");
        fs::create_dir_all(ns.join("stale")).unwrap();
        fs::write(ns.join("stale/index.js"), "old").unwrap();

        link_nodes(&validated, &[Link::new("a", "b")], &setup.locations(), "node_modules").unwrap();

        assert!(!ns.join("stale").exists());
        assert!(ns.join("bar").exists());
    }

    #[test]
    fn test_entry_path_for_scoped_names() {
        let dir = Path::new("/store/a/node_modules");
        assert_eq!(entry_path(dir, "foo"), dir.join("foo"));
        assert_eq!(entry_path(dir, "@s/foo"), dir.join("@s").join("foo"));
    }
}
