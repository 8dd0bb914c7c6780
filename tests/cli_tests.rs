//! CLI integration tests using the real local-store binary

mod common;

use assert_cmd::Command;
use common::{TestStore, write_file};
use local_store::{Graph, Link, Node};
use predicates::prelude::*;
use std::fs;

fn local_store_cmd() -> Command {
    Command::new(TestStore::local_store_bin())
}

fn two_package_graph(test: &TestStore) -> Graph {
    let foo = test.package("foo", &[("index.js", "foo")]);
    let bar = test.package("bar", &[("index.js", "bar"), ("bin/bar.js", "")]);
    Graph::new(
        vec![
            Node::new("fookey", "foo", foo),
            Node::new("barkey", "bar", bar).with_bin("bar", "bin/bar.js"),
        ],
        vec![Link::new("fookey", "barkey")],
    )
}

#[test]
fn test_help_output() {
    local_store_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("local package store"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_install_json_graph() {
    let test = TestStore::new();
    let graph_file = test.write_graph(&two_package_graph(&test));

    local_store_cmd()
        .arg("install")
        .arg(&graph_file)
        .arg(&test.store)
        .args(["--workers", "2", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed 2 package(s)"))
        .stdout(predicate::str::contains("bin shims: 2"));

    assert_eq!(
        fs::read_to_string(test.entry("fookey", "bar").join("index.js")).unwrap(),
        "bar"
    );
    assert!(test.entry("fookey", ".bin/bar").exists());
}

#[test]
fn test_install_yaml_graph() {
    let test = TestStore::new();
    let app = test.package("app", &[("index.js", "app")]);
    let lib = test.package("lib", &[("index.js", "lib")]);
    let graph_file = test.root.join("graph.yaml");
    write_file(
        &graph_file,
        &format!(
            "nodes:\n  - key: app\n    name: app\n    location: {}\n    keepInPlace: true\n  \
             - key: lib\n    name: '@acme/lib'\n    location: {}\nlinks:\n  - source: app\n    target: lib\n",
            app.display(),
            lib.display()
        ),
    );

    local_store_cmd()
        .arg("install")
        .arg(&graph_file)
        .arg(&test.store)
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains("kept in place: 1"));

    assert_eq!(
        fs::read_link(app.join("node_modules/@acme/lib")).unwrap(),
        test.installed("lib")
    );
}

#[test]
fn test_install_into_non_empty_location_fails() {
    let test = TestStore::new();
    let graph_file = test.write_graph(&two_package_graph(&test));
    write_file(&test.store.join("existing.txt"), "");

    local_store_cmd()
        .arg("install")
        .arg(&graph_file)
        .arg(&test.store)
        .arg("-q")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Location is not an empty directory"));

    assert!(!test.installed("fookey").exists());
}

#[test]
fn test_install_rejects_bad_workers_env() {
    let test = TestStore::new();
    let graph_file = test.write_graph(&two_package_graph(&test));

    local_store_cmd()
        .env("WORKERS_LIMIT", "many")
        .arg("install")
        .arg(&graph_file)
        .arg(&test.store)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WORKERS_LIMIT"));
}

#[test]
fn test_validate_valid_graph() {
    let test = TestStore::new();
    let graph_file = test.write_graph(&two_package_graph(&test));

    local_store_cmd()
        .arg("validate")
        .arg(&graph_file)
        .arg("--location")
        .arg(&test.store)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 node(s), 1 link(s)"));

    assert_eq!(test.store_entries(), 0);
}

#[test]
fn test_validate_reports_dangling_link() {
    let test = TestStore::new();
    let foo = test.package("foo", &[("index.js", "")]);
    let graph = Graph::new(
        vec![Node::new("fookey", "foo", foo)],
        vec![Link::new("fookey", "nowhere")],
    );
    let graph_file = test.write_graph(&graph);

    local_store_cmd()
        .arg("validate")
        .arg(&graph_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid link target: \"nowhere\""));
}

#[test]
fn test_missing_graph_file() {
    let test = TestStore::new();

    local_store_cmd()
        .arg("validate")
        .arg(test.root.join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read graph file"));
}
