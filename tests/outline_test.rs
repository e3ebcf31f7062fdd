//! Tests for loading forests from outline files

use std::fs;

use rstest::rstest;
use tempfile::TempDir;
use treebuilder::application::{load_outline, ApplicationError};
use treebuilder::util::testing;
use treebuilder::{Forest, NodeKind, Translation, TraversalOrder, TreeRender};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

const OUTLINE: &str = "\
# two roots
R
  c
  a
    z
  b
S
";

fn write_outline(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[rstest]
fn given_outline_file_when_loading_then_builds_forest() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir, "forest.txt", OUTLINE);

    let forest: Forest<String> = load_outline(&path, 2).unwrap();

    assert_eq!(forest.root_ids().len(), 2);
    assert_eq!(forest.len(), 6);
    let roots = forest.roots();
    assert_eq!(roots[0].kind(), NodeKind::Root);
    assert_eq!(roots[0].children()[1].kind(), NodeKind::Internal);
    let path: Vec<&String> = forest.path(TraversalOrder::InOrder);
    assert_eq!(path, vec!["c", "R", "a", "z", "b", "S"]);
}

#[rstest]
fn given_wider_indentation_when_loading_then_uses_configured_width() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir, "wide.txt", "1\n    2\n        3\n    4\n");

    let forest: Forest<i64> = load_outline(&path, 4).unwrap();

    assert_eq!(forest.depth(), 3);
    let path: Vec<&i64> = forest.path(TraversalOrder::PostOrder);
    assert_eq!(path, vec![&3, &2, &4, &1]);
}

#[rstest]
fn given_missing_file_when_loading_then_reports_io_error_with_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.txt");

    let err = load_outline::<i64>(&path, 2).unwrap_err();

    assert!(matches!(err, ApplicationError::Io { .. }));
    assert!(err.to_string().contains("missing.txt"), "{err}");
}

#[rstest]
#[case("1\n\t2\n", 2)]
#[case("1\n      2\n", 2)]
#[case("1\n 2\n", 2)]
#[case("1\n  two\n", 2)]
fn given_malformed_outline_when_loading_then_reports_line(
    #[case] content: &str,
    #[case] line: usize,
) {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir, "bad.txt", content);

    let err = load_outline::<i64>(&path, 2).unwrap_err();

    match err {
        ApplicationError::Outline { line: actual, .. } => assert_eq!(actual, line),
        other => panic!("expected outline error, got {other}"),
    }
}

#[rstest]
fn given_loaded_outline_when_sorting_and_rendering_then_shows_sorted_tree() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir, "forest.txt", OUTLINE);
    let mut forest: Forest<String> = load_outline(&path, 2).unwrap();

    forest.translate(Translation::SortAscending);

    let trees = forest.to_tree_strings();
    assert_eq!(trees.len(), 2);
    let names: Vec<&str> = trees[0].leaves.iter().map(|t| t.root.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert!(forest.to_string().contains("S"));
}
