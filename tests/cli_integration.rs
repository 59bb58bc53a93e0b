//! Integration tests for the command-line front end.
//!
//! Commands are parsed with clap and run against an in-memory buffer, so
//! both the exit code and the rendered output can be checked.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use gofacts::cli::{self, Cli, EXIT_ERROR, EXIT_FAILED, EXIT_SUCCESS};
use tempfile::TempDir;

fn testdata(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn run(args: &[&str]) -> (i32, String) {
    let mut argv = vec!["gofacts"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("arguments should parse");

    let mut out = Vec::new();
    let code = cli::run(&cli, &mut out).expect("command should run");
    (code, String::from_utf8(out).expect("output should be utf-8"))
}

#[test]
fn test_lint_vet_output() {
    let (code, out) = run(&["lint", &testdata("loop_defer.go"), "--format", "vet"]);

    assert_eq!(code, EXIT_FAILED);
    assert_eq!(
        out,
        "loop_defer.go:13:3: deferred-execution statement found inside a loop body\n\
         loop_defer.go:34:3: deferred-execution statement found inside a loop body\n"
    );
}

#[test]
fn test_lint_without_suppression() {
    let (code, out) = run(&[
        "check",
        &testdata("loop_defer.go"),
        "--format",
        "vet",
        "--no-suppress",
    ]);
    assert_eq!(code, EXIT_FAILED);
    assert_eq!(out.lines().count(), 3);
}

#[test]
fn test_lint_clean_file() {
    let (code, _) = run(&["lint", &testdata("sizes.go"), "--format", "json"]);
    assert_eq!(code, EXIT_SUCCESS);
}

#[test]
fn test_lint_sarif() {
    let (code, out) = run(&["lint", &testdata("loop_defer.go"), "--format", "sarif"]);
    assert_eq!(code, EXIT_FAILED);

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let results = value["runs"][0]["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["ruleId"], "loop-defer");
}

#[test]
fn test_funcs_json() {
    let (code, out) = run(&[
        "funcs",
        &testdata("visibility.go"),
        "--filter",
        "unexported",
        "--format",
        "json",
    ]);
    assert_eq!(code, EXIT_SUCCESS);

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let names: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["internalFunc", "anotherInternal", "init"]);
    assert_eq!(value[0]["exported"], false);
    assert_eq!(value[0]["line"], 5);
}

#[test]
fn test_sizes_limit() {
    let (code, out) = run(&["sizes", &testdata("sizes.go"), "--format", "json", "-n", "2"]);
    assert_eq!(code, EXIT_SUCCESS);

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "longFunc");
    assert_eq!(rows[0]["line_span"], 7);
    assert_eq!(rows[1]["name"], "shortFunc");
}

#[test]
fn test_decls_directory_skips_test_files() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.go"), "package p\n\nvar a, b int\n").unwrap();
    fs::write(temp.path().join("b.go"), "package p\n\nconst c = 1\n").unwrap();
    fs::write(temp.path().join("a_test.go"), "package p\n\nvar t int\n").unwrap();

    let root = temp.path().to_string_lossy().to_string();
    let (code, out) = run(&["decls", &root, "--format", "vet"]);
    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(out, "a.go: var=2 const=0\nb.go: var=0 const=1\n");

    let (_, out) = run(&["decls", &root, "--format", "vet", "--include-test-files"]);
    assert_eq!(out.lines().count(), 3);
}

#[test]
fn test_parse_failure_exit_code() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("good.go"), "package p\n\nfunc Good() {}\n").unwrap();
    fs::write(temp.path().join("bad.go"), "package p\n\nfunc (\n").unwrap();

    let root = temp.path().to_string_lossy().to_string();
    let (code, out) = run(&["funcs", &root, "--format", "vet"]);
    assert_eq!(code, EXIT_ERROR);
    assert!(out.contains("Good"));
}

#[test]
fn test_sarif_rejected_outside_lint() {
    let path = testdata("sizes.go");
    let cli = Cli::try_parse_from(["gofacts", "sizes", path.as_str(), "--format", "sarif"]).unwrap();
    let mut out = Vec::new();
    assert!(cli::run(&cli, &mut out).is_err());
}

#[test]
fn test_missing_path_is_error() {
    let cli = Cli::try_parse_from(["gofacts", "lint", "/definitely/not/here"]).unwrap();
    let mut out = Vec::new();
    assert!(cli::run(&cli, &mut out).is_err());
}
