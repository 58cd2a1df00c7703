//! Integration tests for the litmus CLI
//!
//! Tests end-to-end command behavior using the CLI binary.
//! Uses tempfile for isolated test directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// Get the path to the litmus binary (built by cargo)
fn litmus_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_litmus"))
}

/// Run litmus with the given args in the specified directory
fn run_litmus(dir: &Path, args: &[&str]) -> Output {
    litmus_binary()
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute litmus command")
}

/// Get stdout as string
fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as string
fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(&path, content).expect("Failed to write sample file");
    path
}

/// A small multi-language project with one example per file
fn setup_sample_project(dir: &Path) {
    write_file(
        dir,
        "calc.py",
        r#"
def add(a, b):
    """Add two numbers.

    >>> add(1, 2)
    3
    """
    return a + b
"#,
    );

    write_file(
        dir,
        "greet/greet.go",
        r#"package greet

import "fmt"

/*
 * > func hello() {
 * .   fmt.Println("hello!")
 * . }
 *
 * > hello()
 * hello!
 */
func Hello() {
	fmt.Println("hello!")
}
"#,
    );

    write_file(
        dir,
        "README.md",
        "# Sample\n\n```shell\n$ echo ok\nok\n```\n",
    );
}

fn parse_json(output: &Output) -> serde_json::Value {
    serde_json::from_str(&stdout(output)).unwrap_or_else(|e| {
        panic!("Invalid JSON output ({}): {}", e, stdout(output));
    })
}

// ============================================================================
// Scan Command Tests
// ============================================================================

#[test]
fn test_scan_json_finds_all_examples() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_sample_project(temp_dir.path());

    let output = run_litmus(temp_dir.path(), &["scan", "--format", "json"]);
    assert!(
        output.status.success(),
        "scan should succeed, stderr: {}",
        stderr(&output)
    );

    let json = parse_json(&output);
    let files = json["files"].as_array().expect("files array");
    assert_eq!(files.len(), 3);

    let go = files
        .iter()
        .find(|f| f["path"] == "greet/greet.go")
        .expect("go file in results");
    let examples = go["examples"].as_array().unwrap();
    assert_eq!(examples.len(), 2);
    assert_eq!(examples[0]["dialect"]["name"], "go");
    assert_eq!(examples[0]["source_lines"].as_array().unwrap().len(), 3);
    assert_eq!(examples[0]["start_line"], 6);
    assert_eq!(examples[1]["expected_output_lines"][0], "hello!");

    let py = files.iter().find(|f| f["path"] == "calc.py").unwrap();
    assert_eq!(py["examples"][0]["source_lines"][0], "add(1, 2)");
    assert_eq!(py["examples"][0]["start_line"], 5);

    let md = files.iter().find(|f| f["path"] == "README.md").unwrap();
    assert_eq!(md["examples"][0]["dialect"]["name"], "shell");
    assert_eq!(md["examples"][0]["expected_output_lines"][0], "ok");
}

#[test]
fn test_scan_table_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_sample_project(temp_dir.path());

    let output = run_litmus(temp_dir.path(), &["scan"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("calc.py"), "got: {}", out);
    assert!(out.contains("add(1, 2)"));
    assert!(out.contains("4 examples in 3 files"));
}

#[test]
fn test_scan_ignores_plain_line_comments() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(
        temp_dir.path(),
        "calc.cpp",
        "// ?: 1 + 1\n// 2\nint f();\n/*\n * ?: 2 + 2\n * 4\n */\n",
    );

    let output = run_litmus(temp_dir.path(), &["scan", "--format", "json"]);
    assert!(output.status.success());

    let json = parse_json(&output);
    let examples = json["files"][0]["examples"].as_array().unwrap();
    assert_eq!(examples.len(), 1);
    assert_eq!(examples[0]["source_lines"][0], "2 + 2");
    assert_eq!(examples[0]["start_line"], 5);
}

#[test]
fn test_scan_dialect_filter() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_sample_project(temp_dir.path());

    let output = run_litmus(
        temp_dir.path(),
        &["scan", "--dialect", "python", "--format", "json"],
    );
    assert!(output.status.success());

    let json = parse_json(&output);
    let total: usize = json["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["examples"].as_array().unwrap().len())
        .sum();
    assert_eq!(total, 1);
}

#[test]
fn test_scan_unknown_dialect_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_litmus(temp_dir.path(), &["scan", "--dialect", "cobol"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("cobol"));
}

#[test]
fn test_scan_reports_malformed_file_and_exits_nonzero() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_sample_project(temp_dir.path());
    write_file(temp_dir.path(), "broken.c", "int x;\n/* >>> 1\n");

    let output = run_litmus(temp_dir.path(), &["scan", "--format", "json"]);
    assert_eq!(output.status.code(), Some(1));

    let json = parse_json(&output);
    let failures = json["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["path"], "broken.c");
    assert_eq!(failures[0]["kind"], "malformed-comment");

    // The other files were still scanned
    assert_eq!(json["files"].as_array().unwrap().len(), 3);
}

#[test]
fn test_scan_single_file_argument() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_sample_project(temp_dir.path());

    let output = run_litmus(temp_dir.path(), &["scan", "calc.py", "--format", "json"]);
    assert!(output.status.success());

    let json = parse_json(&output);
    let files = json["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["host"], "python");
}

#[test]
fn test_scan_missing_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_litmus(temp_dir.path(), &["scan", "nope.py", "--format", "json"]);

    assert_eq!(output.status.code(), Some(1));
    let json = parse_json(&output);
    assert_eq!(json["failures"][0]["kind"], "not-found");
}

#[test]
fn test_scan_respects_litmusignore() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_sample_project(temp_dir.path());
    write_file(temp_dir.path(), ".litmusignore", "greet/\n");

    let output = run_litmus(temp_dir.path(), &["scan", "--format", "json"]);
    let json = parse_json(&output);
    let paths: Vec<&str> = json["files"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["path"].as_str())
        .collect();
    assert!(!paths.iter().any(|p| p.starts_with("greet")));
    assert_eq!(paths.len(), 2);
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_custom_dialect_and_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(
        temp_dir.path(),
        ".litmusrc.toml",
        r#"
[dialects]
enabled = []

[[dialects.custom]]
name = "lua"
language = "lua"
start_prompt = "lua>"
continuation_prompt = ">>"

[output]
format = "json"
"#,
    );
    write_file(
        temp_dir.path(),
        "mod.lua.txt",
        "lua> print(1 + 1)\n2\n\n>>> ignored()\n",
    );

    let output = run_litmus(temp_dir.path(), &["scan"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json = parse_json(&output);
    let examples = json["files"][0]["examples"].as_array().unwrap();
    assert_eq!(examples.len(), 1);
    assert_eq!(examples[0]["dialect"]["language"], "lua");
}

#[test]
fn test_broken_config_falls_back_to_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_sample_project(temp_dir.path());
    write_file(temp_dir.path(), ".litmusrc.toml", "[scanner\nignore = ");

    let output = run_litmus(temp_dir.path(), &["scan", "--format", "json"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains(".litmusrc.toml"));
    assert_eq!(parse_json(&output)["files"].as_array().unwrap().len(), 3);
}

// ============================================================================
// Listing Commands
// ============================================================================

#[test]
fn test_dialects_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_litmus(temp_dir.path(), &["dialects", "--format", "json"]);
    assert!(output.status.success());

    let json = parse_json(&output);
    let names: Vec<&str> = json["dialects"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["name"].as_str())
        .collect();
    assert!(names.contains(&"python"));
    assert!(names.contains(&"go"));
    assert!(names.contains(&"gdb"));
    assert!(names.contains(&"iasm"));
}

#[test]
fn test_languages_table() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_litmus(temp_dir.path(), &["languages"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("rust"));
    assert!(out.contains("markdown"));
}

#[test]
fn test_no_command_prints_help() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_litmus(temp_dir.path(), &[]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage"));
}
