//! End-to-end CLI tests: run the `berd` binary against real source files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn berd() -> Command {
    Command::cargo_bin("berd").expect("binary builds")
}

fn source_file(program: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(program.as_bytes()).expect("write program");
    file
}

#[test]
fn test_runs_program_and_prints_output() {
    let file = source_file("var var x = 1!\nx = 2!\nx = 3!\nprint history(x)!\n");
    berd()
        .arg(file.path())
        .assert()
        .success()
        .stdout("[1, 2, 3]\n")
        .stderr(predicate::str::contains("finished in"));
}

#[test]
fn test_when_program() {
    let file = source_file(
        "var var a = 0!\nwhen a > 2 { print \"big\"! }\na = 1!\na = 3!\na = 4!\n",
    );
    berd().arg(file.path()).assert().success().stdout("big\nbig\n");
}

#[test]
fn test_language_error_renders_caret_and_fails() {
    let file = source_file("const const y = 10!\ny = 11!\n");
    berd()
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[name]"))
        .stderr(predicate::str::contains(":2:1"))
        .stderr(predicate::str::contains("^"));
}

#[test]
fn test_lex_error_reports_offset() {
    let file = source_file("var var x = £!\n");
    berd()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[lex]"));
}

#[test]
fn test_partial_output_before_error() {
    let file = source_file("const const const z = 7!\nprint z!\nz = 8!\n");
    berd()
        .arg(file.path())
        .assert()
        .failure()
        .stdout("7\n")
        .stderr(predicate::str::contains("error[name]"));
}

#[test]
fn test_usage_without_arguments() {
    berd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage: berd <file>"));
}

#[test]
fn test_missing_file_is_host_error() {
    berd()
        .arg("does-not-exist.db")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}
