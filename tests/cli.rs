//! CLI integration tests for the `rdcheck` binary.
//!
//! Spawns the binary with `assert_cmd` against the fixtures in tests/programs and
//! checks exit codes and output.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/programs")
        .join(name)
        .join("program.txt")
}

fn rdcheck() -> Command {
    let mut cmd = Command::cargo_bin("rdcheck").expect("rdcheck binary");
    // Keep a stray project.toml in the working directory from leaking in
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

#[test]
fn help_exits_0() {
    rdcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"));
}

#[test]
fn check_valid_program_exits_0() {
    rdcheck()
        .arg("check")
        .arg(fixture("gcd"))
        .assert()
        .success()
        .stdout(predicate::str::ends_with(": ok\n"));
}

#[test]
fn check_syntax_error_exits_1_with_parse_path() {
    rdcheck()
        .arg("check")
        .arg(fixture("missing_conditional_operator"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Line 2: Unexpected token 'b' (identifier)",
        ))
        .stderr(predicate::str::contains("        at <Conditional Operator>"))
        .stderr(predicate::str::contains("Expected a conditional operator."));
}

#[test]
fn check_trace_prints_rule_events() {
    rdcheck()
        .args(["check", "--trace"])
        .arg(fixture("procedure_call"))
        .assert()
        .success()
        .stdout(predicate::str::contains("BEGIN <StatementPart>"))
        .stdout(predicate::str::contains("BEGIN <Procedure Statement>"))
        .stdout(predicate::str::contains("END <ArgumentList>"));
}

#[test]
fn check_trace_on_failure_reports_exception() {
    rdcheck()
        .args(["check", "--trace"])
        .arg(fixture("missing_conditional_operator"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("BEGIN <Conditional Operator>"))
        .stdout(predicate::str::contains("Compilation Exception"))
        .stdout(predicate::str::contains("    Parse path:"))
        .stdout(predicate::str::contains("END <Conditional Operator>").not())
        .stderr(predicate::str::contains("Expected a conditional operator."));
}

#[test]
fn check_deepest_accepted_nesting_limit() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("project.toml");
    fs::write(&config, "[limits]\nmax_nesting_depth = 2000\n").unwrap();

    // 7 + 3 * 664 active rules at the innermost factor
    let program = dir.path().join("deep.txt");
    fs::write(&program, format!("begin x := {}1{} end\n", "(".repeat(664), ")".repeat(664))).unwrap();
    rdcheck()
        .arg("check")
        .arg(&program)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    // Far past the limit: a diagnostic, not a stack overflow
    fs::write(&program, format!("begin x := {}1{} end\n", "(".repeat(3300), ")".repeat(3300))).unwrap();
    rdcheck()
        .arg("check")
        .arg(&program)
        .arg("--config")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Nesting too deep"));
}

#[test]
fn check_missing_file_exits_2() {
    rdcheck()
        .args(["check", "does/not/exist.txt"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn check_lexical_error_exits_2() {
    let dir = TempDir::new().unwrap();
    let program = dir.path().join("program.txt");
    fs::write(&program, "begin x := 1 # 2 end\n").unwrap();

    rdcheck()
        .arg("check")
        .arg(&program)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unexpected character: '#'"));
}

#[test]
fn check_honours_config_limits() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("project.toml");
    fs::write(&config, "[limits]\nmax_identifier_length = 2\n").unwrap();

    rdcheck()
        .arg("check")
        .arg(fixture("gcd"))
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Identifier too long"));
}

#[test]
fn check_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("project.toml");
    fs::write(&config, "[limits]\nmax_nesting_depth = 0\n").unwrap();

    rdcheck()
        .arg("check")
        .arg(fixture("gcd"))
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("max_nesting_depth"));
}

#[test]
fn tokens_prints_one_token_per_line() {
    rdcheck()
        .arg("tokens")
        .arg(fixture("procedure_call"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1\tbegin\tbegin\n1\tcall\tcall\n1\tidentifier\tfoo\n"))
        .stdout(predicate::str::contains("1\tend of file\t\n"));
}
