//! End-to-end CLI tests covering spec.md §8's concrete scenarios: write
//! a source file, run the `pseu` binary against it, assert on captured
//! stdout and exit code.

use assert_cmd::Command;
use predicates::prelude::*;

fn pseu() -> Command {
    Command::cargo_bin("pseu").unwrap()
}

fn write_source(dir: &std::path::Path, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, source).unwrap();
    path
}

#[test]
fn scenario_1_output_literal() {
    let dir = tempfile_dir();
    let file = write_source(dir.path(), "a.pseu", "OUTPUT 1\n");
    pseu().arg("run").arg(&file).assert().success().stdout("1\n");
}

#[test]
fn scenario_2_operator_precedence() {
    let dir = tempfile_dir();
    let file = write_source(dir.path(), "a.pseu", "OUTPUT 2 + 3 * 4\n");
    pseu().arg("run").arg(&file).assert().success().stdout("14\n");
}

#[test]
fn scenario_4_declare_assign_reassign() {
    let dir = tempfile_dir();
    let file = write_source(dir.path(), "a.pseu", "DECLARE X : INTEGER\nX <- 41\nX <- X + 1\nOUTPUT X\n");
    pseu().arg("run").arg(&file).assert().success().stdout("42\n");
}

#[test]
fn scenario_5_store_type_mismatch_is_compile_error() {
    let dir = tempfile_dir();
    let file = write_source(dir.path(), "a.pseu", "DECLARE X : INTEGER\nX <- TRUE\n");
    pseu().arg("run").arg(&file).assert().code(2).stdout("");
}

#[test]
fn scenario_6_uninitialised_global_is_runtime_error() {
    let dir = tempfile_dir();
    let file = write_source(dir.path(), "a.pseu", "DECLARE X : INTEGER\nOUTPUT X\n");
    pseu()
        .arg("run")
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("uninitialised variable X"));
}

#[test]
fn scenario_8_function_call() {
    let dir = tempfile_dir();
    let file = write_source(
        dir.path(),
        "a.pseu",
        "FUNCTION F(X: INTEGER): INTEGER\nRETURN X * X\nENDFUNCTION\nOUTPUT F(7)\n",
    );
    pseu().arg("run").arg(&file).assert().success().stdout("49\n");
}

#[test]
fn scenario_9_if_then_else() {
    let dir = tempfile_dir();
    let file = write_source(dir.path(), "a.pseu", "IF TRUE THEN\nOUTPUT 1\nELSE\nOUTPUT 2\nENDIF\n");
    pseu().arg("run").arg(&file).assert().success().stdout("1\n");
}

#[test]
fn check_command_compiles_without_running() {
    let dir = tempfile_dir();
    let file = write_source(dir.path(), "a.pseu", "OUTPUT 1\n");
    pseu().arg("check").arg(&file).assert().success().stdout("");
}

#[test]
fn dump_ast_flag_prints_before_running() {
    let dir = tempfile_dir();
    let file = write_source(dir.path(), "a.pseu", "OUTPUT 1\n");
    pseu()
        .arg("--dump-ast")
        .arg("run")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ast").and(predicate::str::contains("1\n")));
}

#[test]
fn dump_bytecode_flag_prints_disassembly() {
    let dir = tempfile_dir();
    let file = write_source(dir.path(), "a.pseu", "OUTPUT 1\n");
    pseu()
        .arg("--dump-bytecode")
        .arg("run")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("root:").and(predicate::str::contains("LdConst")));
}

#[test]
fn missing_file_is_a_compile_error() {
    pseu().arg("run").arg("/no/such/file.pseu").assert().code(1);
}

fn tempfile_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}
