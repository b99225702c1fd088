//! Binary-level tests driving pyforge through piped stdin.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn pyforge() -> Command {
    let mut cmd = Command::cargo_bin("pyforge").unwrap();
    cmd.env_remove("PYFORGE_PROJECT_DIR").env("NO_COLOR", "1");
    cmd
}

fn answers(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{l}\n")).collect()
}

#[test]
fn prints_version() {
    pyforge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn check_env_reports_and_exits() {
    let tmp = TempDir::new().unwrap();
    pyforge()
        .current_dir(tmp.path())
        .arg("--check-env")
        .assert()
        .success()
        .stdout(predicate::str::contains("Environment check"))
        .stdout(predicate::str::contains("Build tools"));

    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn package_mode_writes_packaging_script() {
    let tmp = TempDir::new().unwrap();
    // name, script, version, tool, formats, arch, install path, description,
    // maintainer, homepage, license, depends, menu entry, service, output dir
    let input = answers(&[
        "demo", "", "2.0.0", "", "", "", "", "", "", "", "", "", "", "", "",
    ]);

    pyforge()
        .args(["--mode", "package", "--project-dir"])
        .arg(tmp.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("create_packages.py"));

    let script = fs::read_to_string(tmp.path().join("create_packages.py")).unwrap();
    assert!(script.starts_with("#!/usr/bin/env python3"));
    assert!(script.contains("PACKAGE_NAME = \"demo\""));
    assert!(script.contains("PACKAGE_VERSION = \"2.0.0\""));
    assert!(script.contains("\"deb\": \"demo_2.0.0_amd64.deb\""));
}

#[test]
fn compile_mode_writes_build_script() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("main.py"), "print('hello')\n").unwrap();
    let input = answers(&[""; 20]);

    pyforge()
        .args(["--mode", "compile", "--project-dir"])
        .arg(tmp.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("build.py"));

    let script = fs::read_to_string(tmp.path().join("build.py")).unwrap();
    assert!(script.contains("\"nuitka\","));
    assert!(script.contains("\"--standalone\","));
    assert!(script.contains("\"main.py\","));
    assert!(script.contains("Linux package generation is disabled"));
}

#[test]
fn entry_outside_project_is_asked_again() {
    let tmp = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    fs::write(tmp.path().join("main.py"), "").unwrap();
    let outside = elsewhere.path().join("run.py");
    fs::write(&outside, "").unwrap();

    let mut lines = vec!["", outside.to_str().unwrap(), "main.py"];
    lines.extend([""; 18]);

    pyforge()
        .args(["--mode", "compile", "--project-dir"])
        .arg(tmp.path())
        .write_stdin(answers(&lines))
        .assert()
        .success()
        .stdout(predicate::str::contains("inside the project directory"));

    let script = fs::read_to_string(tmp.path().join("build.py")).unwrap();
    assert!(script.contains("\"main.py\","));
}

#[test]
fn end_of_input_cancels_without_writing() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("main.py"), "").unwrap();

    pyforge()
        .args(["--mode", "compile", "--project-dir"])
        .arg(tmp.path())
        .write_stdin(answers(&["", ""]))
        .assert()
        .code(130);

    assert!(!tmp.path().join("build.py").exists());
}

#[test]
fn unknown_mode_is_rejected() {
    pyforge()
        .args(["--mode", "everything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("everything"));
}
