//! Tests for the `make-ssh-config` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const LAYERS: &str = r#"
- name: base
  vars: { p: 22 }
  config: { Port: "{{p}}" }
- merge: base
  host: example.com
"#;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("make-ssh-config").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG").env_remove("MAKE_SSH_CONFIG_OUTPUT");
    cmd
}

#[test]
fn test_reads_default_input_and_prints_to_stdout() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.yaml"), LAYERS).unwrap();

    cmd()
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout("Host example.com\n    Port 22\n\n")
        .stderr("");
}

#[test]
fn test_reads_stdin() {
    cmd()
        .arg("-")
        .write_stdin(LAYERS)
        .assert()
        .success()
        .stdout("Host example.com\n    Port 22\n\n");
}

#[test]
fn test_writes_output_file() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("layers.yaml");
    let output = temp.path().join("nested/ssh_config");
    fs::write(&input, LAYERS).unwrap();

    cmd().arg(&input).arg("--output").arg(&output).assert().success().stdout("");

    assert_eq!(fs::read_to_string(&output).unwrap(), "Host example.com\n    Port 22\n\n");
}

#[test]
fn test_output_from_environment() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("layers.yaml");
    let output = temp.path().join("ssh_config");
    fs::write(&input, LAYERS).unwrap();

    cmd().arg(&input).env("MAKE_SSH_CONFIG_OUTPUT", &output).assert().success();

    assert!(output.exists());
}

#[test]
fn test_undefined_merge_fails_without_output() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("layers.yaml");
    let output = temp.path().join("ssh_config");
    fs::write(&input, "- host: fine\n- name: broken\n  merge: ghost\n  host: x\n").unwrap();

    cmd()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Undefined record 'ghost'"))
        .stderr(predicate::str::contains("Failed to process record #1 ('broken')"));

    assert!(!output.exists());
}

#[test]
fn test_suggestion_for_misspelled_layer() {
    cmd()
        .arg("-")
        .write_stdin("- name: bastion\n- merge: bastoin\n  host: x\n")
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("Did you mean 'bastion'?"));
}

#[test]
fn test_missing_input_file() {
    let temp = TempDir::new().unwrap();

    cmd()
        .current_dir(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read input file: config.yaml"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    cmd()
        .args(["-", "--verbose"])
        .write_stdin(LAYERS)
        .assert()
        .success()
        .stdout("Host example.com\n    Port 22\n\n")
        .stderr(predicate::str::contains("Compiled 2 record(s) into 1 block(s)"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    cmd().args(["-v", "-q"]).assert().failure().code(2);
}
