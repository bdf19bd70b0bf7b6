//! CLI subprocess integration tests.
//!
//! These tests invoke the `bundlekit` binary as a subprocess and verify
//! exit codes, stdout content, and JSON output stability.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn bundlekit_bin(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bundlekit"));
    // Isolate from any config in the real home directory
    cmd.env("HOME", home);
    cmd.env_remove("BUNDLEKIT_LOG");
    cmd
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("output must be valid JSON: {e}\nstdout: {stdout}"))
}

#[test]
fn cli_version_exits_zero() {
    let home = tempfile::tempdir().unwrap();
    let output = bundlekit_bin(home.path()).arg("--version").output().unwrap();
    assert!(output.status.success(), "bundlekit --version must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bundlekit"), "version output: {stdout}");
}

#[test]
fn cli_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    let output = bundlekit_bin(home.path()).arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("placement"), "help must list 'placement'");
    assert!(stdout.contains("machines"), "help must list 'machines'");
}

#[test]
fn cli_placement_v4_json_output() {
    let home = tempfile::tempdir().unwrap();
    let output = bundlekit_bin(home.path())
        .args(["--json", "placement", "lxc:new", "mysql/1", ""])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "placement must exit 0. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let parsed = stdout_json(&output);
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["placement"], "lxc:new");
    assert_eq!(arr[0]["result"]["container"], "lxc");
    assert_eq!(arr[0]["result"]["machine"], "new");
    assert_eq!(arr[1]["result"]["unit"], "mysql");
    assert_eq!(arr[1]["result"]["unit_index"], 1);
    assert!(arr[2]["result"]["unit_index"].is_null());
}

#[test]
fn cli_placement_v3_legacy_machine_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = bundlekit_bin(home.path())
        .args(["placement", "--format", "v3", "0", "1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "validation errors exit 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("legacy bundles may not place units on machines other than 0"),
        "stderr: {stderr}"
    );
    assert!(stderr.contains("1 of 2 v3 placements invalid"), "stderr: {stderr}");
}

#[test]
fn cli_placement_json_reports_errors() {
    let home = tempfile::tempdir().unwrap();
    let output = bundlekit_bin(home.path())
        .args(["--json", "placement", "asdf:0"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let parsed = stdout_json(&output);
    assert_eq!(
        parsed[0]["error"],
        "invalid container asdf for placement asdf:0"
    );
    assert!(parsed[0].get("result").is_none());
}

#[test]
fn cli_placement_rejects_unknown_format() {
    let home = tempfile::tempdir().unwrap();
    let output = bundlekit_bin(home.path())
        .args(["placement", "--format", "v9", "0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown bundle format"), "stderr: {stderr}");
}

#[test]
fn cli_config_default_format_applies() {
    let home = tempfile::tempdir().unwrap();
    let config = write_file(home.path(), "bundlekit.toml", "default_format = \"v3\"\n");

    let output = bundlekit_bin(home.path())
        .args(["--json", "--config", &config.to_string_lossy()])
        .args(["placement", "mysql=1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed = stdout_json(&output);
    assert_eq!(parsed[0]["result"]["unit"], "mysql");
    assert_eq!(parsed[0]["result"]["unit_index"], 1);
}

#[test]
fn cli_config_in_home_is_loaded() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join(".config/bundlekit");
    std::fs::create_dir_all(&config_dir).unwrap();
    write_file(&config_dir, "config.toml", "default_format = \"v3\"\n");

    let output = bundlekit_bin(home.path())
        .args(["placement", "5"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "v3 rejects machine 5");
}

#[test]
fn cli_invalid_config_exits_input_error() {
    let home = tempfile::tempdir().unwrap();
    let config = write_file(home.path(), "bundlekit.toml", "default_format = 4\n");

    let output = bundlekit_bin(home.path())
        .args(["--config", &config.to_string_lossy(), "placement", "0"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config error:"), "stderr: {stderr}");
}

#[test]
fn cli_machines_normalizes_bundle() {
    let home = tempfile::tempdir().unwrap();
    let bundle = write_file(
        home.path(),
        "bundle.yaml",
        r#"services:
  mysql:
    charm: cs:trusty/mysql
    num_units: 1
    to: ["0"]
machines:
  "0":
    series: precise
  "1":
    series: trusty
    constraints: mem=foo
"#,
    );

    let output = bundlekit_bin(home.path())
        .args(["--json", "machines", &bundle.to_string_lossy()])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "machines must exit 0. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let parsed = stdout_json(&output);
    assert_eq!(parsed["0"]["series"], "precise");
    assert_eq!(parsed["1"]["constraints"], "mem=foo");
}

#[test]
fn cli_machines_raw_json_document() {
    let home = tempfile::tempdir().unwrap();
    let machines = write_file(home.path(), "machines.json", r#"{"2": {"series": "xenial"}}"#);

    let output = bundlekit_bin(home.path())
        .args(["machines", "--raw", &machines.to_string_lossy()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("machine 2"), "stdout: {stdout}");
    assert!(stdout.contains("xenial"), "stdout: {stdout}");
}

#[test]
fn cli_machines_malformed_exits_validation_error() {
    let home = tempfile::tempdir().unwrap();
    let bundle = write_file(home.path(), "bundle.yaml", "machines: bad-wolf\n");

    let output = bundlekit_bin(home.path())
        .args(["machines", &bundle.to_string_lossy()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Malformed machines bad-wolf"),
        "stderr: {stderr}"
    );
}

#[test]
fn cli_machines_missing_file_exits_input_error() {
    let home = tempfile::tempdir().unwrap();
    let output = bundlekit_bin(home.path())
        .args(["machines", &home.path().join("absent.yaml").to_string_lossy()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn cli_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    let output = bundlekit_bin(home.path())
        .args(["completions", "bash"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("bundlekit"));
}

#[test]
fn cli_man_pages_written() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join("man");
    let output = bundlekit_bin(home.path())
        .args(["man-pages", &dir.to_string_lossy()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(dir.join("bundlekit.1").exists());
    assert!(dir.join("bundlekit-placement.1").exists());
}
