//! End-to-end tests of the `xcorr-batch` binary with stand-in tools.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_xcorr-batch");

const FAKE_PAPERMILL: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then echo 2.6.0; exit 0; fi
echo '{"cells": []}' > "$2"
"#;

const FAILING_PAPERMILL: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then echo 2.6.0; exit 0; fi
echo "PapermillExecutionError: cell raised" >&2
exit 1
"#;

const FAKE_JUPYTER: &str = r#"#!/bin/sh
if [ "$2" = "--version" ]; then echo 7.16.0; exit 0; fi
case "$4" in
    latex) ext=tex ;;
    html) ext=html ;;
    *) ext=pdf ;;
esac
echo report > "${2%.ipynb}.$ext"
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn write_config(dir: &Path, papermill: &Path, jupyter: &Path, extra_batch: &str) -> PathBuf {
    let path = dir.join("xcorr.toml");
    std::fs::write(
        &path,
        format!(
            r#"
[batch]
stacks = ["/data/foo", "/data/bar"]
{}

[executor]
papermill_path = "{}"

[converter]
jupyter_path = "{}"

[output]
root = "{}"
"#,
            extra_batch,
            papermill.display(),
            jupyter.display(),
            dir.join("out").display()
        ),
    )
    .unwrap();
    path
}

fn xcorr(dir: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .current_dir(dir)
        .env_remove("XCORR_CONFIG")
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to run xcorr-batch")
}

#[test]
fn plan_from_command_line_only() {
    let dir = TempDir::new().unwrap();
    let output = xcorr(
        dir.path(),
        &["plan", "--json", "--stack", "/data/foo", "--output-root", "/work"],
    );
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = plan["stacks"][0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(
        items[0]["notebook_path"],
        "/work/cross_correlation_foo/output_foo_vv_OPERA_RTC_Cross_Correlation.ipynb"
    );
    assert_eq!(
        items[1]["notebook_path"],
        "/work/cross_correlation_foo/output_foo_vh_OPERA_RTC_Cross_Correlation.ipynb"
    );
    // Planning never touches the filesystem.
    assert!(!Path::new("/work/cross_correlation_foo").exists());
}

#[test]
fn plan_lists_reports_with_exporter_extension() {
    let dir = TempDir::new().unwrap();
    let output = xcorr(
        dir.path(),
        &[
            "plan",
            "--stack",
            "/data/foo",
            "--output-root",
            "/work",
            "--format",
            "latex",
        ],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout
        .contains("/work/cross_correlation_foo/output_foo_vv_OPERA_RTC_Cross_Correlation.tex"));
    assert!(!stdout.contains(".latex"));
}

#[test]
fn plan_without_config_or_stacks_fails() {
    let dir = TempDir::new().unwrap();
    let output = xcorr(dir.path(), &["plan"]);
    assert!(!output.status.success());
}

#[test]
fn plan_rejects_colliding_stack_names() {
    let dir = TempDir::new().unwrap();
    let output = xcorr(
        dir.path(),
        &["plan", "--stack", "/a/foo", "--stack", "/b/foo"],
    );
    assert!(!output.status.success());
}

#[test]
fn run_produces_notebooks_and_reports() {
    let dir = TempDir::new().unwrap();
    let papermill = write_script(dir.path(), "papermill", FAKE_PAPERMILL);
    let jupyter = write_script(dir.path(), "jupyter", FAKE_JUPYTER);
    let config = write_config(dir.path(), &papermill, &jupyter, "");

    let output = xcorr(
        dir.path(),
        &["--config", config.to_str().unwrap(), "run", "--json"],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["planned"], 4);
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 4);

    for stack in ["foo", "bar"] {
        let out = dir.path().join("out").join(format!("cross_correlation_{}", stack));
        for pol in ["vv", "vh"] {
            let stem = format!("output_{}_{}_OPERA_RTC_Cross_Correlation", stack, pol);
            assert!(out.join(format!("{}.ipynb", stem)).exists());
            assert!(out.join(format!("{}.pdf", stem)).exists());
        }
    }
}

#[test]
fn run_with_latex_reports() {
    let dir = TempDir::new().unwrap();
    let papermill = write_script(dir.path(), "papermill", FAKE_PAPERMILL);
    let jupyter = write_script(dir.path(), "jupyter", FAKE_JUPYTER);
    let config = write_config(dir.path(), &papermill, &jupyter, "");

    let output = xcorr(
        dir.path(),
        &[
            "--config",
            config.to_str().unwrap(),
            "run",
            "--json",
            "--format",
            "latex",
            "--stack",
            "/data/foo",
        ],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let out = dir.path().join("out").join("cross_correlation_foo");
    for pol in ["vv", "vh"] {
        let tex = out.join(format!("output_foo_{}_OPERA_RTC_Cross_Correlation.tex", pol));
        assert!(tex.exists(), "missing {:?}", tex);
    }
}

#[test]
fn run_fail_fast_exits_nonzero_with_partial_report() {
    let dir = TempDir::new().unwrap();
    let papermill = write_script(dir.path(), "papermill", FAILING_PAPERMILL);
    let jupyter = write_script(dir.path(), "jupyter", FAKE_JUPYTER);
    let config = write_config(dir.path(), &papermill, &jupyter, "");

    let output = xcorr(
        dir.path(),
        &[
            "--config",
            config.to_str().unwrap(),
            "run",
            "--json",
            "--fail-fast",
        ],
    );
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["aborted"], true);
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 1);
    assert_eq!(report["outcomes"][0]["stage"], "execute");
}

#[test]
fn run_continue_attempts_every_item() {
    let dir = TempDir::new().unwrap();
    let papermill = write_script(dir.path(), "papermill", FAILING_PAPERMILL);
    let jupyter = write_script(dir.path(), "jupyter", FAKE_JUPYTER);
    let config = write_config(dir.path(), &papermill, &jupyter, "");

    let output = xcorr(
        dir.path(),
        &["--config", config.to_str().unwrap(), "run", "--json"],
    );
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["aborted"], false);
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 4);
}

#[test]
fn check_reports_missing_tools() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        Path::new("/nonexistent/papermill"),
        Path::new("/nonexistent/jupyter"),
        "",
    );

    let output = xcorr(dir.path(), &["--config", config.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
}

#[test]
fn check_passes_with_tools_present() {
    let dir = TempDir::new().unwrap();
    let papermill = write_script(dir.path(), "papermill", FAKE_PAPERMILL);
    let jupyter = write_script(dir.path(), "jupyter", FAKE_JUPYTER);
    let config = write_config(dir.path(), &papermill, &jupyter, "delete_mosaics = true");

    let output = xcorr(dir.path(), &["--config", config.to_str().unwrap(), "check"]);
    assert!(output.status.success());
}
