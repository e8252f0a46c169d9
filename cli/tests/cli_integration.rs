//! Integration tests for list, describe and run against a fixture manifest.

use std::path::PathBuf;
use std::process::{Command, Output};

const GUIDANCE_SUFFIX: &str =
    "To mitigate this issue, please refer to the troubleshooting guidelines here at https://aka.ms/azmcp/troubleshooting.";

fn contract_run_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_contract-run"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run(command: &str, args: &[&str]) -> Output {
    Command::new(contract_run_bin())
        .arg("run")
        .arg("--manifest")
        .arg(fixture("storage.yaml"))
        .arg(command)
        .arg("--")
        .args(args)
        .output()
        .expect("failed to run contract-run")
}

fn response_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{stdout}"))
}

// ---- list / describe ----

#[test]
fn test_list_prints_all_commands() {
    let output = Command::new(contract_run_bin())
        .args(["list", "--manifest"])
        .arg(fixture("storage.yaml"))
        .output()
        .expect("failed to run contract-run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let names: Vec<&str> = stdout
        .lines()
        .map(|line| line.split('\t').next().unwrap_or_default())
        .collect();
    assert_eq!(
        names,
        ["account-show", "account-list", "account-delete", "blob-upload"]
    );
}

#[test]
fn test_describe_yaml() {
    let output = Command::new(contract_run_bin())
        .args(["describe", "--format", "yaml", "--manifest"])
        .arg(fixture("storage.yaml"))
        .arg("account-show")
        .output()
        .expect("failed to run contract-run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--resource-group"));
    assert!(stdout.contains("requires_resource_group: true"));
}

#[test]
fn test_unknown_command_is_usage_error() {
    let output = run("account-purge", &[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown command: account-purge"));
}

// ---- run ----

#[test]
fn test_run_help_prints_command_options() {
    let output = run("account-show", &["--help"]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--account"));
    assert!(stdout.contains("--resource-group"));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("error:"));
}

#[test]
fn test_run_success_echoes_values() {
    let output = run(
        "account-show",
        &[
            "--account",
            "acct",
            "--subscription",
            "sub",
            "--resource-group",
            "rg",
        ],
    );

    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let response = response_json(&output);
    assert_eq!(response["status"], 200);
    assert_eq!(response["results"]["account"], "acct");
    assert_eq!(response["results"]["resource-group"], "rg");
}

#[test]
fn test_run_reports_missing_required_in_order() {
    let output = run("account-show", &[]);

    assert_eq!(output.status.code(), Some(1));
    let response = response_json(&output);
    assert_eq!(response["status"], 400);
    assert_eq!(
        response["message"],
        "Missing Required options: --account, --subscription"
    );
    assert!(response.get("results").is_none());
}

#[test]
fn test_run_reports_missing_resource_group() {
    let output = run("account-show", &["--account", "acct", "--subscription", "sub"]);

    let response = response_json(&output);
    assert_eq!(response["status"], 400);
    assert_eq!(
        response["message"],
        "Missing Required options: --resource-group"
    );
}

#[test]
fn test_optional_resource_group_may_be_omitted() {
    let output = run("account-list", &["--subscription", "sub"]);
    assert!(output.status.success());
    assert_eq!(response_json(&output)["status"], 200);
}

#[test]
fn test_run_fault_maps_to_not_found() {
    let output = run("account-delete", &["--account", "acct", "--resource-group", "rg"]);

    assert_eq!(output.status.code(), Some(1));
    let response = response_json(&output);
    assert_eq!(response["status"], 404);
    let message = response["message"].as_str().unwrap();
    assert!(message.starts_with("Storage account 'acct' was not found. "));
    assert!(message.ends_with(GUIDANCE_SUFFIX));
    assert_eq!(
        response["results"]["message"],
        "Storage account 'acct' was not found"
    );
    assert!(
        response["results"]["type"]
            .as_str()
            .unwrap()
            .ends_with("ScriptedFault")
    );
}

#[test]
fn test_run_internal_fault_defaults_to_500() {
    let output = run("blob-upload", &["--container", "c", "--file", "f.txt"]);

    let response = response_json(&output);
    assert_eq!(response["status"], 500);
    assert!(response["message"].as_str().unwrap().ends_with(GUIDANCE_SUFFIX));
}

#[test]
fn test_failed_validation_does_not_run_fault() {
    // blob-upload would fault, but validation rejects it first.
    let output = run("blob-upload", &["--container", "c"]);

    let response = response_json(&output);
    assert_eq!(response["status"], 400);
    assert_eq!(response["message"], "Missing Required options: --file");
}

#[test]
fn test_invalid_manifest_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(
        &path,
        "version: '1'\ncommands:\n  - name: a\n  - name: a\n",
    )
    .unwrap();

    let output = Command::new(contract_run_bin())
        .args(["list", "--manifest"])
        .arg(&path)
        .output()
        .expect("failed to run contract-run");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate command: a"));
}
