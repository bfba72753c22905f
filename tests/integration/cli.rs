//! CLI behavior through the compiled binary.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use crate::common::chartname;

const RENDERED: &str = "---\n# Source: hcloud-cp/templates/cluster.yaml\n\
apiVersion: cluster.x-k8s.io/v1beta1\nkind: Cluster\nmetadata:\n  name: \"demo\"\n\
---\n# Source: hcloud-cp/templates/machine-deployment.yaml\n\
apiVersion: cluster.x-k8s.io/v1beta1\nkind: MachineDeployment\nmetadata:\n  name: demo-md\n";

#[test]
fn derive_prints_every_kind() {
    chartname()
        .args(["derive", "my-release"])
        .assert()
        .success()
        .stdout(predicate::str::contains("my-release-cp"))
        .stdout(predicate::str::contains("my-release-worker-mt"))
        .stdout(predicate::str::contains("my-release-machine-config"))
        .stdout(predicate::str::contains("my-release-md"));
}

#[test]
fn derive_single_kind_prints_only_the_name() {
    chartname()
        .args(["derive", "my-release", "--kind", "worker-config-template"])
        .assert()
        .success()
        .stdout("my-release-machine-config\n");
}

#[test]
fn derive_json_lists_over_length_kinds() {
    let id = "a".repeat(63);
    let output = chartname().args(["derive", &id, "--format", "json"]).assert().success();
    let json: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();

    assert_eq!(json["base_name"], id.as_str());
    assert_eq!(json["names"]["control-plane"], format!("{id}-cp"));
    assert_eq!(json["over_length"].as_array().unwrap().len(), 4);
}

#[test]
fn derive_rejects_invalid_identifier() {
    chartname()
        .args(["derive", "a--b"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("consecutive hyphens"));
}

#[test]
fn derive_unchecked_applies_rule_anyway() {
    chartname()
        .args(["derive", "foo-", "--unchecked", "--kind", "cluster"])
        .assert()
        .success()
        .stdout("foo\n");
}

#[test]
fn validate_reports_each_identifier() {
    chartname()
        .args(["validate", "my-release", "a-b-", "UPPER"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("✓ my-release"))
        .stdout(predicate::str::contains("✗ a-b-"))
        .stdout(predicate::str::contains("✗ UPPER"))
        .stderr(predicate::str::contains("2 of 3 identifiers are invalid"));
}

#[test]
fn validate_all_good_succeeds() {
    chartname().args(["validate", "a", "abc-123", &"z".repeat(63)]).assert().success();
}

#[test]
fn extract_reads_stdin() {
    chartname()
        .arg("extract")
        .write_stdin(RENDERED)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cluster"))
        .stdout(predicate::str::contains("demo-md"));
}

#[test]
fn extract_file_as_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("rendered.yaml");
    fs::write(&path, RENDERED).unwrap();

    let output = chartname()
        .args(["extract", "--format", "json"])
        .arg(&path)
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(json, serde_json::json!({"Cluster": "demo", "MachineDeployment": "demo-md"}));
}

#[test]
fn check_without_helm_reports_missing_renderer() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("chartname.toml"), "helm = \"chartname-missing-helm\"\ncases = 1\n").unwrap();

    chartname()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("chartname-missing-helm"));
}

#[test]
fn check_with_missing_config_file_fails() {
    chartname()
        .args(["--config", "/no/such/chartname.toml", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("chartname.toml"), "cases = \"many\"\n").unwrap();

    chartname()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TOML parsing error"));
}
