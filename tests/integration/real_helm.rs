//! Property runs against `helm template` and the fixture chart.
//!
//! Every test returns early when `helm` is not installed.

use chartname_cli::helm::{HelmRenderer, RenderConfig, Renderer};
use chartname_cli::manifest;
use chartname_cli::naming::{Identifier, ResourceKind};
use chartname_cli::utils::progress::ProgressBar;
use chartname_cli::verify::{CaseOutcome, Property, RunSettings, Verifier};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use crate::common::{HELM_RELEASE_NAME_LIMIT, chartname, fixture_chart, helm_available};

fn renderer() -> HelmRenderer {
    HelmRenderer::new(RenderConfig::new(fixture_chart())).unwrap()
}

#[tokio::test]
async fn renders_my_release() {
    if !helm_available() {
        return;
    }
    let id = Identifier::parse("my-release").unwrap();
    let raw = renderer().render(&id).await.unwrap();
    let facts = manifest::extract(&raw);

    assert_eq!(facts.name_for(ResourceKind::Cluster), Some("my-release"));
    assert_eq!(facts.name_for(ResourceKind::MachineDeployment), Some("my-release-md"));
    assert_eq!(Verifier::new(renderer()).check_consistency(&id).await, CaseOutcome::Passed);
}

#[tokio::test]
async fn missing_override_is_a_render_failure() {
    if !helm_available() {
        return;
    }
    let mut config = RenderConfig::new(fixture_chart());
    config.overrides.remove("k0s.version");
    let verifier = Verifier::new(HelmRenderer::new(config).unwrap());

    let outcome = verifier.check_consistency(&Identifier::parse("demo").unwrap()).await;
    assert!(outcome.is_failure());
}

#[tokio::test]
async fn both_properties_hold_for_fixture_chart() {
    if !helm_available() {
        return;
    }
    let settings = RunSettings {
        cases: 12,
        seed: Some(2024),
        max_parallel: 4,
        max_shrink_iters: 16,
        max_identifier_length: HELM_RELEASE_NAME_LIMIT,
    };
    let verifier = Verifier::new(renderer());

    for property in Property::ALL {
        let report = verifier.run(property, &settings, &ProgressBar::hidden()).await.unwrap();
        assert!(report.is_success(), "{}", report.render_text());
    }
}

#[test]
fn inspect_command_against_fixture() {
    if !helm_available() {
        return;
    }
    chartname()
        .args(["inspect", "my-release", "--chart"])
        .arg(fixture_chart())
        .assert()
        .success()
        .stdout(predicate::str::contains("my-release-worker-mt"));
}

#[test]
fn check_command_json_report() {
    if !helm_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("chartname.toml");
    fs::write(&config, format!("max_identifier_length = {HELM_RELEASE_NAME_LIMIT}\n")).unwrap();

    let output = chartname()
        .args(["check", "--property", "consistency", "--cases", "5", "--seed", "3", "--format", "json"])
        .arg("--config")
        .arg(&config)
        .arg("--chart")
        .arg(fixture_chart())
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(json[0]["property"], "consistency");
    assert_eq!(json[0]["seed"], 3);
    assert_eq!(json[0]["passed"], 5);
}
