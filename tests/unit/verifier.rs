//! Verifier runs against stub renderers.

use chartname_cli::naming::{self, Identifier, ResourceKind};
use chartname_cli::test_utils::{StubRenderer, init_test_logging};
use chartname_cli::utils::progress::ProgressBar;
use chartname_cli::verify::{
    CaseOutcome, FailureCause, Property, PropertyReport, RunSettings, Verifier, Violation,
};

fn settings(cases: u32, seed: u64) -> RunSettings {
    RunSettings {
        cases,
        seed: Some(seed),
        max_parallel: 4,
        max_shrink_iters: 64,
        max_identifier_length: 63,
    }
}

async fn run(stub: &StubRenderer, property: Property, cases: u32) -> PropertyReport {
    Verifier::new(stub).run(property, &settings(cases, 7), &ProgressBar::hidden()).await.unwrap()
}

fn id(value: &str) -> Identifier {
    Identifier::parse(value).unwrap()
}

#[tokio::test]
async fn faithful_renderer_passes_both_properties() {
    init_test_logging(None);
    let stub = StubRenderer::faithful();

    let consistency = run(&stub, Property::Consistency, 40).await;
    assert!(consistency.is_success(), "{}", consistency.render_text());
    assert_eq!(consistency.passed, 40);
    assert_eq!(consistency.seed, 7);
    assert!(consistency.minimal.is_none());

    let distinctness = run(&stub, Property::Distinctness, 40).await;
    assert!(distinctness.is_success());
    assert_eq!(distinctness.passed + distinctness.discarded, 40);
}

#[tokio::test]
async fn missing_kind_is_reported_for_every_case() {
    let stub = StubRenderer::omitting(ResourceKind::MachineDeployment);
    let report = run(&stub, Property::Consistency, 10).await;

    assert_eq!(report.failures.len(), 10);
    let failure = &report.failures[0];
    assert_eq!(
        failure.cause,
        FailureCause::Violations(vec![Violation::MissingResource {
            identifier: failure.inputs[0].clone(),
            kind: ResourceKind::MachineDeployment,
        }])
    );
}

#[tokio::test]
async fn renamed_kind_literal_is_caught() {
    let stub = StubRenderer::faithful().with_kind_literal(ResourceKind::ControlPlane, "ControlPlane");
    let outcome = Verifier::new(&stub).check_consistency(&id("demo")).await;

    assert_eq!(
        outcome,
        CaseOutcome::Failed(FailureCause::Violations(vec![Violation::MissingResource {
            identifier: "demo".to_string(),
            kind: ResourceKind::ControlPlane,
        }]))
    );
}

#[tokio::test]
async fn wrong_suffix_reports_expected_and_actual() {
    let stub = StubRenderer::with_namer(|id, kind| {
        Some(match kind {
            ResourceKind::WorkerConfigTemplate => format!("{}-worker-config", naming::base_name(id)),
            _ => naming::resource_name(id, kind),
        })
    });
    let outcome = Verifier::new(&stub).check_consistency(&id("my-release")).await;

    let CaseOutcome::Failed(FailureCause::Violations(violations)) = outcome else {
        panic!("expected violations, got {outcome:?}");
    };
    assert_eq!(
        violations,
        [Violation::NameMismatch {
            identifier: "my-release".to_string(),
            kind: ResourceKind::WorkerConfigTemplate,
            expected: "my-release-machine-config".to_string(),
            actual: "my-release-worker-config".to_string(),
        }]
    );
}

#[tokio::test]
async fn renderer_ignoring_identifier_breaks_distinctness() {
    let stub = StubRenderer::with_namer(|_, kind| Some(format!("static{}", kind.suffix())));
    let verifier = Verifier::new(&stub);

    let outcome = verifier.check_distinctness(&id("alpha"), &id("beta")).await;
    let CaseOutcome::Failed(FailureCause::Violations(violations)) = outcome else {
        panic!("expected collisions");
    };
    assert_eq!(violations.len(), 5);
    assert!(violations.iter().all(|v| matches!(v, Violation::NameCollision { .. })));

    let report = run(&stub, Property::Distinctness, 30).await;
    assert!(!report.is_success());
    assert!(report.minimal.is_some());
}

#[tokio::test]
async fn equal_base_names_are_discarded_without_rendering() {
    let stub = StubRenderer::failing();
    let outcome = Verifier::new(&stub).check_distinctness(&id("same"), &id("same")).await;
    assert_eq!(outcome, CaseOutcome::Discarded);
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn render_failure_fails_the_case() {
    let stub = StubRenderer::failing();
    let outcome = Verifier::new(&stub).check_consistency(&id("demo")).await;

    let CaseOutcome::Failed(FailureCause::Render(message)) = outcome else {
        panic!("expected a render failure");
    };
    assert!(message.contains("stub render failure") || message.contains("demo"));

    let report = run(&stub, Property::Consistency, 5).await;
    assert_eq!(report.failures.len(), 5);
    assert_eq!(report.passed, 0);
    assert_eq!(report.discarded, 0);
}

#[tokio::test]
async fn shrinking_finds_small_counterexample() {
    // Fails only for identifiers containing a digit
    let stub = StubRenderer::faithful().failing_when(|id| id.chars().any(|c| c.is_ascii_digit()));
    let report = run(&stub, Property::Consistency, 100).await;

    assert!(!report.is_success());
    let minimal = report.minimal.expect("a failing run reports a minimal case");
    assert!(minimal.inputs[0].chars().any(|c| c.is_ascii_digit()));
    assert!(matches!(minimal.cause, FailureCause::Render(_)));
    assert!(report.failures.iter().all(|f| f.inputs[0].chars().any(|c| c.is_ascii_digit())));
}

#[tokio::test]
async fn same_seed_same_report() {
    let stub = StubRenderer::faithful().failing_when(|id| id.len() > 40);
    let first = run(&stub, Property::Consistency, 30).await;
    let second = run(&stub, Property::Consistency, 30).await;

    assert_eq!(first.failures, second.failures);
    assert_eq!(first.passed, second.passed);
}

#[tokio::test]
async fn reduced_length_ceiling_is_respected() {
    let stub = StubRenderer::faithful().failing_when(|id| id.len() > 53);
    let mut settings = settings(60, 11);
    settings.max_identifier_length = 53;

    let report = Verifier::new(&stub)
        .run(Property::Consistency, &settings, &ProgressBar::hidden())
        .await
        .unwrap();
    assert!(report.is_success(), "{}", report.render_text());
}

#[tokio::test]
async fn progress_advances_per_case() {
    let stub = StubRenderer::faithful();
    let progress = ProgressBar::hidden();
    Verifier::new(&stub)
        .run(Property::Consistency, &settings(12, 3), &progress)
        .await
        .unwrap();
    assert_eq!(progress.position(), 12);
    assert_eq!(stub.calls(), 12);
}
