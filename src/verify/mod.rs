//! Property verifier.
//!
//! Ties the pieces together: generate identifiers, render each through a
//! [`Renderer`], extract the fact table and compare it against the naming
//! rule. Two properties are checked:
//!
//! - [`Property::Consistency`]: every kind is present and named exactly
//!   `derive(identifier, kind)`.
//! - [`Property::Distinctness`]: two identifiers with different base names
//!   never share a name for any kind. Pairs that collapse to the same base
//!   name are discarded.
//!
//! Every kind is checked on every case and all violations are collected.
//! A render failure fails the case; it is never retried or skipped.
//!
//! # Runs
//!
//! [`Verifier::run`] draws cases from the generator strategies with a seeded
//! proptest runner, evaluates them with bounded concurrency (results stay in
//! generation order), then shrinks the first failing case to a minimal
//! counterexample. The seed is part of the report so a run can be repeated.

pub mod report;

pub use report::{CaseFailure, FailureCause, PropertyReport, Violation};

use anyhow::Result;
use futures::stream::{self, StreamExt};
use proptest::prelude::*;
use proptest::strategy::ValueTree;
use proptest::test_runner::{Config, RngAlgorithm, TestRng, TestRunner};
use serde::Serialize;
use std::fmt;

use crate::constants::{DEFAULT_CASES, DEFAULT_MAX_SHRINK_ITERS, MAX_NAME_LENGTH, default_parallelism};
use crate::core::ChartnameError;
use crate::generator;
use crate::helm::Renderer;
use crate::manifest::{self, FactTable};
use crate::naming::{self, Identifier, ResourceKind};
use crate::utils::progress::ProgressBar;

/// A property of the naming rule checked against rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Property {
    /// Rendered names equal the derived names
    Consistency,
    /// Different base names never produce the same rendered name
    Distinctness,
}

impl Property {
    /// Both properties, in the order they run.
    pub const ALL: [Self; 2] = [Self::Consistency, Self::Distinctness];
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Consistency => f.write_str("consistency"),
            Self::Distinctness => f.write_str("distinctness"),
        }
    }
}

/// Result of evaluating one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    /// The property held
    Passed,
    /// The property makes no claim about this input
    Discarded,
    /// The property did not hold, or rendering failed
    Failed(FailureCause),
}

impl CaseOutcome {
    /// Whether this outcome is a failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Knobs for a randomized run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Number of cases to generate
    pub cases: u32,
    /// Seed for the case sequence (None = pick one)
    pub seed: Option<u64>,
    /// Maximum renders in flight
    pub max_parallel: usize,
    /// Upper bound on shrink steps for the first failure
    pub max_shrink_iters: u32,
    /// Longest identifier the generator may produce
    pub max_identifier_length: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            cases: DEFAULT_CASES,
            seed: None,
            max_parallel: default_parallelism(),
            max_shrink_iters: DEFAULT_MAX_SHRINK_ITERS,
            max_identifier_length: MAX_NAME_LENGTH,
        }
    }
}

/// The generated input of one case.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CaseInput {
    Single(Identifier),
    Pair(Identifier, Identifier),
}

impl CaseInput {
    fn labels(&self) -> Vec<String> {
        match self {
            Self::Single(id) => vec![id.to_string()],
            Self::Pair(a, b) => vec![a.to_string(), b.to_string()],
        }
    }

    fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        let (first, second) = match self {
            Self::Single(id) => (id, None),
            Self::Pair(a, b) => (a, Some(b)),
        };
        std::iter::once(first).chain(second)
    }
}

type CaseTree = Box<dyn ValueTree<Value = CaseInput>>;

/// Checks the naming properties against a [`Renderer`].
///
/// # Examples
///
/// ```rust,no_run
/// use chartname_cli::helm::{HelmRenderer, RenderConfig};
/// use chartname_cli::naming::Identifier;
/// use chartname_cli::verify::{CaseOutcome, Verifier};
///
/// # async fn example() -> anyhow::Result<()> {
/// let renderer = HelmRenderer::new(RenderConfig::new("./charts/hcloud-cp"))?;
/// let verifier = Verifier::new(renderer);
/// let outcome = verifier.check_consistency(&Identifier::parse("my-release")?).await;
/// assert_eq!(outcome, CaseOutcome::Passed);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Verifier<R> {
    renderer: R,
}

impl<R: Renderer> Verifier<R> {
    /// Wrap a renderer.
    pub const fn new(renderer: R) -> Self {
        Self {
            renderer,
        }
    }

    /// The wrapped renderer.
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render `identifier` and extract its fact table.
    ///
    /// # Errors
    ///
    /// Returns the renderer's error unchanged.
    pub async fn facts_for(&self, identifier: &Identifier) -> Result<FactTable> {
        let raw = self.renderer.render(identifier).await?;
        Ok(manifest::extract(&raw))
    }

    /// Check the consistency property for one identifier.
    pub async fn check_consistency(&self, identifier: &Identifier) -> CaseOutcome {
        match self.facts_for(identifier).await {
            Ok(facts) => into_outcome(consistency_violations(identifier, &facts)),
            Err(e) => render_failure(&e),
        }
    }

    /// Check the distinctness property for a pair of identifiers.
    ///
    /// Both renders run concurrently. The pair is discarded without
    /// rendering when the base names are equal.
    pub async fn check_distinctness(&self, first: &Identifier, second: &Identifier) -> CaseOutcome {
        if first.base_name() == second.base_name() {
            tracing::trace!("Discarding pair '{}' / '{}': same base name", first, second);
            return CaseOutcome::Discarded;
        }

        match futures::try_join!(self.facts_for(first), self.facts_for(second)) {
            Ok((first_facts, second_facts)) => into_outcome(distinctness_violations(
                first,
                &first_facts,
                second,
                &second_facts,
            )),
            Err(e) => render_failure(&e),
        }
    }

    async fn evaluate(&self, input: &CaseInput) -> CaseOutcome {
        match input {
            CaseInput::Single(id) => self.check_consistency(id).await,
            CaseInput::Pair(a, b) => self.check_distinctness(a, b).await,
        }
    }

    /// Run `property` over `settings.cases` generated cases.
    ///
    /// The progress bar is advanced once per evaluated case.
    ///
    /// # Errors
    ///
    /// Returns [`ChartnameError::GeneratorError`] if cases cannot be
    /// generated. Property failures are reported in the returned
    /// [`PropertyReport`], not as errors.
    pub async fn run(
        &self,
        property: Property,
        settings: &RunSettings,
        progress: &ProgressBar,
    ) -> Result<PropertyReport> {
        let seed = settings.seed.unwrap_or_else(random_seed);
        let mut runner = seeded_runner(seed, settings);
        let strategy = case_strategy(property, settings.max_identifier_length)?;

        let mut trees = Vec::with_capacity(settings.cases as usize);
        for _ in 0..settings.cases {
            let tree = strategy.new_tree(&mut runner).map_err(|reason| ChartnameError::GeneratorError {
                reason: reason.to_string(),
            })?;
            trees.push(tree);
        }
        let inputs: Vec<CaseInput> = trees.iter().map(|tree| tree.current()).collect();

        tracing::info!(
            "Checking {} property over {} cases (seed {}, {} in parallel)",
            property,
            inputs.len(),
            seed,
            settings.max_parallel
        );
        warn_over_length(&inputs);

        let outcomes: Vec<CaseOutcome> = stream::iter(inputs.iter().map(|input| self.evaluate(input)))
            .buffered(settings.max_parallel.max(1))
            .inspect(|_| progress.inc(1))
            .collect()
            .await;

        let mut passed = 0;
        let mut discarded = 0;
        let mut failures = Vec::new();
        let mut first_failure = None;

        for (index, (input, outcome)) in inputs.iter().zip(outcomes).enumerate() {
            match outcome {
                CaseOutcome::Passed => passed += 1,
                CaseOutcome::Discarded => discarded += 1,
                CaseOutcome::Failed(cause) => {
                    tracing::debug!("Case {} failed for {:?}", index, input.labels());
                    first_failure.get_or_insert(index);
                    failures.push(CaseFailure {
                        inputs: input.labels(),
                        cause,
                    });
                }
            }
        }

        let minimal = match first_failure {
            Some(index) => {
                progress.set_message(format!("shrinking {property} counterexample"));
                Some(self.shrink(&mut trees[index], failures[0].clone(), settings.max_shrink_iters).await)
            }
            None => None,
        };

        tracing::info!(
            "{} property: {} passed, {} failed, {} discarded",
            property,
            passed,
            failures.len(),
            discarded
        );

        Ok(PropertyReport {
            property,
            seed,
            cases: inputs.len(),
            passed,
            discarded,
            failures,
            minimal,
        })
    }

    /// Minimize a failing case with the tree's simplify/complicate steps.
    async fn shrink(&self, tree: &mut CaseTree, failure: CaseFailure, max_iters: u32) -> CaseFailure {
        let mut minimal = failure;
        let mut iterations = 0;

        if !tree.simplify() {
            return minimal;
        }
        while iterations < max_iters {
            iterations += 1;
            let candidate = tree.current();
            let still_fails = match self.evaluate(&candidate).await {
                CaseOutcome::Failed(cause) => {
                    minimal = CaseFailure {
                        inputs: candidate.labels(),
                        cause,
                    };
                    true
                }
                CaseOutcome::Passed | CaseOutcome::Discarded => false,
            };

            let advanced = if still_fails {
                tree.simplify()
            } else {
                tree.complicate()
            };
            if !advanced {
                break;
            }
        }

        tracing::debug!("Shrunk to {:?} after {} steps", minimal.inputs, iterations);
        minimal
    }
}

/// Compare a fact table against the derived names for `identifier`.
///
/// Every kind is checked; the result is empty when all names match.
#[must_use]
pub fn consistency_violations(identifier: &Identifier, facts: &FactTable) -> Vec<Violation> {
    ResourceKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let expected = identifier.resource_name(kind);
            match facts.name_for(kind) {
                None => Some(Violation::MissingResource {
                    identifier: identifier.to_string(),
                    kind,
                }),
                Some(actual) if actual != expected => Some(Violation::NameMismatch {
                    identifier: identifier.to_string(),
                    kind,
                    expected,
                    actual: actual.to_string(),
                }),
                Some(_) => None,
            }
        })
        .collect()
}

/// Compare the fact tables of two identifiers with different base names.
///
/// A kind missing from either table is reported as missing; a kind with the
/// same name in both is a collision.
#[must_use]
pub fn distinctness_violations(
    first: &Identifier,
    first_facts: &FactTable,
    second: &Identifier,
    second_facts: &FactTable,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for kind in ResourceKind::ALL {
        match (first_facts.name_for(kind), second_facts.name_for(kind)) {
            (Some(a), Some(b)) if a == b => violations.push(Violation::NameCollision {
                kind,
                first: first.to_string(),
                second: second.to_string(),
                name: a.to_string(),
            }),
            (Some(_), Some(_)) => {}
            (first_name, second_name) => {
                if first_name.is_none() {
                    violations.push(Violation::MissingResource {
                        identifier: first.to_string(),
                        kind,
                    });
                }
                if second_name.is_none() {
                    violations.push(Violation::MissingResource {
                        identifier: second.to_string(),
                        kind,
                    });
                }
            }
        }
    }
    violations
}

fn into_outcome(violations: Vec<Violation>) -> CaseOutcome {
    if violations.is_empty() {
        CaseOutcome::Passed
    } else {
        CaseOutcome::Failed(FailureCause::Violations(violations))
    }
}

fn render_failure(error: &anyhow::Error) -> CaseOutcome {
    tracing::debug!(target: "helm", "Render failed: {:#}", error);
    CaseOutcome::Failed(FailureCause::Render(format!("{error:#}")))
}

fn case_strategy(property: Property, max_len: usize) -> Result<BoxedStrategy<CaseInput>, ChartnameError> {
    Ok(match property {
        Property::Consistency => generator::identifiers(max_len)?.prop_map(CaseInput::Single).boxed(),
        Property::Distinctness => {
            generator::identifier_pairs(max_len)?.prop_map(|(a, b)| CaseInput::Pair(a, b)).boxed()
        }
    })
}

/// A runner whose RNG is fully determined by `seed`.
fn seeded_runner(seed: u64, settings: &RunSettings) -> TestRunner {
    let mut bytes = [0u8; 32];
    for chunk in bytes.chunks_exact_mut(8) {
        chunk.copy_from_slice(&seed.to_le_bytes());
    }
    let config = Config {
        cases: settings.cases,
        max_shrink_iters: settings.max_shrink_iters,
        failure_persistence: None,
        ..Config::default()
    };
    TestRunner::new_with_rng(config, TestRng::from_seed(RngAlgorithm::ChaCha, &bytes))
}

fn random_seed() -> u64 {
    TestRunner::default().rng().next_u64()
}

fn warn_over_length(inputs: &[CaseInput]) {
    let over_length = inputs
        .iter()
        .flat_map(CaseInput::identifiers)
        .filter(|id| {
            ResourceKind::ALL.into_iter().any(|kind| naming::exceeds_name_limit(&id.resource_name(kind)))
        })
        .count();
    if over_length > 0 {
        tracing::warn!(
            "{} generated identifiers derive names longer than {} characters; names are not re-truncated",
            over_length,
            MAX_NAME_LENGTH
        );
    }
}
