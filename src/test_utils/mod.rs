//! Test utilities for chartname
//!
//! Helpers shared by the unit and integration suites: a Once-guarded
//! logging setup and [`StubRenderer`], a [`Renderer`] that writes
//! helm-shaped output without running helm, so the verifier can be tested
//! against both correct and deliberately broken charts.
//!
//! # Example
//!
//! ```rust,no_run
//! use chartname_cli::naming::Identifier;
//! use chartname_cli::test_utils::StubRenderer;
//! use chartname_cli::verify::{CaseOutcome, Verifier};
//!
//! # async fn example() {
//! let verifier = Verifier::new(StubRenderer::faithful());
//! let id = Identifier::parse("demo").unwrap();
//! assert_eq!(verifier.check_consistency(&id).await, CaseOutcome::Passed);
//! # }
//! ```

use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::ChartnameError;
use crate::helm::Renderer;
use crate::naming::{self, Identifier, ResourceKind};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` if given, otherwise `RUST_LOG`; with neither, logging stays
/// off. Only the first call has an effect.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

type Namer = Arc<dyn Fn(&str, ResourceKind) -> Option<String> + Send + Sync>;
type FailWhen = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A [`Renderer`] that produces helm-like output from a naming function.
///
/// The output mimics `helm template`: `# Source:` comments, a leading
/// separator, a nameless secret stub document, quoted names, and nested
/// `kind:`/`name:` lines that a careless extractor would pick up.
#[derive(Clone)]
pub struct StubRenderer {
    namer: Namer,
    kind_literals: BTreeMap<ResourceKind, String>,
    fail_when: Option<FailWhen>,
    calls: Arc<AtomicUsize>,
}

impl fmt::Debug for StubRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubRenderer")
            .field("kind_literals", &self.kind_literals)
            .field("fails", &self.fail_when.is_some())
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

impl StubRenderer {
    /// Names every kind exactly as the rule derives it.
    #[must_use]
    pub fn faithful() -> Self {
        Self::with_namer(|id, kind| Some(naming::resource_name(id, kind)))
    }

    /// Names kinds with `namer`; `None` leaves the kind out of the output.
    #[must_use]
    pub fn with_namer<F>(namer: F) -> Self
    where
        F: Fn(&str, ResourceKind) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            namer: Arc::new(namer),
            kind_literals: ResourceKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.manifest_kind().to_string()))
                .collect(),
            fail_when: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Faithful, except `kind` is never emitted.
    #[must_use]
    pub fn omitting(kind: ResourceKind) -> Self {
        Self::with_namer(move |id, k| (k != kind).then(|| naming::resource_name(id, k)))
    }

    /// Emit `kind` under a different `kind:` literal.
    #[must_use]
    pub fn with_kind_literal(mut self, kind: ResourceKind, literal: &str) -> Self {
        self.kind_literals.insert(kind, literal.to_string());
        self
    }

    /// Fail every render.
    #[must_use]
    pub fn failing() -> Self {
        Self::faithful().failing_when(|_| true)
    }

    /// Fail renders whose identifier matches `predicate`.
    #[must_use]
    pub fn failing_when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.fail_when = Some(Arc::new(predicate));
        self
    }

    /// Number of renders so far, across clones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The text this stub renders for `identifier`.
    #[must_use]
    pub fn output_for(&self, identifier: &str) -> String {
        let mut out = String::from(
            "---\n# Source: hcloud-cp/templates/secret-ref.yaml\n\
             apiVersion: v1\nkind: Secret\nmetadata:\n  labels:\n    name: not-a-resource-name\n",
        );

        for kind in ResourceKind::ALL {
            let Some(name) = (self.namer)(identifier, kind) else {
                continue;
            };
            out.push_str(&format!(
                "---\n# Source: hcloud-cp/templates/{file}.yaml\n\
                 apiVersion: cluster.x-k8s.io/v1beta1\n\
                 kind: {literal}\n\
                 metadata:\n  labels:\n    app.kubernetes.io/instance: {identifier}\n  name: \"{name}\"\n  namespace: default\n\
                 spec:\n  clusterName: {identifier}\n  template:\n    kind: Nested\n    name: {identifier}-nested\n",
                file = kind.to_string().to_lowercase(),
                literal = self.kind_literals[&kind],
            ));
        }
        out
    }
}

impl Renderer for StubRenderer {
    async fn render(&self, identifier: &Identifier) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if self.fail_when.as_ref().is_some_and(|fail| fail(identifier.as_str())) {
            return Err(ChartnameError::RenderFailed {
                release: identifier.to_string(),
                exit_code: Some(1),
                stderr: "Error: stub render failure".to_string(),
            }
            .into());
        }
        Ok(self.output_for(identifier.as_str()))
    }
}
