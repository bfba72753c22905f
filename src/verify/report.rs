//! Violations, case failures and property reports.

use colored::Colorize;
use serde::Serialize;
use std::fmt;

use super::Property;
use crate::naming::ResourceKind;

/// One way a rendered name disagreed with the naming rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Violation {
    /// The render did not contain the kind at all
    MissingResource {
        /// Identifier that was rendered
        identifier: String,
        /// Kind that was expected
        kind: ResourceKind,
    },
    /// The rendered name differs from the derived one
    NameMismatch {
        /// Identifier that was rendered
        identifier: String,
        /// Kind whose name differs
        kind: ResourceKind,
        /// Name derived by the rule
        expected: String,
        /// Name found in the output
        actual: String,
    },
    /// Two identifiers with different base names produced the same name
    NameCollision {
        /// Kind whose names collided
        kind: ResourceKind,
        /// First identifier
        first: String,
        /// Second identifier
        second: String,
        /// The shared name
        name: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingResource {
                identifier,
                kind,
            } => write!(f, "{kind} resource should be generated for '{identifier}'"),
            Self::NameMismatch {
                identifier,
                kind,
                expected,
                actual,
            } => write!(
                f,
                "{kind} name for '{identifier}' should be '{expected}', got '{actual}'"
            ),
            Self::NameCollision {
                kind,
                first,
                second,
                name,
            } => write!(
                f,
                "'{first}' and '{second}' both produce {kind} name '{name}'"
            ),
        }
    }
}

/// Why a case failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "kebab-case")]
pub enum FailureCause {
    /// The renderer failed or timed out; message includes the cause chain
    Render(String),
    /// Rendering worked but the names broke the property
    Violations(Vec<Violation>),
}

/// A failing case with its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseFailure {
    /// Identifier(s) the case was generated from
    pub inputs: Vec<String>,
    /// What went wrong
    pub cause: FailureCause,
}

impl fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs: Vec<String> = self.inputs.iter().map(|i| format!("'{i}'")).collect();
        write!(f, "input {}", inputs.join(", "))?;
        match &self.cause {
            FailureCause::Render(message) => write!(f, "\n    render failed: {message}"),
            FailureCause::Violations(violations) => {
                for violation in violations {
                    write!(f, "\n    {violation}")?;
                }
                Ok(())
            }
        }
    }
}

/// Outcome of running one property over many generated cases.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyReport {
    /// Which property ran
    pub property: Property,
    /// Seed that reproduces the generated sequence
    pub seed: u64,
    /// Cases generated
    pub cases: usize,
    /// Cases where the property held
    pub passed: usize,
    /// Cases the property makes no claim about
    pub discarded: usize,
    /// Every failing case, in generation order
    pub failures: Vec<CaseFailure>,
    /// The first failure after shrinking
    pub minimal: Option<CaseFailure>,
}

impl PropertyReport {
    /// Whether every non-discarded case passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Multi-line human-readable summary.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let status = if self.is_success() {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };
        out.push_str(&format!(
            "{status} {}: {} passed, {} failed, {} discarded ({} cases, seed {})",
            self.property.to_string().bold(),
            self.passed,
            self.failures.len(),
            self.discarded,
            self.cases,
            self.seed
        ));

        if let Some(minimal) = &self.minimal {
            out.push_str(&format!("\n  minimal failing {minimal}"));
        }
        for failure in self.failures.iter().take(5) {
            out.push_str(&format!("\n  {failure}"));
        }
        if self.failures.len() > 5 {
            out.push_str(&format!("\n  ... and {} more", self.failures.len() - 5));
        }
        out
    }
}
