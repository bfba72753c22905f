//! `chartname inspect`: one rendered consistency check, shown side by side.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::{CliConfig, OutputFormat};
use crate::core::ChartnameError;
use crate::helm::HelmRenderer;
use crate::manifest::FactTable;
use crate::naming::{Identifier, ResourceKind};
use crate::verify::{self, Verifier, Violation};

/// Arguments for `chartname inspect`.
#[derive(Args, Debug)]
pub struct InspectCommand {
    /// Release identifier to render
    pub identifier: String,

    /// Chart location (overrides the config file)
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Inspection<'a> {
    identifier: &'a str,
    base_name: &'a str,
    rendered: &'a FactTable,
    violations: &'a [Violation],
}

impl InspectCommand {
    /// Render and compare.
    ///
    /// # Errors
    ///
    /// Fails on an invalid identifier, a render failure, or any mismatch
    /// between rendered and derived names.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let identifier: Identifier = self.identifier.parse()?;

        let mut harness = config.load_harness().await?;
        if let Some(chart) = self.chart {
            harness.chart = chart;
        }

        let verifier = Verifier::new(HelmRenderer::new(harness.render_config())?);
        let facts = verifier.facts_for(&identifier).await?;
        let violations = verify::consistency_violations(&identifier, &facts);

        match self.format {
            OutputFormat::Json => {
                let inspection = Inspection {
                    identifier: identifier.as_str(),
                    base_name: identifier.base_name(),
                    rendered: &facts,
                    violations: &violations,
                };
                println!("{}", serde_json::to_string_pretty(&inspection)?);
            }
            OutputFormat::Text => print!("{}", render_text(&identifier, &facts)),
        }

        if violations.is_empty() {
            Ok(())
        } else {
            for violation in &violations {
                tracing::error!("{}", violation);
            }
            Err(ChartnameError::PropertyFailed {
                failed: 1,
                total: 1,
            }
            .into())
        }
    }
}

fn render_text(identifier: &Identifier, facts: &FactTable) -> String {
    let width = ResourceKind::ALL.iter().map(|k| k.manifest_kind().len()).max().unwrap_or(0);
    let mut out = format!("{} {}\n", "Base name:".bold(), identifier.base_name());

    for kind in ResourceKind::ALL {
        let expected = identifier.resource_name(kind);
        let line = match facts.name_for(kind) {
            Some(actual) if actual == expected => {
                format!("{} {:<width$}  {actual}", "✓".green(), kind.manifest_kind())
            }
            Some(actual) => format!(
                "{} {:<width$}  {actual} (expected {expected})",
                "✗".red(),
                kind.manifest_kind()
            ),
            None => format!("{} {:<width$}  missing (expected {expected})", "✗".red(), kind.manifest_kind()),
        };
        out.push_str(&line);
        out.push('\n');
    }

    let others: Vec<_> =
        facts.iter().filter(|(kind, _)| ResourceKind::from_manifest_kind(kind).is_none()).collect();
    if !others.is_empty() {
        out.push_str(&format!("{}\n", "Other resources:".bold()));
        for (kind, name) in others {
            out.push_str(&format!("  {kind}  {name}\n"));
        }
    }
    out
}
