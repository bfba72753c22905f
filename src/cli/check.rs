//! `chartname check`: run the naming properties against the real renderer.
//!
//! ```bash
//! chartname check                                  # both properties, config defaults
//! chartname check --property consistency --cases 500
//! chartname check --seed 1234 --format json        # reproduce a reported run
//! ```
//!
//! Exits non-zero when any property fails. Each report carries the seed it
//! ran with, so a failing run can be repeated exactly.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::{CliConfig, OutputFormat};
use crate::config::HarnessConfig;
use crate::core::ChartnameError;
use crate::helm::{HelmRenderer, Renderer};
use crate::utils::progress::ProgressBar;
use crate::verify::{Property, PropertyReport, Verifier};

/// Which properties to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PropertySelection {
    /// Rendered names equal derived names
    Consistency,
    /// Different base names give different names
    Distinctness,
    /// Both
    #[default]
    All,
}

impl PropertySelection {
    /// The properties this selection expands to.
    #[must_use]
    pub fn properties(self) -> Vec<Property> {
        match self {
            Self::Consistency => vec![Property::Consistency],
            Self::Distinctness => vec![Property::Distinctness],
            Self::All => Property::ALL.to_vec(),
        }
    }
}

/// Arguments for `chartname check`.
#[derive(Args, Debug, Default)]
pub struct CheckCommand {
    /// Property to check
    #[arg(long, value_enum, default_value = "all")]
    pub property: PropertySelection,

    /// Generated cases per property
    #[arg(long)]
    pub cases: Option<u32>,

    /// Seed for the generated sequence
    #[arg(long)]
    pub seed: Option<u64>,

    /// Chart location
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Per-render timeout in seconds (0 disables it)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum concurrent renders
    #[arg(long)]
    pub max_parallel: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl CheckCommand {
    /// Run the selected properties.
    ///
    /// # Errors
    ///
    /// Fails when the renderer or chart cannot be found, when generation
    /// fails, or with [`ChartnameError::PropertyFailed`] when any property
    /// does not hold.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let mut harness = config.load_harness().await?;
        self.apply_overrides(&mut harness);

        let renderer = HelmRenderer::new(harness.render_config())?;
        let reports = self.run_with(&renderer, &harness, config.progress_enabled()).await?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            OutputFormat::Text => {
                for report in &reports {
                    println!("{}", report.render_text());
                }
            }
        }

        let failed = reports.iter().filter(|r| !r.is_success()).count();
        if failed > 0 {
            return Err(ChartnameError::PropertyFailed {
                failed,
                total: reports.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Command-line values win over the config file.
    fn apply_overrides(&self, harness: &mut HarnessConfig) {
        if let Some(cases) = self.cases {
            harness.cases = cases;
        }
        if self.seed.is_some() {
            harness.seed = self.seed;
        }
        if let Some(chart) = &self.chart {
            harness.chart.clone_from(chart);
        }
        if let Some(timeout) = self.timeout {
            harness.timeout_secs = timeout;
        }
        if let Some(max_parallel) = self.max_parallel {
            harness.max_parallel = max_parallel;
        }
    }

    /// Run every selected property against `renderer`.
    ///
    /// # Errors
    ///
    /// Propagates generator errors from [`Verifier::run`].
    pub async fn run_with<R: Renderer>(
        &self,
        renderer: R,
        harness: &HarnessConfig,
        show_progress: bool,
    ) -> Result<Vec<PropertyReport>> {
        let verifier = Verifier::new(renderer);
        let settings = harness.run_settings();
        let mut reports = Vec::new();

        for property in self.property.properties() {
            let progress = ProgressBar::new(u64::from(settings.cases), show_progress);
            progress.set_prefix(property.to_string());
            let report = verifier.run(property, &settings, &progress).await?;
            progress.finish_and_clear();
            reports.push(report);
        }
        Ok(reports)
    }
}
