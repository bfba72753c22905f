//! Renderer adapter.
//!
//! The templating engine is a black box to the rest of the crate: the
//! verifier only sees the [`Renderer`] trait, which turns an identifier into
//! raw manifest text or a failure. [`HelmRenderer`] is the production
//! implementation backed by `helm template`; tests substitute a stub.
//!
//! # Isolation
//!
//! Renders may run concurrently, so each invocation gets its own temporary
//! working directory and a private `HELM_CACHE_HOME` inside it. The chart
//! path is resolved to an absolute path up front so the changed working
//! directory does not matter.
//!
//! # Failure policy
//!
//! A non-zero exit or an expired timeout is returned as an error and the
//! partial output is discarded. Nothing is retried: rendering valid input is
//! deterministic, so a retry would only hide a real defect.

pub mod command_builder;

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::DEFAULT_RENDER_TIMEOUT;
use crate::core::ChartnameError;
use crate::naming::Identifier;
use command_builder::HelmCommand;

/// Turns a release identifier into rendered manifest text.
pub trait Renderer {
    /// Render the template set with `identifier` as the release name.
    ///
    /// Must return the complete output on success, and an error (never
    /// partial output) on failure.
    fn render(&self, identifier: &Identifier) -> impl Future<Output = Result<String>> + Send;
}

impl<R: Renderer + Sync> Renderer for &R {
    fn render(&self, identifier: &Identifier) -> impl Future<Output = Result<String>> + Send {
        (**self).render(identifier)
    }
}

/// Everything the renderer adapter needs besides the identifier.
///
/// The override parameters are passed explicitly so alternate template-set
/// versions can be exercised by substituting a different value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Renderer executable
    pub helm_binary: String,
    /// Location of the template set
    pub chart_path: PathBuf,
    /// `--set` overrides, applied in key order
    pub overrides: BTreeMap<String, String>,
    /// Per-render timeout (None = wait forever)
    pub timeout: Option<Duration>,
}

impl RenderConfig {
    /// Config for `chart_path` with the default binary, timeout and the
    /// standard overrides.
    #[must_use]
    pub fn new(chart_path: impl Into<PathBuf>) -> Self {
        Self {
            helm_binary: "helm".to_string(),
            chart_path: chart_path.into(),
            overrides: default_overrides(),
            timeout: Some(DEFAULT_RENDER_TIMEOUT),
        }
    }
}

/// The fixed overrides that let the chart render without unrelated
/// validation failures: worker count, region, credential reference, worker
/// image, worker machine type and control-plane version.
#[must_use]
pub fn default_overrides() -> BTreeMap<String, String> {
    [
        ("workersNumber", "2"),
        ("region", "fsn1"),
        ("tokenRef.name", "test-token"),
        ("worker.image", "ubuntu-24.04"),
        ("worker.type", "cpx22"),
        ("k0s.version", "v1.34.2+k0s.0"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// [`Renderer`] backed by `helm template`.
#[derive(Debug, Clone)]
pub struct HelmRenderer {
    config: RenderConfig,
}

impl HelmRenderer {
    /// Create a renderer after checking that the binary and chart exist.
    ///
    /// The chart path is made absolute here.
    ///
    /// # Errors
    ///
    /// - [`ChartnameError::HelmNotFound`] if the binary is not on PATH
    /// - [`ChartnameError::ChartNotFound`] if the chart path does not exist
    pub fn new(mut config: RenderConfig) -> Result<Self> {
        which::which(&config.helm_binary).map_err(|_| ChartnameError::HelmNotFound {
            binary: config.helm_binary.clone(),
        })?;

        config.chart_path = resolve_chart_path(&config.chart_path)?;
        tracing::debug!(
            target: "helm",
            "Using {} with chart {}",
            config.helm_binary,
            config.chart_path.display()
        );

        Ok(Self {
            config,
        })
    }

    /// The resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn command(&self, identifier: &Identifier, workdir: &Path) -> HelmCommand {
        HelmCommand::template(identifier.as_str(), &self.config.chart_path)
            .binary(&self.config.helm_binary)
            .set_all(&self.config.overrides)
            .current_dir(workdir)
            .env("HELM_CACHE_HOME", workdir.join("cache").display().to_string())
            .with_timeout(self.config.timeout)
    }
}

impl Renderer for HelmRenderer {
    async fn render(&self, identifier: &Identifier) -> Result<String> {
        let workdir = tempfile::Builder::new()
            .prefix("chartname-render-")
            .tempdir()
            .context("Failed to create render working directory")?;

        let output = self.command(identifier, workdir.path()).execute().await?;
        Ok(output.stdout)
    }
}

fn resolve_chart_path(path: &Path) -> Result<PathBuf> {
    let display = path.display().to_string();
    let expanded = shellexpand::full(&display)
        .map_err(|e| ChartnameError::ConfigError {
            message: format!("Cannot expand chart path '{display}': {e}"),
        })?
        .into_owned();

    std::fs::canonicalize(&expanded).map_err(|_| {
        ChartnameError::ChartNotFound {
            path: expanded,
        }
        .into()
    })
}
