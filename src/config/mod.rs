//! Harness configuration.
//!
//! Settings come from a TOML file, `./chartname.toml` by default, and can be
//! overridden by command-line flags. A different file can be chosen with
//! `--config <path>` or the `CHARTNAME_CONFIG` environment variable.
//!
//! ```toml
//! chart = "./charts/hcloud-cp"
//! helm = "helm"
//! cases = 200
//! timeout_secs = 60          # 0 disables the timeout
//! max_parallel = 8
//! max_identifier_length = 53 # helm 3 rejects longer release names
//! seed = 1234
//!
//! [set]
//! workersNumber = "2"
//! region = "fsn1"
//! "tokenRef.name" = "test-token"
//! "worker.image" = "ubuntu-24.04"
//! "worker.type" = "cpx22"
//! "k0s.version" = "v1.34.2+k0s.0"
//! ```
//!
//! A missing default file means built-in defaults. A file named explicitly
//! must exist. A relative `chart` path is resolved against the directory of
//! the file it was read from.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::constants::{
    CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_CASES, DEFAULT_MAX_SHRINK_ITERS,
    DEFAULT_RENDER_TIMEOUT, MAX_NAME_LENGTH, default_parallelism,
};
use crate::core::ChartnameError;
use crate::helm::{RenderConfig, default_overrides};
use crate::verify::RunSettings;

/// Contents of `chartname.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Location of the chart to render
    pub chart: PathBuf,

    /// Renderer executable
    pub helm: String,

    /// Generated cases per property
    pub cases: u32,

    /// Per-render timeout in seconds, 0 for none
    pub timeout_secs: u64,

    /// Maximum concurrent renders
    pub max_parallel: usize,

    /// Longest identifier to generate (clamped to 1..=63)
    pub max_identifier_length: usize,

    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,

    /// `--set` overrides passed to every render
    pub set: BTreeMap<String, String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            chart: PathBuf::from("."),
            helm: "helm".to_string(),
            cases: DEFAULT_CASES,
            timeout_secs: DEFAULT_RENDER_TIMEOUT.as_secs(),
            max_parallel: default_parallelism(),
            max_identifier_length: MAX_NAME_LENGTH,
            seed: None,
            set: default_overrides(),
        }
    }
}

impl HarnessConfig {
    /// Load from an explicit path, the `CHARTNAME_CONFIG` variable, or
    /// `./chartname.toml`, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing, or if the
    /// chosen file cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let explicit = path.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        match explicit {
            Some(path) => {
                let path = expand_path(&path)?;
                if !path.exists() {
                    return Err(ChartnameError::ConfigError {
                        message: format!("Config file {} does not exist", path.display()),
                    }
                    .into());
                }
                Self::load_from(&path).await
            }
            None => {
                let path = PathBuf::from(CONFIG_FILE_NAME);
                if path.exists() {
                    Self::load_from(&path).await
                } else {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// contains unknown keys.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(ChartnameError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.chart = expand_path(&config.chart)?;
        if config.chart.is_relative() {
            if let Some(parent) = path.parent() {
                config.chart = parent.join(&config.chart);
            }
        }

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Per-render timeout, `None` when disabled.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }

    /// Renderer settings derived from this config.
    #[must_use]
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            helm_binary: self.helm.clone(),
            chart_path: self.chart.clone(),
            overrides: self.set.clone(),
            timeout: self.timeout(),
        }
    }

    /// Run settings derived from this config.
    #[must_use]
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            cases: self.cases,
            seed: self.seed,
            max_parallel: self.max_parallel.max(1),
            max_shrink_iters: DEFAULT_MAX_SHRINK_ITERS,
            max_identifier_length: self.max_identifier_length.clamp(1, MAX_NAME_LENGTH),
        }
    }
}

/// Expand `~` and environment variables in a path.
fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.display().to_string();
    let expanded = shellexpand::full(&raw).map_err(|e| ChartnameError::ConfigError {
        message: format!("Cannot expand path '{raw}': {e}"),
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}
