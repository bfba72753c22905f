//! Command-line interface for chartname.
//!
//! # Available Commands
//!
//! - `derive` - print the base name and per-kind resource names for an identifier
//! - `validate` - check identifiers against the naming grammar
//! - `extract` - pull the kind → name table out of rendered manifests
//! - `inspect` - render one identifier and compare against the derived names
//! - `check` - run the consistency and distinctness properties against the chart
//!
//! ```bash
//! chartname derive my-release
//! helm template my-release ./chart | chartname extract
//! chartname check --property all --cases 200 --seed 42
//! ```
//!
//! Global flags (`--verbose`, `--quiet`, `--config`, `--no-progress`) work
//! with every subcommand. Logs go to stderr; stdout carries only command
//! output so `--format json` can be piped.

pub mod check;
pub mod derive;
pub mod extract;
pub mod inspect;
pub mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::HarnessConfig;

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Settings derived from the global flags, passed to every command.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: Option<String>,
    /// Suppress progress bars
    pub no_progress: bool,
    /// Explicit harness config file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Whether progress bars may be drawn.
    #[must_use]
    pub const fn progress_enabled(&self) -> bool {
        !self.no_progress
    }

    /// Load the harness config named by `--config`, `CHARTNAME_CONFIG`, or
    /// `./chartname.toml`.
    ///
    /// # Errors
    ///
    /// See [`HarnessConfig::load_with_optional`].
    pub async fn load_harness(&self) -> Result<HarnessConfig> {
        HarnessConfig::load_with_optional(self.config_path.clone()).await
    }
}

/// Verify that chart resource names follow the release-name derivation rule.
#[derive(Parser, Debug)]
#[command(
    name = "chartname",
    about = "Derive and verify chart resource names",
    version,
    long_about = "chartname derives Kubernetes resource names from a release identifier and checks, \
                  with generated inputs, that a Helm chart renders exactly those names."
)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors and hide progress bars
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the harness config file (default: ./chartname.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the base name and resource names derived from an identifier
    Derive(derive::DeriveCommand),

    /// Check identifiers against the naming grammar
    Validate(validate::ValidateCommand),

    /// Extract the kind → name table from rendered manifests
    Extract(extract::ExtractCommand),

    /// Render one identifier and compare the output with the derived names
    Inspect(inspect::InspectCommand),

    /// Run the naming properties against the chart with generated identifiers
    Check(check::CheckCommand),
}

impl Cli {
    /// Initialize logging and run the selected command.
    ///
    /// # Errors
    ///
    /// Returns whatever the command returns.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        init_logging(config.log_level.as_deref());
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            no_progress: self.no_progress || self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns whatever the command returns.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Derive(cmd) => cmd.execute(),
            Commands::Validate(cmd) => cmd.execute(),
            Commands::Extract(cmd) => cmd.execute().await,
            Commands::Inspect(cmd) => cmd.execute(&config).await,
            Commands::Check(cmd) => cmd.execute(&config).await,
        }
    }
}

/// Install the stderr subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Safe to call more than once;
/// later calls are ignored.
pub fn init_logging(level: Option<&str>) {
    let filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level.unwrap_or("info"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
