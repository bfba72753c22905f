//! Fluent builder for renderer subprocesses.
//!
//! Wraps `tokio::process::Command` with the pieces every render needs: an
//! argument list, a private working directory and environment, a timeout
//! that kills the child on expiry, and classification of failures into
//! [`ChartnameError`] variants.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::DEFAULT_RENDER_TIMEOUT;
use crate::core::ChartnameError;

/// Builder for a single renderer invocation.
///
/// # Examples
///
/// ```rust,no_run
/// use chartname_cli::helm::command_builder::HelmCommand;
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// let output = HelmCommand::template("my-release", "/charts/hcloud-cp")
///     .set("region", "fsn1")
///     .with_timeout(Some(Duration::from_secs(30)))
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HelmCommand {
    /// Executable to run (name looked up on PATH, or a path)
    binary: String,

    /// Arguments after the binary
    args: Vec<String>,

    /// Working directory for the child (defaults to the current directory)
    current_dir: Option<PathBuf>,

    /// Extra environment for the child
    env_vars: Vec<(String, String)>,

    /// Maximum duration to wait for completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Release name, kept for error messages and log context
    release: String,
}

impl Default for HelmCommand {
    fn default() -> Self {
        Self {
            binary: "helm".to_string(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            timeout_duration: Some(DEFAULT_RENDER_TIMEOUT),
            release: String::new(),
        }
    }
}

/// Captured output of a successful invocation.
#[derive(Debug, Clone)]
pub struct HelmCommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error (helm prints warnings here even on success)
    pub stderr: String,
}

impl HelmCommand {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `helm template <release> <chart>`
    #[must_use]
    pub fn template(release: &str, chart: impl AsRef<Path>) -> Self {
        let mut cmd = Self::new().args(["template", release]).arg(chart.as_ref().display().to_string());
        cmd.release = release.to_string();
        cmd
    }

    /// Use a different executable than `helm` from PATH.
    #[must_use]
    pub fn binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Adds a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds a `--set key=value` override.
    #[must_use]
    pub fn set(self, key: &str, value: &str) -> Self {
        self.args(["--set".to_string(), format!("{key}={value}")])
    }

    /// Adds every override in order.
    #[must_use]
    pub fn set_all<'a, I>(self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        overrides.into_iter().fold(self, |cmd, (key, value)| cmd.set(key, value))
    }

    /// Sets the working directory of the child.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds an environment variable for the child.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Set a custom timeout for the command (None for no timeout)
    #[must_use]
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// The full argument list, for logging and tests.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Execute the command and return its output.
    ///
    /// # Errors
    ///
    /// - [`ChartnameError::HelmNotFound`] if the binary cannot be spawned
    /// - [`ChartnameError::RenderTimeout`] if the timeout expires; the child
    ///   is killed
    /// - [`ChartnameError::RenderFailed`] on a non-zero exit; stdout is
    ///   discarded
    pub async fn execute(self) -> Result<HelmCommandOutput> {
        let start = std::time::Instant::now();
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.env_vars {
            tracing::trace!(target: "helm", "({}) Setting env var: {}={}", self.release, key, value);
            cmd.env(key, value);
        }

        tracing::debug!(
            target: "helm",
            "({}) Executing command: {} {}",
            self.release,
            self.binary,
            self.args.join(" ")
        );

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ChartnameError::HelmNotFound {
                    binary: self.binary,
                }
                .into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to spawn {}", self.binary));
            }
        };

        let output_future = child.wait_with_output();

        let output = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result.with_context(|| format!("Failed to wait for {}", self.binary))?
            } else {
                tracing::warn!(
                    target: "helm",
                    "({}) Command timed out after {} seconds: {} {}",
                    self.release,
                    duration.as_secs(),
                    self.binary,
                    self.args.join(" ")
                );
                return Err(ChartnameError::RenderTimeout {
                    release: self.release,
                    seconds: duration.as_secs(),
                }
                .into());
            }
        } else {
            output_future.await.with_context(|| format!("Failed to wait for {}", self.binary))?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "helm",
                "({}) Command failed with exit code: {:?}",
                self.release,
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "helm", "({}) Error: {}", self.release, stderr.trim_end());
            }
            return Err(ChartnameError::RenderFailed {
                release: self.release,
                exit_code: output.status.code(),
                stderr: if stderr.is_empty() {
                    stdout
                } else {
                    stderr
                },
            }
            .into());
        }

        if !stderr.is_empty() {
            tracing::debug!(target: "helm", "({}) {}", self.release, stderr.trim_end());
        }
        tracing::debug!(
            target: "helm",
            "({}) Command completed in {:.2?} ({} bytes)",
            self.release,
            start.elapsed(),
            stdout.len()
        );

        Ok(HelmCommandOutput {
            stdout,
            stderr,
        })
    }
}
