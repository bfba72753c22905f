//! Progress bar for property runs.
//!
//! Wraps `indicatif` with one consistent style. A bar is hidden (all calls
//! become no-ops) when the user passed `--quiet` or `--no-progress`, or when
//! the `CHARTNAME_NO_PROGRESS` environment variable is set, so piped and CI
//! output stays clean.
//!
//! # Examples
//!
//! ```rust
//! use chartname_cli::utils::progress::ProgressBar;
//!
//! let progress = ProgressBar::new(100, true);
//! progress.set_prefix("consistency");
//! for _ in 0..100 {
//!     progress.inc(1);
//! }
//! progress.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};

use crate::constants::NO_PROGRESS_ENV_VAR;

/// Whether the environment disables progress output.
fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV_VAR).is_some()
}

/// A progress bar with the crate's styling.
///
/// Cloning shares the underlying bar, so clones can be handed to
/// concurrent work.
#[derive(Clone, Debug)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Create a bar for `len` units of work.
    ///
    /// The bar is hidden when `enabled` is false or the environment disables
    /// progress.
    #[must_use]
    pub fn new(len: u64, enabled: bool) -> Self {
        let bar = if !enabled || is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(len);
            bar.set_style(default_style());
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// A bar that never draws.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            inner: IndicatifBar::hidden(),
        }
    }

    /// Set the message shown after the counters.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Set the bold label shown before the bar.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    /// Advance by `delta` units.
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Whether the bar draws anything.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }

    /// Finish and remove the bar from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

fn default_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
        .progress_chars("━╸━")
}
