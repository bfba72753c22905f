//! Global constants used throughout the chartname codebase.
//!
//! Platform limits, renderer timeouts and property-run defaults live here so
//! the naming rule, the generator and the CLI agree on the same numbers.

use std::time::Duration;

/// Maximum length of a DNS-1123 label, which is also the ceiling for release
/// identifiers and for the base name derived from them.
pub const MAX_NAME_LENGTH: usize = 63;

/// Default timeout for a single renderer invocation (120 seconds).
///
/// Rendering a chart is local work, so a render that takes this long is
/// almost certainly hung on something unrelated to the release name.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(120);

/// Number of generated cases per property when nothing else is configured.
pub const DEFAULT_CASES: u32 = 100;

/// Upper bound on shrink steps spent minimizing a failing case.
///
/// Each step costs one or two renders, so this is kept well below
/// proptest's own default.
pub const DEFAULT_MAX_SHRINK_ITERS: u32 = 256;

/// Minimum number of concurrent renders regardless of CPU count.
pub const MIN_PARALLELISM: usize = 2;

/// Default CPU core count when detection fails.
pub const FALLBACK_CORE_COUNT: usize = 4;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "chartname.toml";

/// Environment variable that points at an alternative configuration file.
pub const CONFIG_ENV_VAR: &str = "CHARTNAME_CONFIG";

/// Environment variable that disables progress bars when set.
pub const NO_PROGRESS_ENV_VAR: &str = "CHARTNAME_NO_PROGRESS";

/// Default renderer parallelism: one render per core, never below
/// [`MIN_PARALLELISM`].
#[must_use]
pub fn default_parallelism() -> usize {
    let cores =
        std::thread::available_parallelism().map(std::num::NonZero::get).unwrap_or(FALLBACK_CORE_COUNT);
    cores.max(MIN_PARALLELISM)
}
