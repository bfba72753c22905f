//! Error handling for chartname
//!
//! Two layers, following the same split the rest of the crate relies on:
//! - [`ChartnameError`] and [`IdentifierError`] are strongly-typed errors for
//!   code that needs to match on failure modes.
//! - [`ErrorContext`] wraps an error with user-facing details and a
//!   suggestion, and [`user_friendly_error`] builds one from any
//!   [`anyhow::Error`] for display by the CLI.
//!
//! # Examples
//!
//! ```rust,no_run
//! use chartname_cli::core::{ChartnameError, user_friendly_error};
//!
//! let err = anyhow::Error::from(ChartnameError::HelmNotFound {
//!     binary: "helm".to_string(),
//! });
//! user_friendly_error(err).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Grammar violations for release identifiers.
///
/// Positions are zero-based character offsets into the rejected input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The identifier is the empty string
    #[error("identifier must not be empty")]
    Empty,

    /// The identifier exceeds the DNS label limit
    #[error("identifier is {length} characters long, the limit is {max}")]
    TooLong {
        /// Actual length in characters
        length: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// A character outside `[a-z0-9-]`
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter {
        /// The offending character
        character: char,
        /// Where it was found
        position: usize,
    },

    /// First character is a hyphen
    #[error("identifier must start with a lowercase letter or digit")]
    LeadingHyphen,

    /// Last character is a hyphen
    #[error("identifier must end with a lowercase letter or digit")]
    TrailingHyphen,

    /// Two hyphens in a row
    #[error("consecutive hyphens at position {position}")]
    ConsecutiveHyphens {
        /// Position of the second hyphen
        position: usize,
    },
}

/// The main error type for chartname operations
#[derive(Error, Debug)]
pub enum ChartnameError {
    /// The renderer executable could not be located
    #[error("Renderer executable '{binary}' is not installed or not found in PATH")]
    HelmNotFound {
        /// Binary name or path that was looked up
        binary: String,
    },

    /// The configured template set does not exist
    #[error("Chart not found at {path}")]
    ChartNotFound {
        /// Path that was checked
        path: String,
    },

    /// The renderer exited unsuccessfully
    ///
    /// Rendering is deterministic for valid input, so this is never retried.
    #[error("Rendering release '{release}' failed (exit code {})", .exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    RenderFailed {
        /// Identifier passed as the release name
        release: String,
        /// Exit code, if the process exited normally
        exit_code: Option<i32>,
        /// Diagnostic output from the renderer
        stderr: String,
    },

    /// The renderer did not finish within the configured timeout
    #[error("Rendering release '{release}' timed out after {seconds} seconds")]
    RenderTimeout {
        /// Identifier passed as the release name
        release: String,
        /// Timeout that expired
        seconds: u64,
    },

    /// A string failed the identifier grammar
    #[error("Invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier {
        /// The rejected input
        identifier: String,
        /// Which rule it broke
        #[source]
        reason: IdentifierError,
    },

    /// The identifier generator could not produce cases
    #[error("Identifier generator failed: {reason}")]
    GeneratorError {
        /// Description from the underlying strategy
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// One or more properties did not hold
    #[error("{failed} of {total} properties failed")]
    PropertyFailed {
        /// Number of failing properties
        failed: usize,
        /// Number of properties run
        total: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error with user-facing details and a suggestion
///
/// Printed by the CLI entry point: the error in red, details in yellow and
/// the suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// Message of the underlying error
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from any displayable error
    #[must_use]
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            message: error.to_string(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`]
///
/// Known [`ChartnameError`] variants get tailored suggestions; everything
/// else is shown with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(err) = error.downcast_ref::<ChartnameError>() {
        return create_error_context(err);
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(format!("Invalid configuration file: {toml_error}"))
            .with_suggestion("Check the TOML syntax in chartname.toml");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(message)
}

fn create_error_context(error: &ChartnameError) -> ErrorContext {
    match error {
        ChartnameError::HelmNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion(
                "Install Helm 3 (https://helm.sh/docs/intro/install/) or point `helm` in chartname.toml at the binary",
            )
            .with_details("Rendering requires the helm executable to run `helm template`"),
        ChartnameError::ChartNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Pass --chart <path> or set `chart` in chartname.toml"),
        ChartnameError::RenderFailed {
            stderr,
            ..
        } => ErrorContext::new(error)
            .with_details(stderr.trim().to_string())
            .with_suggestion(
                "Run the same `helm template` command by hand; a template defect or a missing value override is the usual cause",
            ),
        ChartnameError::RenderTimeout {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Raise `timeout_secs` or check whether the chart pulls remote dependencies"),
        ChartnameError::InvalidIdentifier {
            ..
        } => ErrorContext::new(error).with_details(
            "Identifiers are 1-63 characters of [a-z0-9-], start and end alphanumeric and never contain '--'",
        ),
        ChartnameError::PropertyFailed {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Rerun with the printed --seed to reproduce the same cases"),
        ChartnameError::ConfigError {
            ..
        }
        | ChartnameError::TomlError(_) => ErrorContext::new(error)
            .with_suggestion("Check chartname.toml or the file named by --config / CHARTNAME_CONFIG"),
        _ => ErrorContext::new(error),
    }
}
