//! Core types shared by every other module.
//!
//! Currently this is the error layer: typed errors for matching in code and
//! [`ErrorContext`] for presenting failures to CLI users.

pub mod error;

pub use error::{ChartnameError, ErrorContext, IdentifierError, user_friendly_error};
