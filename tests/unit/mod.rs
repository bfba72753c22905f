//! Unit test suite for chartname
//!
//! Library-level tests that need no external renderer:
//! - **naming_properties**: derivation rule properties and concrete scenarios
//! - **extraction**: textual extractor against a validating YAML parser
//! - **verifier**: property runs against stub renderers
//!
//! ```bash
//! cargo test --test unit
//! ```

#[path = "../common/mod.rs"]
mod common;

mod extraction;
mod naming_properties;
mod verifier;
