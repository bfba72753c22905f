//! chartname - release-name derivation and verification for Helm charts
//!
//! A chart that creates several Kubernetes resources usually names them all
//! after the release: the release identifier is truncated to 63 characters,
//! trailing hyphens are stripped, and a fixed suffix is appended per kind.
//! This crate implements that rule and a harness that proves a chart follows
//! it, by rendering the chart with generated identifiers and comparing the
//! names it emits against the rule.
//!
//! # Modules
//!
//! - [`naming`] - identifier grammar, base name and per-kind resource names
//! - [`generator`] - proptest strategies producing valid identifiers
//! - [`helm`] - the [`helm::Renderer`] capability and the `helm template` adapter
//! - [`manifest`] - line-based kind → name extraction from rendered output
//! - [`verify`] - consistency and distinctness properties, seeded runs, shrinking
//! - [`config`] - `chartname.toml` harness settings
//! - [`cli`] - the `chartname` command tree
//! - [`core`] - error types and user-facing error formatting
//! - [`utils`] - progress reporting
//!
//! # Example
//!
//! ```rust
//! use chartname_cli::naming::{Identifier, ResourceKind};
//!
//! let id = Identifier::parse("my-release").unwrap();
//! assert_eq!(id.resource_name(ResourceKind::ControlPlane), "my-release-cp");
//! assert_eq!(id.resource_name(ResourceKind::WorkerConfigTemplate), "my-release-machine-config");
//! ```
//!
//! ```bash
//! chartname derive my-release
//! chartname check --chart ./charts/hcloud-cp --cases 200
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod generator;
pub mod helm;
pub mod manifest;
pub mod naming;
pub mod utils;
pub mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
