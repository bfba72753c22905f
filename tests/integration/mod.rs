//! Integration test suite for chartname
//!
//! End-to-end tests that drive the `chartname` binary and, when `helm` is
//! installed, the real renderer against the bundled fixture chart.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **cli**: every subcommand through `assert_cmd`
//! - **real_helm**: property runs against `tests/fixtures/chart`; tests
//!   return early when `helm` is not on PATH

#[path = "../common/mod.rs"]
mod common;

mod cli;
mod real_helm;
