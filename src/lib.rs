#![forbid(unsafe_code)]
//! runcheck: fixture-driven regression runner
//!
//! Drives an external compiler pipeline over a directory of test sources: builds each source with the
//! pipeline's build script, runs the executable it produces, and compares the trimmed stdout with the
//! expected-output fixture next to the source.
//!
//! ## Layout
//!
//! - `cli` - argument parsing and commands
//! - `config` - run configuration and its defaults
//! - `runner` - discovery, execution, reporting and cleanup
//! - naming conventions and comparison rules live in the `runcheck_core` crate
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `runner`
//!   modules enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod runner;
pub mod version;

pub use config::{BuildMode, RunnerConfig};
pub use runner::discovery::{TestCase, discover_cases};
pub use runner::{CaseOutcome, RunSummary, run_suite};
