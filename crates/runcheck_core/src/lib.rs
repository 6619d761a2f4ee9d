//! Provide the pure naming conventions and comparison rules shared by the runcheck harness.
//!
//! A fixture directory is a flat list of files whose *names* carry all the structure: which file is a
//! test source, which file holds its expected output, and which file (if any) is fed to its stdin.
//! This crate is the single source of truth for those conventions.
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global state, no process handling.
//! - Callers work with stable IDs ([`case_kinds::CaseKindId`]) and look up derivation rules in const
//!   tables instead of scattering string-suffix checks through the runner.
//!
//! ## Examples
//! ```rust
//! use runcheck_core::case_kinds::{self, CaseKindId};
//!
//! assert_eq!(case_kinds::classify("Foo.input.java"), CaseKindId::WithInput);
//! assert_eq!(case_kinds::stdin_fixture_name("Foo.input.java").as_deref(), Some("Foo.0.inputc"));
//! assert!(runcheck_core::compare::outputs_match("3\n", "  3"));
//! ```

pub mod case_kinds;
pub mod compare;
pub mod conventions;
pub mod exclusions;
