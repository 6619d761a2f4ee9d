//! Decide which directory entries are test sources and which are fixtures or metadata.
//!
//! The fixture directory mixes sources with their expected outputs, stdin fixtures and toolchain leftovers.
//! [`DEFAULT_EXCLUSIONS`] lists every pattern that marks a file as *not* a test source.
//!
//! ## Examples
//! ```rust
//! use runcheck_core::exclusions;
//!
//! assert!(exclusions::is_candidate("Add.java", &[]));
//! assert!(!exclusions::is_candidate("Add.java.out", &[]));
//! assert!(!exclusions::is_candidate(".gitignore", &[]));
//! ```

use crate::conventions::{EXPECTED_OUTPUT_SUFFIX, FIRM_MARKER_SUFFIX};

/// A file-name pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionRule {
    Suffix(&'static str),
    Prefix(&'static str),
}

impl ExclusionRule {
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            ExclusionRule::Suffix(s) => file_name.ends_with(s),
            ExclusionRule::Prefix(p) => file_name.starts_with(p),
        }
    }
}

/// An exclusion pattern plus the reason it exists (shown by `runcheck list -v`).
#[derive(Debug, Clone, Copy)]
pub struct ExclusionInfo {
    pub rule: ExclusionRule,
    pub reason: &'static str,
}

/// Patterns that never name a test source.
pub const DEFAULT_EXCLUSIONS: &[ExclusionInfo] = &[
    ExclusionInfo {
        rule: ExclusionRule::Suffix(EXPECTED_OUTPUT_SUFFIX),
        reason: "expected-output fixture",
    },
    ExclusionInfo {
        rule: ExclusionRule::Suffix(".inputc"),
        reason: "stdin fixture",
    },
    ExclusionInfo {
        rule: ExclusionRule::Suffix(FIRM_MARKER_SUFFIX),
        reason: "alternate-format output marker",
    },
    ExclusionInfo {
        rule: ExclusionRule::Prefix("."),
        reason: "hidden or metadata file",
    },
];

/// Return the first default exclusion matching `file_name`.
pub fn excluded_by(file_name: &str) -> Option<&'static ExclusionInfo> {
    DEFAULT_EXCLUSIONS.iter().find(|info| info.rule.matches(file_name))
}

/// Whether `file_name` is a test source, given extra user-supplied suffixes to exclude.
pub fn is_candidate(file_name: &str, extra_suffixes: &[String]) -> bool {
    !file_name.is_empty()
        && excluded_by(file_name).is_none()
        && !extra_suffixes.iter().any(|s| !s.is_empty() && file_name.ends_with(s.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_files_are_excluded() {
        for name in [
            "Add.java.out",
            "Add.out",
            "Foo.0.inputc",
            "Foo.0.inputc.out",
            "Foo.input.java.out",
            "Big.mj.out",
            "Big.mj.mjtest_correct_testcases_compile-firm",
            ".DS_Store",
            ".java",
        ] {
            assert!(!is_candidate(name, &[]), "{name} should be excluded");
        }
    }

    #[test]
    fn sources_are_candidates() {
        for name in ["Add.java", "Foo.input.java", "Big.mj", "noext"] {
            assert!(is_candidate(name, &[]), "{name} should be a candidate");
        }
    }

    #[test]
    fn extra_suffixes_extend_the_defaults() {
        let extra = vec![".txt".to_string(), String::new()];
        assert!(!is_candidate("notes.txt", &extra));
        assert!(is_candidate("Add.java", &extra));
    }

    #[test]
    fn excluded_by_reports_reason() {
        let info = excluded_by("Foo.0.inputc").unwrap();
        assert_eq!(info.reason, "stdin fixture");
    }
}
