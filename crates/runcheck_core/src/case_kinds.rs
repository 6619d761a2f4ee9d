//! Define the kinds of test case a fixture directory can hold.
//!
//! Every candidate source file belongs to exactly one kind. A kind is a row of [`CASE_KINDS`] that records how
//! the companion fixtures are derived from the source file name:
//!
//! - the stdin fixture (if any),
//! - the expected-output fixture, as an ordered list of rules where the first existing file wins,
//! - whether stderr is captured together with stdout.
//!
//! ## Notes
//!
//! - Derivations are pure string transformations; checking that the derived files exist is the caller's job.
//! - [`classify`] is total: a name that does not match a more specific kind is [`CaseKindId::Plain`].
//!
//! ## Examples
//! ```rust
//! use runcheck_core::case_kinds;
//!
//! assert_eq!(case_kinds::expected_output_names("Add.java"), vec!["Add.java.out", "Add.out"]);
//! assert_eq!(case_kinds::expected_output_names("Foo.input.java"), vec!["Foo.0.inputc.out"]);
//! ```

use crate::conventions::{EXPECTED_OUTPUT_SUFFIX, INPUT_MARKER, STDIN_FIXTURE_SUFFIX};

/// Stable identifier for every case kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseKindId {
    /// Runs with empty stdin; expected output is `<name>.out` or `<stem>.out`.
    Plain,
    /// `<base>.input.<ext>`: stdin comes from `<base>.0.inputc`, expected output is `<base>.0.inputc.out`.
    WithInput,
}

/// How the stdin fixture name is derived from the source file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinRule {
    /// No stdin fixture; the executable sees an empty stdin.
    Empty,
    /// Replace the trailing `.input.<ext>` with the given suffix.
    ReplaceInputMarker(&'static str),
}

/// One way of naming the expected-output fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedRule {
    /// `<name><suffix>`
    AppendToName(&'static str),
    /// `<stem><suffix>`, where the stem drops the last extension of the name.
    AppendToStem(&'static str),
    /// `<stdin-fixture><suffix>`
    AppendToStdin(&'static str),
}

/// Metadata and derivation rules for one case kind.
#[derive(Debug, Clone, Copy)]
pub struct CaseKindInfo {
    pub id: CaseKindId,
    /// Canonical spelling used in reports.
    pub canonical: &'static str,
    pub description: &'static str,
    pub stdin: StdinRule,
    /// Tried in order; the first existing file is the expected output.
    pub expected: &'static [ExpectedRule],
    /// Append stderr to the captured stdout before comparison.
    pub merge_stderr: bool,
}

/// Registry of all case kinds.
pub const CASE_KINDS: &[CaseKindInfo] = &[
    CaseKindInfo {
        id: CaseKindId::Plain,
        canonical: "plain",
        description: "runs with empty stdin and compares stdout",
        stdin: StdinRule::Empty,
        expected: &[
            ExpectedRule::AppendToName(EXPECTED_OUTPUT_SUFFIX),
            ExpectedRule::AppendToStem(EXPECTED_OUTPUT_SUFFIX),
        ],
        merge_stderr: false,
    },
    CaseKindInfo {
        id: CaseKindId::WithInput,
        canonical: "with-input",
        description: "feeds a companion input fixture to stdin and compares stdout and stderr",
        stdin: StdinRule::ReplaceInputMarker(STDIN_FIXTURE_SUFFIX),
        expected: &[ExpectedRule::AppendToStdin(EXPECTED_OUTPUT_SUFFIX)],
        merge_stderr: true,
    },
];

/// Look up the registry row for a kind.
pub fn info_for(id: CaseKindId) -> &'static CaseKindInfo {
    match id {
        CaseKindId::Plain => &CASE_KINDS[0],
        CaseKindId::WithInput => &CASE_KINDS[1],
    }
}

/// Return the canonical spelling of a kind.
pub fn as_str(id: CaseKindId) -> &'static str {
    info_for(id).canonical
}

/// Resolve a canonical spelling back to its kind.
pub fn from_str(name: &str) -> Option<CaseKindId> {
    CASE_KINDS.iter().find(|info| info.canonical == name).map(|info| info.id)
}

/// Decide which kind a candidate source file belongs to.
pub fn classify(file_name: &str) -> CaseKindId {
    if input_base(file_name).is_some() {
        CaseKindId::WithInput
    } else {
        CaseKindId::Plain
    }
}

/// Split `<base>.input.<ext>` and return `<base>`.
///
/// Both `<base>` and `<ext>` must be non-empty, and `<ext>` is the last extension only.
pub fn input_base(file_name: &str) -> Option<&str> {
    let (head, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    let base = head.strip_suffix(INPUT_MARKER)?;
    (!base.is_empty()).then_some(base)
}

/// Drop the last extension of a file name (`Add.java` → `Add`).
///
/// Returns `None` when there is no extension to drop.
pub fn stem(file_name: &str) -> Option<&str> {
    let (stem, _) = file_name.rsplit_once('.')?;
    (!stem.is_empty()).then_some(stem)
}

impl StdinRule {
    /// Derive the stdin fixture name, if this rule has one.
    pub fn apply(&self, file_name: &str) -> Option<String> {
        match self {
            StdinRule::Empty => None,
            StdinRule::ReplaceInputMarker(suffix) => input_base(file_name).map(|base| format!("{base}{suffix}")),
        }
    }
}

impl ExpectedRule {
    /// Derive an expected-output name; `stdin_name` is the already-derived stdin fixture, if any.
    pub fn apply(&self, file_name: &str, stdin_name: Option<&str>) -> Option<String> {
        match self {
            ExpectedRule::AppendToName(suffix) => Some(format!("{file_name}{suffix}")),
            ExpectedRule::AppendToStem(suffix) => stem(file_name).map(|s| format!("{s}{suffix}")),
            ExpectedRule::AppendToStdin(suffix) => stdin_name.map(|s| format!("{s}{suffix}")),
        }
    }
}

/// Derive the stdin fixture name for a source file, according to its kind.
pub fn stdin_fixture_name(file_name: &str) -> Option<String> {
    info_for(classify(file_name)).stdin.apply(file_name)
}

/// Derive the ordered, de-duplicated list of expected-output names for a source file.
pub fn expected_output_names(file_name: &str) -> Vec<String> {
    let info = info_for(classify(file_name));
    let stdin_name = info.stdin.apply(file_name);

    let mut names: Vec<String> = Vec::new();
    for rule in info.expected {
        if let Some(name) = rule.apply(file_name, stdin_name.as_deref()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}
