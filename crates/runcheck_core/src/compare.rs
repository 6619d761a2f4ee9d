//! Output comparison rules.
//!
//! Captured and expected outputs are compared after trimming leading and trailing whitespace. Everything in
//! between must match exactly, including internal whitespace and line endings.

/// Normalize an output for comparison.
pub fn normalize(output: &str) -> &str {
    output.trim()
}

/// Whether `actual` matches `expected` under trimmed exact equality.
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    normalize(actual) == normalize(expected)
}

/// The first line at which two normalized outputs disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDifference {
    /// 1-based line number.
    pub line: usize,
    /// `None` when the actual output ended early.
    pub actual: Option<String>,
    /// `None` when the expected output ended early.
    pub expected: Option<String>,
}

/// Locate the first differing line, or `None` if the outputs match.
pub fn first_difference(actual: &str, expected: &str) -> Option<LineDifference> {
    if outputs_match(actual, expected) {
        return None;
    }

    let mut actual_lines = normalize(actual).split('\n');
    let mut expected_lines = normalize(expected).split('\n');
    let mut line = 1;
    loop {
        match (actual_lines.next(), expected_lines.next()) {
            (Some(a), Some(e)) if a == e => line += 1,
            (None, None) => {
                // Not reached: the normalized outputs differ somewhere.
                return Some(LineDifference { line, actual: None, expected: None });
            }
            (a, e) => {
                return Some(LineDifference {
                    line,
                    actual: a.map(str::to_string),
                    expected: e.map(str::to_string),
                });
            }
        }
    }
}
