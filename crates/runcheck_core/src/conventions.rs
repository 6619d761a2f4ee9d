//! Well-known file names and suffixes of the fixture layout and the external build contract.

/// Suffix of every expected-output fixture.
pub const EXPECTED_OUTPUT_SUFFIX: &str = ".out";

/// Marker segment identifying an input-bearing source (`<base>.input.<ext>`).
pub const INPUT_MARKER: &str = ".input";

/// Suffix of the stdin fixture derived from an input-bearing source (`<base>.0.inputc`).
pub const STDIN_FIXTURE_SUFFIX: &str = ".0.inputc";

/// Suffix the external toolchain writes next to `mjtest` fixtures for firm-compiled cases.
pub const FIRM_MARKER_SUFFIX: &str = ".mjtest_correct_testcases_compile-firm";

/// Default build script invoked for every case.
pub const DEFAULT_BUILD_PROGRAM: &str = "./run";

/// Default executable left behind by the build script.
pub const DEFAULT_ARTIFACT_NAME: &str = "a.out";

/// Files the build pipeline may leave behind in a scratch directory.
///
/// The executable, the generated assembly, and the intermediate molki listing.
pub const GENERATED_ARTIFACTS: &[&str] = &["a.out", "a.out.s", "a.molki.s"];

/// Marker file written into every scratch directory the runner creates.
///
/// Cleanup only touches directories that carry it.
pub const SCRATCH_MARKER: &str = ".runcheck-scratch";
