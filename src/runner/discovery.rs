//! Fixture discovery.
//!
//! Lists the fixture directory once, keeps the entries that name test sources, and resolves each source's
//! companion fixtures through the case-kind registry. Resolution happens here, before anything is built, so a
//! broken fixture directory is reported up front instead of halfway through a run.

use std::fs;
use std::path::{Path, PathBuf};

use runcheck_core::case_kinds::{self, CaseKindId};
use runcheck_core::exclusions;

use super::interfaces::TestError;

/// A test source with its resolved fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// File name inside the fixture directory; also the case's display name.
    pub name: String,
    pub kind: CaseKindId,
    /// Absolute path handed to the build script.
    pub source: PathBuf,
    /// Fed to the executable's stdin, for input-bearing cases.
    pub stdin: Option<PathBuf>,
    pub expected: PathBuf,
}

/// Where each report file lands, as an absolute path comparable with entries of a canonical directory.
///
/// A report whose parent directory does not exist cannot collide with a fixture and is dropped.
pub fn report_targets(reports: &[PathBuf]) -> Vec<PathBuf> {
    reports
        .iter()
        .filter_map(|path| {
            let name = path.file_name()?;
            let parent = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            fs::canonicalize(parent).ok().map(|p| p.join(name))
        })
        .collect()
}

/// List candidate file names in `dir`, sorted. Subdirectories are not entered.
///
/// `dir` should already be canonical; entries that are one of `reports` are skipped.
pub fn list_candidates(dir: &Path, extra_exclusions: &[String], reports: &[PathBuf]) -> Result<Vec<String>, TestError> {
    let reserved = report_targets(reports);
    let entries = fs::read_dir(dir).map_err(|source| TestError::FixtureDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| TestError::FixtureDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if reserved.contains(&path) {
            tracing::debug!(path = %path.display(), "skipping report file");
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!("skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if exclusions::is_candidate(&name, extra_exclusions) {
            names.push(name);
        } else {
            tracing::trace!(%name, "excluded");
        }
    }

    names.sort();
    Ok(names)
}

/// Resolve the fixtures of one candidate. `dir` should already be absolute.
pub fn resolve_case(dir: &Path, name: &str) -> Result<TestCase, TestError> {
    let kind = case_kinds::classify(name);

    let stdin = match case_kinds::stdin_fixture_name(name) {
        Some(stdin_name) => {
            let path = dir.join(stdin_name);
            if !path.is_file() {
                return Err(TestError::MissingFixture {
                    case: name.to_string(),
                    tried: vec![path],
                });
            }
            Some(path)
        }
        None => None,
    };

    let tried: Vec<PathBuf> = case_kinds::expected_output_names(name)
        .into_iter()
        .map(|n| dir.join(n))
        .collect();
    let Some(expected) = tried.iter().find(|p| p.is_file()).cloned() else {
        return Err(TestError::MissingFixture {
            case: name.to_string(),
            tried,
        });
    };

    Ok(TestCase {
        name: name.to_string(),
        kind,
        source: dir.join(name),
        stdin,
        expected,
    })
}

/// Discover every runnable case in `dir`.
///
/// Cases not matching `filter` are dropped before resolution, so a missing fixture only halts discovery for a
/// case that would actually run. `reports` are the files the run writes (result log, JSON report).
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn discover_cases(
    dir: &Path,
    extra_exclusions: &[String],
    reports: &[PathBuf],
    filter: Option<&str>,
) -> Result<Vec<TestCase>, TestError> {
    let dir = fs::canonicalize(dir).map_err(|source| TestError::FixtureDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let cases = list_candidates(&dir, extra_exclusions, reports)?
        .into_iter()
        .filter(|name| filter.is_none_or(|keyword| name.contains(keyword)))
        .map(|name| resolve_case(&dir, &name))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(count = cases.len(), "discovered test cases");
    Ok(cases)
}
