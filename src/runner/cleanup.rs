//! Scratch directory bookkeeping and removal of generated build artifacts.
//!
//! Every scratch directory gets a [`SCRATCH_MARKER`] file when the runner creates it. Cleanup only touches
//! marked directories, so pointing `--work-dir` at a directory the runner never used removes nothing.
//! Removing something that is already gone is not an error, so cleanup can be repeated freely.

use std::fs;
use std::io;
use std::path::Path;

use runcheck_core::conventions::{GENERATED_ARTIFACTS, SCRATCH_MARKER};

use super::discovery::TestCase;
use super::interfaces::TestError;
use super::scratch_dir;

/// Create a scratch directory (if needed) and mark it as owned by the runner.
pub fn prepare_scratch_dir(dir: &Path) -> Result<(), TestError> {
    fs::create_dir_all(dir)?;
    let marker = dir.join(SCRATCH_MARKER);
    if !marker.is_file() {
        fs::write(marker, "created by runcheck; removed by `runcheck clean`\n")?;
    }
    Ok(())
}

/// Whether `dir` is a scratch directory created by the runner.
pub fn is_scratch_dir(dir: &Path) -> bool {
    dir.join(SCRATCH_MARKER).is_file()
}

/// Remove generated artifacts from one scratch directory, then the directory itself if nothing else is left.
///
/// Unmarked directories are left untouched. Returns the number of artifacts removed.
pub fn clean_scratch_dir(dir: &Path, artifact_name: &str) -> Result<usize, TestError> {
    if !is_scratch_dir(dir) {
        tracing::debug!("skipping '{}': not a scratch directory", dir.display());
        return Ok(0);
    }

    let mut removed = 0;
    let extra = std::iter::once(artifact_name).filter(|name| !GENERATED_ARTIFACTS.iter().any(|g| g == name));
    for name in GENERATED_ARTIFACTS.iter().copied().chain(extra) {
        match fs::remove_file(dir.join(name)) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    if only_marker_left(dir)? {
        fs::remove_file(dir.join(SCRATCH_MARKER))?;
        if let Err(e) = fs::remove_dir(dir) {
            tracing::warn!("could not remove scratch directory '{}': {}", dir.display(), e);
        }
    }

    Ok(removed)
}

fn only_marker_left(dir: &Path) -> Result<bool, TestError> {
    for entry in fs::read_dir(dir)? {
        if entry?.file_name() != SCRATCH_MARKER {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Clean the scratch directories of the given cases.
pub fn clean_cases(work_dir: &Path, cases: &[TestCase], artifact_name: &str) -> Result<usize, TestError> {
    let mut removed = 0;
    for case in cases {
        removed += clean_scratch_dir(&scratch_dir(work_dir, case), artifact_name)?;
    }
    Ok(removed)
}

/// Clean every scratch directory under `work_dir`, whichever run created it.
pub fn clean_work_dir(work_dir: &Path, artifact_name: &str) -> Result<usize, TestError> {
    let entries = match fs::read_dir(work_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            removed += clean_scratch_dir(&path, artifact_name)?;
        }
    }
    Ok(removed)
}
