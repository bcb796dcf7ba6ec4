//! Build target listing parsing and output comparison.
//!
//! The site tool lists its tasks one per line as `task_name:target`. Targets
//! under the output folder are the files the current build is expected to
//! produce; anything else found on disk there is stale.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use crate::core::types::ScanReport;

/// Collect expected output files from a task listing.
///
/// Lines without a `:` separator, and targets outside `output_folder`, are
/// ignored. Only the first `:` splits, so targets may contain colons.
pub fn parse_target_listing(listing: &str, output_folder: &Path) -> BTreeSet<PathBuf> {
    let folder = normalize(output_folder);
    listing
        .lines()
        .filter_map(|line| line.trim().split_once(':'))
        .map(|(_, target)| normalize(Path::new(target.trim())))
        .filter(|target| target != &folder && target.starts_with(&folder))
        .collect()
}

/// Compare files found on disk with the expected targets.
pub fn compare_outputs(on_disk: &BTreeSet<PathBuf>, expected: &BTreeSet<PathBuf>) -> ScanReport {
    ScanReport {
        stale: on_disk.difference(expected).cloned().collect(),
        missing: expected.difference(on_disk).cloned().collect(),
    }
}

/// Drop `.` components so `./output/a.html` and `output/a.html` compare equal.
pub fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
