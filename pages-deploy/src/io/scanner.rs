//! Output scanner: finds files in the output folder the build no longer produces.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::core::targets::{compare_outputs, normalize, parse_target_listing};
use crate::core::types::ScanReport;
use crate::io::process::{command_from_argv, run_checked};

/// Abstraction over output scanning.
pub trait OutputScanner {
    /// Compare `output_folder` (relative to the site root) with the expected build output.
    fn scan(&self, output_folder: &Path) -> Result<ScanReport>;
}

/// Scanner that asks the site tool for its task targets (default `nikola list --all`).
#[derive(Debug, Clone)]
pub struct TaskListScanner {
    workdir: PathBuf,
    list_command: Vec<String>,
}

impl TaskListScanner {
    pub fn new(workdir: impl Into<PathBuf>, list_command: Vec<String>) -> Self {
        Self {
            workdir: workdir.into(),
            list_command,
        }
    }

    fn expected_targets(&self, output_folder: &Path) -> Result<BTreeSet<PathBuf>> {
        let cmd = command_from_argv(&self.list_command, &self.workdir)
            .context("target listing command")?;
        let output = run_checked(cmd).context("list build targets")?;
        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(parse_target_listing(&listing, output_folder))
    }
}

impl OutputScanner for TaskListScanner {
    #[instrument(skip_all, fields(output_folder = %output_folder.display()))]
    fn scan(&self, output_folder: &Path) -> Result<ScanReport> {
        let expected = self.expected_targets(output_folder)?;
        let on_disk = files_on_disk(&self.workdir, output_folder)?;
        let report = compare_outputs(&on_disk, &expected);
        debug!(
            expected = expected.len(),
            on_disk = on_disk.len(),
            stale = report.stale.len(),
            missing = report.missing.len(),
            "output scanned"
        );
        Ok(report)
    }
}

/// List regular files under `root/output_folder`, relative to `root`.
///
/// A missing output folder yields an empty set. Symlinks are followed, so
/// files reached through a linked directory are listed under the link's path.
/// A dangling link is listed as a file.
pub fn files_on_disk(root: &Path, output_folder: &Path) -> Result<BTreeSet<PathBuf>> {
    let folder = root.join(output_folder);
    let mut files = BTreeSet::new();
    if !folder.exists() {
        return Ok(files);
    }
    for entry in WalkDir::new(&folder).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => match dangling_link(&err) {
                Some(path) => {
                    files.insert(relative_to(root, path)?);
                    continue;
                }
                None => {
                    return Err(err).with_context(|| format!("walk {}", folder.display()));
                }
            },
        };
        if entry.file_type().is_dir() {
            continue;
        }
        files.insert(relative_to(root, entry.path())?);
    }
    Ok(files)
}

fn relative_to(root: &Path, path: &Path) -> Result<PathBuf> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("strip site root from {}", path.display()))?;
    Ok(normalize(relative))
}

/// Path of a symlink whose target does not exist, if that is what `err` reports.
fn dangling_link(err: &walkdir::Error) -> Option<&Path> {
    let path = err.path()?;
    let not_found = err
        .io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);
    let is_link = path
        .symlink_metadata()
        .is_ok_and(|meta| meta.file_type().is_symlink());
    (not_found && is_link).then_some(path)
}
