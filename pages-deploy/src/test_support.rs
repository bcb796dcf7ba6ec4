//! Test-only fakes for deploy collaborators and a throwaway git site.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::core::types::ScanReport;
use crate::events::{DeployEvent, EventSink};
use crate::io::build::BuildRunner;
use crate::io::publisher::{PublishRequest, VcsPublisher};
use crate::io::scanner::{OutputScanner, files_on_disk};

/// File the fake import helper writes its arguments to (NUL-separated).
pub const HELPER_ARGS_FILE: &str = "helper-args";

/// Build runner that returns a fixed exit code and counts calls.
pub struct ScriptedBuildRunner {
    code: i32,
    calls: Cell<u32>,
}

impl ScriptedBuildRunner {
    pub fn new(code: i32) -> Self {
        Self {
            code,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl BuildRunner for ScriptedBuildRunner {
    fn build(&self) -> Result<i32> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.code)
    }
}

/// Scanner that returns a fixed report and records the folders it was asked about.
pub struct ScriptedScanner {
    report: ScanReport,
    scanned: RefCell<Vec<PathBuf>>,
}

impl ScriptedScanner {
    pub fn new(report: ScanReport) -> Self {
        Self {
            report,
            scanned: RefCell::new(Vec::new()),
        }
    }

    /// Scanner reporting `stale` paths and nothing missing.
    pub fn stale(paths: &[&str]) -> Self {
        Self::new(ScanReport {
            stale: paths.iter().map(PathBuf::from).collect(),
            missing: Vec::new(),
        })
    }

    pub fn calls(&self) -> usize {
        self.scanned.borrow().len()
    }

    pub fn scanned(&self) -> Vec<PathBuf> {
        self.scanned.borrow().clone()
    }
}

impl OutputScanner for ScriptedScanner {
    fn scan(&self, output_folder: &Path) -> Result<ScanReport> {
        self.scanned.borrow_mut().push(output_folder.to_path_buf());
        Ok(self.report.clone())
    }
}

/// Publisher with scripted availability, revision and exit code.
///
/// Records every revision query and publish request. When built with
/// [`ScriptedPublisher::snapshot`], it also records which output files exist
/// at the moment `publish` is called.
pub struct ScriptedPublisher {
    available: bool,
    revision: String,
    code: i32,
    snapshot_root: Option<PathBuf>,
    revision_queries: RefCell<Vec<String>>,
    requests: RefCell<Vec<PublishRequest>>,
    published_files: RefCell<Option<Vec<PathBuf>>>,
}

impl ScriptedPublisher {
    pub fn new(revision: &str, code: i32) -> Self {
        Self {
            available: true,
            revision: revision.to_string(),
            code,
            snapshot_root: None,
            revision_queries: RefCell::new(Vec::new()),
            requests: RefCell::new(Vec::new()),
            published_files: RefCell::new(None),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new("", 0)
        }
    }

    /// Record the files under `root/<output_folder>` when `publish` runs.
    pub fn snapshot(mut self, root: &Path) -> Self {
        self.snapshot_root = Some(root.to_path_buf());
        self
    }

    pub fn revision_queries(&self) -> Vec<String> {
        self.revision_queries.borrow().clone()
    }

    pub fn requests(&self) -> Vec<PublishRequest> {
        self.requests.borrow().clone()
    }

    pub fn published_files(&self) -> Option<Vec<PathBuf>> {
        self.published_files.borrow().clone()
    }
}

impl VcsPublisher for ScriptedPublisher {
    fn helper(&self) -> &str {
        "ghp-import"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn source_revision(&self, branch: &str) -> Result<String> {
        self.revision_queries.borrow_mut().push(branch.to_string());
        Ok(self.revision.clone())
    }

    fn command_line(&self, request: &PublishRequest) -> Vec<String> {
        vec![
            self.helper().to_string(),
            "-n".to_string(),
            "-m".to_string(),
            request.message.clone(),
            "-p".to_string(),
            "-r".to_string(),
            request.remote.clone(),
            "-b".to_string(),
            request.branch.clone(),
            request.output_folder.to_string_lossy().into_owned(),
        ]
    }

    fn publish(&self, request: &PublishRequest) -> Result<i32> {
        if let Some(root) = &self.snapshot_root {
            let files = files_on_disk(root, &request.output_folder)?;
            *self.published_files.borrow_mut() = Some(files.into_iter().collect());
        }
        self.requests.borrow_mut().push(request.clone());
        Ok(self.code)
    }
}

/// Event sink that keeps every event in order.
#[derive(Default)]
pub struct RecordingSink {
    events: RefCell<Vec<DeployEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DeployEvent> {
        self.events.borrow().clone()
    }
}

impl EventSink for RecordingSink {
    fn on_event(&self, event: DeployEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// A temporary git repository on branch `master` with one commit.
pub struct TestSite {
    dir: TempDir,
}

impl TestSite {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp site")?;
        let site = Self { dir };
        site.git(&["init", "-q"])?;
        site.git(&["symbolic-ref", "HEAD", "refs/heads/master"])?;
        site.git(&["config", "user.email", "deploy@example.com"])?;
        site.git(&["config", "user.name", "Deploy Test"])?;
        site.git(&["config", "commit.gpgsign", "false"])?;
        site.write_file("conf.toml", "# site sources\n")?;
        site.git(&["add", "-A"])?;
        site.git(&["commit", "-q", "-m", "initial"])?;
        Ok(site)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Full SHA of `master`.
    pub fn head_sha(&self) -> Result<String> {
        Ok(self.git(&["rev-parse", "master"])?.trim().to_string())
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let out = Command::new("git")
            .args(args)
            .current_dir(self.root())
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))?;
        if !out.status.success() {
            return Err(anyhow!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&out.stderr).trim()
            ));
        }
        Ok(String::from_utf8_lossy(&out.stdout).to_string())
    }
}

/// Write a fake import helper script into `dir`.
///
/// `-h` exits 0; any other invocation writes its arguments to
/// [`HELPER_ARGS_FILE`] in `dir` and exits with `exit_code`.
#[cfg(unix)]
pub fn write_fake_helper(dir: &Path, exit_code: i32) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ghp-import");
    let args_path = dir.join(HELPER_ARGS_FILE);
    let script = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"-h\" ]; then exit 0; fi\n\
         : > '{args}'\n\
         for arg in \"$@\"; do printf '%s\\000' \"$arg\" >> '{args}'; done\n\
         exit {exit_code}\n",
        args = args_path.display()
    );
    fs::write(&path, script).with_context(|| format!("write {}", path.display()))?;
    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).with_context(|| format!("chmod {}", path.display()))?;
    Ok(path)
}

/// Read the arguments recorded by [`write_fake_helper`].
pub fn read_helper_args(dir: &Path) -> Result<Vec<String>> {
    let path = dir.join(HELPER_ARGS_FILE);
    let raw = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    Ok(raw
        .split(|byte| *byte == 0)
        .filter(|arg| !arg.is_empty())
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect())
}
