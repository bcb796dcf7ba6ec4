//! Site configuration stored in `site.toml` at the site root.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default config file name, relative to the site root.
pub const DEFAULT_CONFIG_FILE: &str = "site.toml";

/// Site configuration (TOML).
///
/// Deploy keys keep the site tool's upper-case names so an existing site
/// configuration can be reused. Missing fields take their defaults; unknown
/// keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    #[serde(flatten)]
    pub deploy: DeployConfig,

    pub commands: CommandsConfig,
}

/// Values that drive one deploy run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeployConfig {
    /// Branch whose revision is recorded in the deploy commit.
    #[serde(rename = "GITHUB_SOURCE_BRANCH")]
    pub source_branch: String,

    /// Branch the output folder is published to.
    #[serde(rename = "GITHUB_DEPLOY_BRANCH")]
    pub deploy_branch: String,

    /// Remote the deploy branch is pushed to.
    #[serde(rename = "GITHUB_REMOTE_NAME")]
    pub remote_name: String,

    /// Accepted for compatibility with existing site configs. Has no effect.
    #[serde(rename = "GITHUB_PULL_BEFORE_COMMIT")]
    pub pull_before_commit: bool,

    /// Generated site directory, relative to the site root.
    #[serde(rename = "OUTPUT_FOLDER")]
    pub output_folder: PathBuf,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            source_branch: "master".to_string(),
            deploy_branch: "gh-pages".to_string(),
            remote_name: "origin".to_string(),
            pull_before_commit: false,
            output_folder: PathBuf::from("output"),
        }
    }
}

/// External tools invoked during a deploy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CommandsConfig {
    /// Command that builds the site (e.g. `["nikola","build"]`).
    pub build: Vec<String>,

    /// Command that prints build tasks as `task:target` lines.
    pub list_targets: Vec<String>,

    /// Import helper executable.
    pub import_helper: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            build: vec!["nikola".to_string(), "build".to_string()],
            list_targets: vec!["nikola".to_string(), "list".to_string(), "--all".to_string()],
            import_helper: "ghp-import".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn validate(&self) -> Result<()> {
        let deploy = &self.deploy;
        if deploy.source_branch.trim().is_empty() {
            return Err(anyhow!("GITHUB_SOURCE_BRANCH must not be empty"));
        }
        if deploy.deploy_branch.trim().is_empty() {
            return Err(anyhow!("GITHUB_DEPLOY_BRANCH must not be empty"));
        }
        if deploy.remote_name.trim().is_empty() {
            return Err(anyhow!("GITHUB_REMOTE_NAME must not be empty"));
        }
        if deploy.deploy_branch == deploy.source_branch {
            return Err(anyhow!(
                "GITHUB_DEPLOY_BRANCH must differ from GITHUB_SOURCE_BRANCH ('{}')",
                deploy.source_branch
            ));
        }
        if deploy.output_folder.as_os_str().is_empty() {
            return Err(anyhow!("OUTPUT_FOLDER must not be empty"));
        }
        if deploy.output_folder.is_absolute() {
            return Err(anyhow!(
                "OUTPUT_FOLDER must be relative to the site root (got {})",
                deploy.output_folder.display()
            ));
        }
        ensure_command("commands.build", &self.commands.build)?;
        ensure_command("commands.list_targets", &self.commands.list_targets)?;
        if self.commands.import_helper.trim().is_empty() {
            return Err(anyhow!("commands.import_helper must not be empty"));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize site config")
    }
}

fn ensure_command(key: &str, command: &[String]) -> Result<()> {
    match command.first() {
        Some(program) if !program.trim().is_empty() => Ok(()),
        _ => Err(anyhow!("{key} must be a non-empty array")),
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SiteConfig::default()`.
pub fn load_config(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no site config, using defaults");
        let cfg = SiteConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SiteConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), "site config loaded");
    Ok(cfg)
}

/// Load a config file the operator named explicitly; it must exist.
pub fn load_explicit_config(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        bail!("config file {} not found", path.display());
    }
    load_config(path)
}
