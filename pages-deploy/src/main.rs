//! Deploy a static site to GitHub pages.
//!
//! Reads deploy settings from `site.toml` in the site root, builds the site,
//! removes stale output and pushes the output folder with `ghp-import`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use pages_deploy::deploy::Deployer;
use pages_deploy::events::TracingSink;
use pages_deploy::exit_codes;
use pages_deploy::io::build::CommandBuildRunner;
use pages_deploy::io::config::{DEFAULT_CONFIG_FILE, SiteConfig, load_config, load_explicit_config};
use pages_deploy::io::publisher::GhpImportPublisher;
use pages_deploy::io::scanner::TaskListScanner;
use pages_deploy::logging;

#[derive(Parser)]
#[command(
    name = "pages-deploy",
    version,
    about = "Deploy a static site build to a GitHub pages branch"
)]
struct Cli {
    /// Site root (where the site is built and `site.toml` lives).
    #[arg(long, global = true, default_value = ".")]
    site: PathBuf,

    /// Config file path (defaults to `<site>/site.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deploy the site to GitHub pages.
    ///
    /// This command can be used to deploy your site to GitHub pages.
    /// It uses ghp-import to do this task.
    #[command(name = "github-deploy", alias = "github_deploy")]
    GithubDeploy,
    /// Print the effective configuration as TOML.
    Config,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => load_explicit_config(path)?,
        None => load_config(&cli.site.join(DEFAULT_CONFIG_FILE))?,
    };
    match cli.command {
        Command::GithubDeploy => cmd_github_deploy(&cli.site, &cfg),
        Command::Config => cmd_config(&cfg),
    }
}

fn cmd_github_deploy(site: &Path, cfg: &SiteConfig) -> Result<i32> {
    let builder = CommandBuildRunner::new(site, cfg.commands.build.clone());
    let scanner = TaskListScanner::new(site, cfg.commands.list_targets.clone());
    let publisher = GhpImportPublisher::new(site, cfg.commands.import_helper.clone());
    let outcome = Deployer::new(
        site,
        &cfg.deploy,
        &builder,
        &scanner,
        &publisher,
        &TracingSink,
    )
    .execute()?;
    Ok(outcome.exit_code())
}

fn cmd_config(cfg: &SiteConfig) -> Result<i32> {
    print!("{}", cfg.to_toml()?);
    Ok(exit_codes::OK)
}
