//! CLI tests for `pages-deploy github-deploy`.
//!
//! Spawns the binary against temp sites and verifies exit codes, deletions
//! and the arguments handed to the import helper.

use std::process::{Command, Output};

use pages_deploy::exit_codes;
use pages_deploy::test_support::TestSite;

fn run_deploy(site: &TestSite) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pages-deploy"))
        .current_dir(site.root())
        .arg("github-deploy")
        .env("RUST_LOG", "pages_deploy=info")
        .output()
        .expect("pages-deploy github-deploy")
}

#[test]
fn missing_helper_exits_with_missing_dependency_code() {
    let site = TestSite::new().expect("site");
    site.write_file(
        "site.toml",
        r#"
[commands]
build = ["pages-deploy-test-builder-must-not-run"]
import_helper = "pages-deploy-test-no-such-helper"
"#,
    )
    .expect("config");

    let output = run_deploy(&site);

    assert_eq!(output.status.code(), Some(exit_codes::MISSING_DEPENDENCY));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pages-deploy-test-no-such-helper"));
}

#[test]
fn invalid_config_exits_with_invalid_code() {
    let site = TestSite::new().expect("site");
    site.write_file("site.toml", "GITHUB_DEPLOY_BRANCH = \"master\"\n")
        .expect("config");

    let output = run_deploy(&site);

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn missing_explicit_config_exits_with_invalid_code() {
    let site = TestSite::new().expect("site");
    let output = Command::new(env!("CARGO_BIN_EXE_pages-deploy"))
        .current_dir(site.root())
        .args(["--config", "missing.toml", "github-deploy"])
        .output()
        .expect("pages-deploy github-deploy");

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.toml"), "stderr: {stderr}");
    assert!(!site.root().join("output").exists());
}

#[test]
fn config_command_prints_defaults() {
    let site = TestSite::new().expect("site");
    let output = Command::new(env!("CARGO_BIN_EXE_pages-deploy"))
        .current_dir(site.root())
        .arg("config")
        .output()
        .expect("pages-deploy config");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("GITHUB_SOURCE_BRANCH = \"master\""));
    assert!(stdout.contains("GITHUB_REMOTE_NAME = \"origin\""));
    assert!(stdout.contains("ghp-import"));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use pages_deploy::test_support::{read_helper_args, write_fake_helper};

    fn write_config(site: &TestSite, helper: &std::path::Path, build: &str) {
        let config = format!(
            r#"
[commands]
build = ["sh", "-c", "{build}"]
list_targets = ["sh", "-c", "printf 'render_pages:output/index.html\\ncopy_files:files/x\\n'"]
import_helper = "{helper}"
"#,
            helper = helper.display()
        );
        site.write_file("site.toml", &config).expect("config");
    }

    #[test]
    fn build_failure_exit_code_is_propagated() {
        let site = TestSite::new().expect("site");
        let helper = write_fake_helper(site.root(), 0).expect("helper");
        write_config(&site, &helper, "exit 3");
        site.write_file("output/stale.html", "old").expect("stale");

        let output = run_deploy(&site);

        assert_eq!(output.status.code(), Some(3));
        assert!(site.root().join("output/stale.html").exists());
        assert!(read_helper_args(site.root()).is_err());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Build failed, not deploying"));
    }

    #[test]
    fn deploy_cleans_stale_files_and_invokes_helper() {
        let site = TestSite::new().expect("site");
        let helper = write_fake_helper(site.root(), 0).expect("helper");
        write_config(
            &site,
            &helper,
            "mkdir -p output && echo hi > output/index.html",
        );
        site.write_file("output/stale.html", "old").expect("stale");
        let head = site.head_sha().expect("head");

        let output = run_deploy(&site);

        assert_eq!(
            output.status.code(),
            Some(exit_codes::OK),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert!(site.root().join("output/index.html").exists());
        assert!(!site.root().join("output/stale.html").exists());

        let args = read_helper_args(site.root()).expect("helper args");
        assert_eq!(args.len(), 9);
        assert_eq!(args[0], "-n");
        assert_eq!(args[1], "-m");
        assert!(args[2].contains(&format!("Source commit: {head}")));
        assert!(args[2].contains(env!("CARGO_PKG_VERSION")));
        assert_eq!(&args[3..], ["-p", "-r", "origin", "-b", "gh-pages", "output"]);

        let stderr = String::from_utf8_lossy(&output.stderr);
        let echo = stderr
            .lines()
            .find(|line| line.contains("==>"))
            .expect("command echo line");
        assert!(echo.contains("\"-b\""), "echo: {echo}");
        assert!(echo.contains("\"gh-pages\""), "echo: {echo}");
        assert!(echo.contains("\"output\""), "echo: {echo}");
    }

    #[test]
    fn linked_asset_directory_survives_deploy() {
        let site = TestSite::new().expect("site");
        let helper = write_fake_helper(site.root(), 0).expect("helper");
        site.write_file("themes/assets/site.css", "body {}")
            .expect("asset");
        site.write_file("output/index.html", "hi").expect("index");
        std::os::unix::fs::symlink(
            site.root().join("themes/assets"),
            site.root().join("output/assets"),
        )
        .expect("symlink");
        let config = format!(
            r#"
[commands]
build = ["true"]
list_targets = ["sh", "-c", "printf 'render_pages:output/index.html\ncopy_assets:output/assets/site.css\n'"]
import_helper = "{helper}"
"#,
            helper = helper.display()
        );
        site.write_file("site.toml", &config).expect("config");

        let output = run_deploy(&site);

        assert_eq!(
            output.status.code(),
            Some(exit_codes::OK),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert!(site.root().join("output/assets/site.css").exists());
        assert!(site.root().join("themes/assets/site.css").exists());
    }

    #[test]
    fn helper_failure_exit_code_is_propagated() {
        let site = TestSite::new().expect("site");
        let helper = write_fake_helper(site.root(), 42).expect("helper");
        write_config(
            &site,
            &helper,
            "mkdir -p output && echo hi > output/index.html",
        );

        let output = run_deploy(&site);

        assert_eq!(output.status.code(), Some(42));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Failed GitHub deployment"));
        assert!(stderr.contains("returned 42"));
    }
}
