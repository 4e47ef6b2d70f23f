//! Integration tests for the kickstart binary
//!
//! Every test runs against a scratch project directory with HOME pointed at
//! an empty directory and resolution forced to the bundled version table, so
//! nothing touches the network or the real user config. Installer tests put
//! fake `pnpm`/`npm` scripts on a PATH holding nothing else, so the scripts
//! stick to shell builtins.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

const TEMPLATES: [&str; 3] = [".editorconfig", ".gitignore", ".travis.yml"];

// ─── Helpers ───────────────────────────────────────────────────────────────

#[allow(deprecated)]
fn kickstart_cmd() -> Command {
    Command::cargo_bin("kickstart").unwrap()
}

struct Sandbox {
    _root: TempDir,
    home: PathBuf,
    project: PathBuf,
    bin: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let home = root.path().join("home");
        let project = root.path().join("project");
        let bin = root.path().join("bin");
        for dir in [&home, &project, &bin] {
            fs::create_dir(dir).unwrap();
        }
        Self {
            _root: root,
            home,
            project,
            bin,
        }
    }

    fn with_manifest(self, content: &str) -> Self {
        fs::write(self.project.join("package.json"), content).unwrap();
        self
    }

    /// kickstart with an isolated environment, targeting the sandbox project
    fn kickstart(&self) -> Command {
        let mut cmd = kickstart_cmd();
        cmd.env_clear()
            .env("HOME", &self.home)
            .env("PATH", &self.bin)
            .env("KICKSTART_RESOLVE", "static")
            .arg("--dir")
            .arg(&self.project);
        cmd
    }

    fn manifest(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.project.join("package.json")).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    fn present_templates(&self) -> Vec<&'static str> {
        TEMPLATES
            .into_iter()
            .filter(|name| self.project.join(name).exists())
            .collect()
    }
}

#[cfg(unix)]
fn install_fake(bin: &Path, name: &str, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = bin.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}", script)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

// ─── Files-only path ───────────────────────────────────────────────────────

#[test]
#[serial]
fn test_gitignore_only() {
    let sandbox = Sandbox::new();

    sandbox.kickstart().arg("-g").assert().success();

    assert_eq!(sandbox.present_templates(), vec![".gitignore"]);
    let content = fs::read_to_string(sandbox.project.join(".gitignore")).unwrap();
    assert!(content.contains("node_modules"));
    assert!(!sandbox.project.join("package.json").exists());
}

#[test]
#[serial]
fn test_all_files_without_manifest() {
    let sandbox = Sandbox::new();

    sandbox.kickstart().arg("-A").assert().success();

    assert_eq!(sandbox.present_templates(), TEMPLATES.to_vec());
}

#[test]
#[serial]
fn test_all_files_leaves_manifest_alone() {
    let original = "{\"name\":\"demo\"}";
    let sandbox = Sandbox::new().with_manifest(original);

    sandbox.kickstart().arg("--all-files").assert().success();

    let after = fs::read_to_string(sandbox.project.join("package.json")).unwrap();
    assert_eq!(after, original);
}

#[test]
#[serial]
fn test_missing_target_directory() {
    let sandbox = Sandbox::new();

    kickstart_cmd()
        .env_clear()
        .env("HOME", &sandbox.home)
        .args(["-g", "--dir"])
        .arg(sandbox.project.join("nope"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

// ─── Install path ──────────────────────────────────────────────────────────

#[test]
#[serial]
fn test_scripts_without_manifest_fails() {
    let sandbox = Sandbox::new();

    sandbox
        .kickstart()
        .arg("-s")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("package.json"));

    assert!(sandbox.present_templates().is_empty());
}

#[test]
#[serial]
fn test_default_run_without_manifest_deploys_nothing() {
    let sandbox = Sandbox::new();

    sandbox.kickstart().assert().failure().code(1);

    assert!(sandbox.present_templates().is_empty());
}

#[test]
#[serial]
fn test_no_installer_found() {
    let sandbox = Sandbox::new().with_manifest("{}");

    sandbox
        .kickstart()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("pnpm, npm"));

    assert!(sandbox.present_templates().is_empty());
}

#[test]
#[serial]
fn test_missing_explicit_config_fails() {
    let sandbox = Sandbox::new();

    sandbox
        .kickstart()
        .args(["-g", "--config"])
        .arg(sandbox.home.join("absent.yaml"))
        .assert()
        .failure()
        .code(1);

    assert!(sandbox.present_templates().is_empty());
}

#[cfg(unix)]
#[test]
#[serial]
fn test_full_run_with_fake_installer() {
    let sandbox = Sandbox::new().with_manifest(
        r#"{"name": "demo", "scripts": {"start": "node ."}, "dependencies": {"left-pad": "^1.0.0"}}"#,
    );
    install_fake(&sandbox.bin, "npm", ": > npm-ran\nexit 0\n");

    sandbox.kickstart().assert().success();

    assert!(sandbox.project.join("npm-ran").exists());
    assert_eq!(sandbox.present_templates(), TEMPLATES.to_vec());

    let manifest = sandbox.manifest();
    assert_eq!(manifest["name"], "demo");
    assert_eq!(manifest["scripts"]["start"], "node .");
    assert_eq!(manifest["scripts"]["lint"], "standard --verbose | snazzy");
    assert_eq!(manifest["scripts"]["test-ci"], "tap --reporter=tap test/*.js");
    assert_eq!(manifest["pre-commit"], serde_json::json!(["lint", "test"]));
    assert_eq!(manifest["dependencies"]["left-pad"], "^1.0.0");

    let dev = manifest["devDependencies"].as_object().unwrap();
    let names: Vec<_> = dev.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["standard", "snazzy", "tap", "pre-commit"]);
    assert!(dev.values().all(|v| v.as_str().unwrap().starts_with('^')));
}

#[cfg(unix)]
#[test]
#[serial]
fn test_pnpm_preferred_over_npm() {
    let sandbox = Sandbox::new().with_manifest("{}");
    install_fake(&sandbox.bin, "pnpm", ": > pnpm-ran\n");
    install_fake(&sandbox.bin, "npm", ": > npm-ran\n");

    sandbox.kickstart().arg("-s").assert().success();

    assert!(sandbox.project.join("pnpm-ran").exists());
    assert!(!sandbox.project.join("npm-ran").exists());
    assert!(sandbox.present_templates().is_empty());
}

#[cfg(unix)]
#[test]
#[serial]
fn test_installer_exit_code_propagates() {
    let sandbox = Sandbox::new().with_manifest("{}");
    install_fake(&sandbox.bin, "npm", "exit 4\n");

    sandbox.kickstart().assert().failure().code(4);

    assert!(sandbox.present_templates().is_empty());
    // The manifest is written before the installer runs
    assert_eq!(sandbox.manifest()["pre-commit"][0], "lint");
}

#[cfg(unix)]
#[test]
#[serial]
fn test_scripts_with_single_file() {
    let sandbox = Sandbox::new().with_manifest("{}");
    install_fake(&sandbox.bin, "npm", "exit 0\n");

    sandbox.kickstart().args(["-s", "-t"]).assert().success();

    assert_eq!(sandbox.present_templates(), vec![".travis.yml"]);
}

#[cfg(unix)]
#[test]
#[serial]
fn test_rerun_is_idempotent() {
    let sandbox = Sandbox::new().with_manifest("{\"name\": \"demo\", \"version\": \"1.0.0\"}");
    install_fake(&sandbox.bin, "npm", "exit 0\n");

    sandbox.kickstart().arg("-q").assert().success();
    let first = fs::read(sandbox.project.join("package.json")).unwrap();
    sandbox.kickstart().arg("-q").assert().success();
    let second = fs::read(sandbox.project.join("package.json")).unwrap();

    assert_eq!(first, second);
    assert!(first.ends_with(b"}\n"));
}

#[cfg(unix)]
#[test]
#[serial]
fn test_installers_from_environment() {
    let sandbox = Sandbox::new().with_manifest("{}");
    install_fake(&sandbox.bin, "pnpm", ": > pnpm-ran\n");
    install_fake(&sandbox.bin, "npm", ": > npm-ran\n");

    sandbox
        .kickstart()
        .env("KICKSTART_INSTALLERS", "npm")
        .arg("-s")
        .assert()
        .success();

    assert!(sandbox.project.join("npm-ran").exists());
    assert!(!sandbox.project.join("pnpm-ran").exists());
}
