//! Test support utilities for sops-decrypt integration tests.
//!
//! Each test gets an isolated runner: a workspace dir, a tool cache seeded
//! with a fake sops, a fake gpg on `PATH` and the runner's file commands.
//! Child processes get a cleared environment, so tests can run in parallel.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Isolated runner environment.
pub struct Test {
    /// Job workspace holding the encrypted file
    pub dir: TempDir,
    /// Directory with the fake gpg, first on PATH
    pub bin: TempDir,
    /// Runner tool cache (RUNNER_TOOL_CACHE)
    pub cache: TempDir,
    /// Runner file commands and call logs
    pub runner: TempDir,
}

impl Test {
    /// Create a runner with fake gpg and a cached fake sops 3.8.0.
    pub fn new() -> Self {
        let t = Self {
            dir: TempDir::new().expect("failed to create workspace"),
            bin: TempDir::new().expect("failed to create bin dir"),
            cache: TempDir::new().expect("failed to create tool cache"),
            runner: TempDir::new().expect("failed to create runner dir"),
        };

        write_executable(&t.bin.path().join("gpg"), FAKE_GPG);
        t.seed_sops("3.8.0");
        fs::write(t.dir.path().join("secrets.enc.json"), ENCRYPTED_FILE)
            .expect("failed to write encrypted file");
        t
    }

    /// Put a fake sops binary into the tool cache for `version`.
    pub fn seed_sops(&self, version: &str) {
        let arch = runner_arch();
        let version_dir = self.cache.path().join("sops").join(version);
        write_executable(&version_dir.join(arch).join("sops"), FAKE_SOPS);
        fs::write(version_dir.join(format!("{}.complete", arch)), "")
            .expect("failed to mark cache entry complete");
    }

    pub fn runner_file(&self, name: &str) -> PathBuf {
        self.runner.path().join(name)
    }

    /// Outputs written to GITHUB_OUTPUT.
    pub fn outputs(&self) -> HashMap<String, String> {
        read_file_command(&self.runner_file("output"))
    }

    /// State written to GITHUB_STATE.
    pub fn saved_state(&self) -> HashMap<String, String> {
        read_file_command(&self.runner_file("state"))
    }

    /// Argument lines of every gpg invocation.
    pub fn gpg_calls(&self) -> Vec<String> {
        read_lines(&self.runner_file("gpg.log"))
    }

    /// Argument lines of every sops invocation.
    pub fn sops_calls(&self) -> Vec<String> {
        read_lines(&self.runner_file("sops.log"))
    }
}

/// Architecture name used by the runner tool cache on this machine.
pub fn runner_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        other => other,
    }
}

fn write_executable(path: &Path, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::create_dir_all(path.parent().expect("script has a parent dir"))
        .expect("failed to create script dir");
    fs::write(path, script).expect("failed to write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("failed to chmod script");
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Parse `name<<delimiter` blocks.
fn read_file_command(path: &Path) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    let content = fs::read_to_string(path).unwrap_or_default();
    let mut lines = content.lines();

    while let Some(header) = lines.next() {
        let Some((name, delimiter)) = header.split_once("<<") else {
            continue;
        };
        let mut value = Vec::new();
        for line in lines.by_ref() {
            if line == delimiter {
                break;
            }
            value.push(line);
        }
        entries.insert(name.to_string(), value.join("\n"));
    }
    entries
}
