//! Command helper methods for Test.

use super::{gpg_key, Test};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a sops-decrypt command inside the isolated runner.
    ///
    /// Returns a Command configured with:
    /// - an empty environment apart from the runner variables below
    /// - the fake gpg first on PATH
    /// - GITHUB_OUTPUT, GITHUB_STATE and GITHUB_PATH pointing into the runner dir
    /// - RUNNER_TOOL_CACHE holding the fake sops
    /// - Current directory set to the workspace
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd =
            Command::cargo_bin("sops-decrypt").expect("failed to find sops-decrypt binary");

        let mut path = vec![self.bin.path().to_path_buf()];
        if let Some(current) = std::env::var_os("PATH") {
            path.extend(std::env::split_paths(&current));
        }

        cmd.env_clear();
        cmd.env("PATH", std::env::join_paths(path).expect("invalid PATH"));
        cmd.env("HOME", self.dir.path());
        cmd.env("GITHUB_OUTPUT", self.runner_file("output"));
        cmd.env("GITHUB_STATE", self.runner_file("state"));
        cmd.env("GITHUB_PATH", self.runner_file("path"));
        cmd.env("RUNNER_TEMP", self.runner.path());
        cmd.env("RUNNER_TOOL_CACHE", self.cache.path());
        cmd.env("GPG_LOG", self.runner_file("gpg.log"));
        cmd.env("SOPS_LOG", self.runner_file("sops.log"));
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// `sops-decrypt run` with all required inputs and the given output type.
    pub fn run_step(&self, output_type: &str) -> Output {
        self.cmd()
            .arg("run")
            .env("INPUT_VERSION", "v3.8.0")
            .env("INPUT_GPG_KEY", gpg_key())
            .env("INPUT_FILE", "secrets.enc.json")
            .env("INPUT_OUTPUT_TYPE", output_type)
            .output()
            .expect("failed to run sops-decrypt run")
    }

    /// `sops-decrypt post` with the key saved by a previous run.
    pub fn post_step(&self) -> Output {
        self.cmd()
            .arg("post")
            .env("STATE_GPG_KEY", gpg_key())
            .output()
            .expect("failed to run sops-decrypt post")
    }
}
