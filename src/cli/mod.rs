//! Command-line interface.
//!
//! The action runtime invokes the binary twice per job: `run` as the main
//! step and `post` once the job finishes.

pub mod post;
pub mod run;

use clap::{Parser, Subcommand};

use crate::core::host::GithubActions;

/// sops-decrypt - decrypt sops files inside a CI job.
#[derive(Parser)]
#[command(
    name = "sops-decrypt",
    about = "Decrypt a sops file with a GPG key and expose it as a step output",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Action steps.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Import the key, decrypt the file and publish the `data` output
    Run,

    /// Remove the imported key from the keyring
    Post,
}

/// Execute a step against the runner environment.
pub fn execute(command: Command, host: &GithubActions) -> crate::error::Result<()> {
    match command {
        Command::Run => run::execute(host),
        Command::Post => post::execute(host),
    }
}
