//! sops-decrypt - decrypt sops files inside a CI job.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sops_decrypt::cli::{execute, Cli};
use sops_decrypt::core::constants::LOG_ENV;
use sops_decrypt::core::host::GithubActions;

fn main() {
    let cli = Cli::parse();
    let host = GithubActions::from_env();

    // Log lines go to stdout, where the runner picks them up
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose || host.debug_enabled() {
            EnvFilter::new("sops_decrypt=debug")
        } else {
            EnvFilter::new("sops_decrypt=info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    // Failures are already reported to the runner by the step itself.
    if execute(cli.command, &host).is_err() {
        std::process::exit(1);
    }
}
