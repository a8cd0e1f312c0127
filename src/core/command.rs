//! Subprocess execution.
//!
//! Runs external tools (gpg, sops) and captures what they print. A nonzero
//! exit code is not an error at this layer: callers get a [`CommandResult`]
//! and decide for themselves what a failure means. `gpg --list-secret-keys`
//! for instance reports "no such key" through its exit code.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, error, info};

/// Outcome of one subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    /// `true` when the process exited with code 0.
    pub succeeded: bool,
    /// Captured stdout, trimmed.
    pub stdout: String,
    /// Captured stderr, trimmed. Holds the spawn error when the process never started.
    pub stderr: String,
}

impl CommandResult {
    /// A successful result with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed result with the given stderr.
    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Runs commands.
///
/// Implementations must never panic or error on a failing command; every
/// failure is reported through [`CommandResult::succeeded`].
pub trait Executor {
    /// Run `command` with `args`, piping `stdin` when given.
    fn exec(&self, command: &str, args: &[&str], stdin: Option<&[u8]>) -> CommandResult;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn exec(&self, command: &str, args: &[&str], stdin: Option<&[u8]>) -> CommandResult {
        (**self).exec(command, args, stdin)
    }
}

/// Executor backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct System;

impl Executor for System {
    fn exec(&self, command: &str, args: &[&str], stdin: Option<&[u8]>) -> CommandResult {
        info!("Executing the {} command", command);

        let mut child = match Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                error!("Executed and failed the {} command", command);
                let hint = if which::which(command).is_err() {
                    format!("{} not found on PATH: {}", command, e)
                } else {
                    format!("failed to spawn {}: {}", command, e)
                };
                return CommandResult::failure(hint);
            }
        };

        // Dropping the handle closes the pipe so the child sees EOF.
        if let Some(mut pipe) = child.stdin.take() {
            let input = stdin.unwrap_or_default();
            if let Err(e) = pipe.write_all(input) {
                // The child may exit before reading everything; its exit code decides.
                debug!(error = %e, "stdin closed early by {}", command);
            }
        }

        match child.wait_with_output() {
            Ok(output) => {
                info!("Executed the {} command", command);
                CommandResult {
                    succeeded: output.status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                }
            }
            Err(e) => {
                error!("Executed and failed the {} command", command);
                CommandResult::failure(e.to_string())
            }
        }
    }
}
