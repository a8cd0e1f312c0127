//! GitHub Actions runner.
//!
//! Inputs and post-step state arrive as environment variables
//! (`INPUT_<NAME>`, `STATE_<NAME>`). Outputs, state and `PATH` additions are
//! appended to the files named by `GITHUB_OUTPUT`, `GITHUB_STATE` and
//! `GITHUB_PATH`. Masking and failures are workflow commands on stdout.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::Host;
use crate::error::{HostError, Result};

/// Host backed by the GitHub Actions runner environment.
#[derive(Debug, Clone, Default)]
pub struct GithubActions {
    vars: HashMap<String, String>,
}

impl GithubActions {
    /// Snapshot the current process environment.
    pub fn from_env() -> Self {
        Self::with_vars(std::env::vars())
    }

    /// Build from an explicit set of variables.
    pub fn with_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Scratch directory for downloads.
    pub fn temp_dir(&self) -> PathBuf {
        self.var("RUNNER_TEMP")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Root of the runner tool cache.
    pub fn tool_cache_dir(&self) -> PathBuf {
        self.var("RUNNER_TOOL_CACHE")
            .map(PathBuf::from)
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("sops-decrypt")))
            .unwrap_or_else(|| std::env::temp_dir().join("sops-decrypt-cache"))
    }

    /// Whether the runner asked for step debug logging.
    pub fn debug_enabled(&self) -> bool {
        self.var("RUNNER_DEBUG") == Some("1")
    }

    /// Append a `key<<delimiter` block to a runner file command.
    fn append_file_command(&self, command: &'static str, name: &str, value: &str) -> Result<bool> {
        let Some(path) = self.var(command) else {
            return Ok(false);
        };
        let path = PathBuf::from(path);
        let entry = file_command_entry(name, value, &format!("ghadelimiter_{}", uuid::Uuid::new_v4()))
            .map_err(|source| HostError::FileCommand {
                command,
                path: path.clone(),
                source,
            })?;

        append_line(&path, &entry).map_err(|source| HostError::FileCommand {
            command,
            path,
            source,
        })?;
        Ok(true)
    }
}

impl Host for GithubActions {
    fn raw_input(&self, name: &str) -> Option<String> {
        let key = format!("INPUT_{}", name.replace(' ', "_").to_uppercase());
        self.vars.get(&key).cloned()
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        if !self.append_file_command("GITHUB_OUTPUT", name, value)? {
            issue(&format!(
                "::set-output name={}::{}",
                escape_property(name),
                escape_data(value)
            ))?;
        }
        Ok(())
    }

    fn set_secret(&self, value: &str) -> Result<()> {
        issue(&format!("::add-mask::{}", escape_data(value)))
    }

    fn save_state(&self, name: &str, value: &str) -> Result<()> {
        if !self.append_file_command("GITHUB_STATE", name, value)? {
            issue(&format!(
                "::save-state name={}::{}",
                escape_property(name),
                escape_data(value)
            ))?;
        }
        Ok(())
    }

    fn state(&self, name: &str) -> Option<String> {
        self.vars.get(&format!("STATE_{}", name)).cloned()
    }

    fn add_path(&self, dir: &Path) -> Result<()> {
        if let Some(path_file) = self.var("GITHUB_PATH") {
            let path_file = PathBuf::from(path_file);
            append_line(&path_file, &format!("{}\n", dir.display())).map_err(|source| {
                HostError::FileCommand {
                    command: "GITHUB_PATH",
                    path: path_file.clone(),
                    source,
                }
            })?;
        } else {
            warn!("GITHUB_PATH is not set, {} is only added for this step", dir.display());
        }

        let mut entries = vec![dir.to_path_buf()];
        if let Some(current) = std::env::var_os("PATH") {
            entries.extend(std::env::split_paths(&current));
        }
        match std::env::join_paths(entries) {
            Ok(joined) => std::env::set_var("PATH", joined),
            Err(e) => debug!(error = %e, "unable to extend PATH"),
        }
        Ok(())
    }

    fn set_failed(&self, message: &str) -> Result<()> {
        issue(&format!("::error::{}", escape_data(message)))
    }
}

/// Write one workflow command line to stdout.
fn issue(command: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", command).map_err(HostError::Log)?;
    stdout.flush().map_err(HostError::Log)?;
    Ok(())
}

fn append_line(path: &Path, content: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(content.as_bytes())
}

/// Render a multi-line-safe file command entry.
///
/// Fails when the delimiter occurs in the name or value, since the runner
/// would then cut the value short.
fn file_command_entry(name: &str, value: &str, delimiter: &str) -> io::Result<String> {
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} must not contain the delimiter {}", name, delimiter),
        ));
    }
    Ok(format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter))
}

/// Escape a workflow command payload.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow command property.
fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
