//! sops decryption.
//!
//! Negotiates the output format, installs the requested sops release and
//! runs `sops --decrypt` on the secrets file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use super::command::Executor;
use crate::error::{Error, Result, SopsError};

mod install;
mod release;

pub use install::{chmod_executable, DownloadError, Downloader, HttpDownloader, Installer, ToolCache};
pub use release::{download_url, is_version_newer_than, normalize_version, Arch, Os, Platform};

/// Serialization sops is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Dotenv,
}

impl OutputFormat {
    /// Value passed to `sops --output-type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Dotenv => "dotenv",
        }
    }

    /// Resolve the `output_type` input. Empty means json.
    ///
    /// # Errors
    ///
    /// Returns `SopsError::UnsupportedFormat` for anything else that is not a
    /// known format.
    pub fn resolve(requested: &str) -> Result<Self> {
        if requested.is_empty() {
            info!("No output_type selected, Defaulting to json");
            return Ok(OutputFormat::Json);
        }
        requested.parse()
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "dotenv" => Ok(OutputFormat::Dotenv),
            other => Err(SopsError::UnsupportedFormat(other.to_string()).into()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// sops CLI wrapper.
#[derive(Debug, Clone)]
pub struct Sops<E> {
    executor: E,
}

impl<E: Executor> Sops<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Decrypt `secret_file` with the sops binary at `binary`.
    ///
    /// Returns sops' stdout, trimmed, in the requested format.
    ///
    /// # Errors
    ///
    /// Returns `SopsError::Decrypt` with sops' stderr when it exits nonzero.
    pub fn decrypt(&self, binary: &Path, secret_file: &str, format: OutputFormat) -> Result<String> {
        info!("Decrypting the secrets to {} format", format);
        let result = self.executor.exec(
            &binary.to_string_lossy(),
            &["--decrypt", "--output-type", format.as_str(), secret_file],
            None,
        );
        if !result.succeeded {
            info!("Unable to decrypt the secrets");
            return Err(SopsError::Decrypt {
                file: secret_file.to_string(),
                stderr: result.stderr,
            }
            .into());
        }

        info!("Successfully decrypted the secrets");
        Ok(result.stdout)
    }
}
