//! Error types for the decrypt and cleanup flows.
//!
//! Every component has its own error enum; [`Error`] ties them together and
//! adds the two orchestrator wrappers that prefix the message reported to the
//! CI host.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    /// A required action input was empty or absent.
    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    #[error(transparent)]
    Gpg(#[from] GpgError),

    #[error(transparent)]
    Sops(#[from] SopsError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Host(#[from] HostError),

    /// Failure anywhere in the decrypt flow.
    #[error("Failed decrypting the file: {0}")]
    Action(Box<Error>),

    /// Failure anywhere in the post-job cleanup flow.
    #[error("Error while deleting the gpg key: {0}")]
    Cleanup(Box<Error>),
}

impl Error {
    /// Wrap an error raised inside the decrypt flow.
    pub fn action(cause: Error) -> Self {
        Error::Action(Box::new(cause))
    }

    /// Wrap an error raised inside the cleanup flow.
    pub fn cleanup(cause: Error) -> Self {
        Error::Cleanup(Box::new(cause))
    }
}

/// Key-management tool failures.
#[derive(Error, Debug)]
pub enum GpgError {
    #[error("GPG key is not valid base64: {0}")]
    InvalidKeyMaterial(#[from] base64::DecodeError),

    #[error("Importing of GPG key failed: {0}")]
    Import(String),

    #[error("Unable to get the fingerprint of the gpg key: {0}")]
    Fingerprint(String),

    #[error("Deleting private GPG key failed: {0}")]
    DeleteSecretKey(String),

    #[error("Deleting gpg public key failed: {0}")]
    DeletePublicKey(String),
}

/// Decryption tool failures, from format negotiation through to decryption.
#[derive(Error, Debug)]
pub enum SopsError {
    #[error("Output type \"{0}\" is not supported by sops-decrypt")]
    UnsupportedFormat(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    #[error("Failed to download version {version}: {source}")]
    Download {
        version: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to cache {path}: {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to mark {path} as executable: {source}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Execution of sops command failed on {file}: {stderr}")]
    Decrypt { file: String, stderr: String },
}

/// Decrypted output that could not be parsed for redaction.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("decrypted json is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("decrypted yaml is invalid: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failures talking to the CI host.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("unable to write {command} file {path}: {source}")]
    FileCommand {
        command: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write to the runner log: {0}")]
    Log(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
