//! GPG key lifecycle.
//!
//! Imports the private key handed to the action, derives its fingerprint,
//! checks the keyring for it and removes both halves again. Every operation
//! shells out to the `gpg` CLI through an [`Executor`].
//!
//! ## Key material
//!
//! The key arrives base64-encoded. It is decoded only when piped to gpg and
//! the decoded bytes are zeroized straight after.

use std::fmt;

use base64::Engine;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::command::Executor;
use super::constants::GPG;
use crate::error::{GpgError, Result};

/// Base64-encoded private key as supplied by the `gpg_key` input.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial(String);

impl KeyMaterial {
    pub fn new(base64: impl Into<String>) -> Self {
        Self(base64.into())
    }

    /// The encoded form, which is what gets persisted for the post step.
    pub fn as_base64(&self) -> &str {
        &self.0
    }

    /// Decode to the raw key bytes gpg expects on stdin.
    ///
    /// Whitespace (line-wrapped base64) is ignored.
    fn decode(&self) -> Result<Zeroizing<Vec<u8>>> {
        let compact: Zeroizing<String> =
            Zeroizing::new(self.0.chars().filter(|c| !c.is_whitespace()).collect());
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(GpgError::from)?;
        Ok(Zeroizing::new(bytes))
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial({} bytes)", self.0.len())
    }
}

/// Normalized key fingerprint (alphanumeric only).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Extract the primary key fingerprint from `gpg --with-colons` output.
    ///
    /// Takes the first line starting with `fpr` and keeps the alphanumeric
    /// characters after that token. Returns `None` when no such line exists
    /// or it carries no fingerprint.
    pub fn from_colons(output: &str) -> Option<Self> {
        let line = output.lines().find(|line| line.starts_with("fpr"))?;
        let fpr: String = line["fpr".len()..]
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();

        if fpr.is_empty() {
            None
        } else {
            Some(Self(fpr))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keyring operations through the gpg CLI.
#[derive(Debug, Clone)]
pub struct Gpg<E> {
    executor: E,
}

impl<E: Executor> Gpg<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Import the private key into the local keyring.
    ///
    /// # Errors
    ///
    /// Returns `GpgError::Import` with gpg's stderr when the import fails, or
    /// `GpgError::InvalidKeyMaterial` when the input is not base64.
    pub fn import_key(&self, key: &KeyMaterial) -> Result<()> {
        let decoded = key.decode()?;

        info!("Importing the gpg key");
        let result = self.executor.exec(GPG, &["--import"], Some(decoded.as_slice()));
        if !result.succeeded {
            info!("Failed importing the GPG key");
            return Err(GpgError::Import(result.stderr).into());
        }

        info!("Successfully imported the gpg key");
        Ok(())
    }

    /// Derive the fingerprint of a key without touching the keyring.
    ///
    /// Uses `--import-options show-only` so gpg only describes the key.
    ///
    /// # Errors
    ///
    /// Returns `GpgError::Fingerprint` when gpg fails or its output carries no
    /// `fpr` record.
    pub fn fingerprint(&self, key: &KeyMaterial) -> Result<Fingerprint> {
        let decoded = key.decode()?;

        let result = self.executor.exec(
            GPG,
            &[
                "--with-colons",
                "--import-options",
                "show-only",
                "--import",
                "--fingerprint",
            ],
            Some(decoded.as_slice()),
        );
        if !result.succeeded {
            return Err(GpgError::Fingerprint(result.stderr).into());
        }

        let fingerprint = Fingerprint::from_colons(&result.stdout).ok_or_else(|| {
            GpgError::Fingerprint("no fingerprint record in gpg output".to_string())
        })?;
        debug!(fingerprint = %fingerprint, "derived fingerprint");
        Ok(fingerprint)
    }

    /// Delete the secret half of a key.
    pub fn delete_secret_key(&self, fingerprint: &Fingerprint) -> Result<()> {
        info!("Deleting the private gpg key");
        let result = self.executor.exec(
            GPG,
            &["--batch", "--yes", "--delete-secret-keys", fingerprint.as_str()],
            None,
        );
        if !result.succeeded {
            return Err(GpgError::DeleteSecretKey(result.stderr).into());
        }
        info!("Deleted the private gpg key");
        Ok(())
    }

    /// Delete the public half of a key.
    pub fn delete_public_key(&self, fingerprint: &Fingerprint) -> Result<()> {
        info!("Deleting the public gpg key");
        let result = self.executor.exec(
            GPG,
            &["--batch", "--yes", "--delete-keys", fingerprint.as_str()],
            None,
        );
        if !result.succeeded {
            return Err(GpgError::DeletePublicKey(result.stderr).into());
        }
        info!("Deleted the public gpg key");
        Ok(())
    }

    /// Delete both halves. gpg refuses to drop a public key while its secret
    /// key is still present, so the secret key goes first.
    pub fn delete_key(&self, fingerprint: &Fingerprint) -> Result<()> {
        self.delete_secret_key(fingerprint)?;
        self.delete_public_key(fingerprint)
    }

    /// Whether the keyring holds the secret key. A failing lookup means "no".
    pub fn key_exists(&self, fingerprint: &Fingerprint) -> bool {
        self.executor
            .exec(GPG, &["--list-secret-keys", fingerprint.as_str()], None)
            .succeeded
    }
}
