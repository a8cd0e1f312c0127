//! Action inputs.
//!
//! Read from the host parameter store. Required inputs are checked in
//! declaration order so the first missing one is the one reported.

use super::constants::{INPUT_FILE, INPUT_GPG_KEY, INPUT_OUTPUT_TYPE, INPUT_VERSION};
use super::gpg::KeyMaterial;
use super::host::Host;
use crate::error::Result;

/// Inputs of the decrypt step.
#[derive(Debug, Clone)]
pub struct ActionInputs {
    /// sops release, with or without a leading `v`.
    pub version: String,
    pub gpg_key: KeyMaterial,
    /// Path of the encrypted secrets file.
    pub file: String,
    /// Raw `output_type`; empty when not given.
    pub output_type: String,
}

impl ActionInputs {
    /// # Errors
    ///
    /// Returns `Error::MissingInput` naming the first required input that is
    /// empty.
    pub fn read<H: Host>(host: &H) -> Result<Self> {
        let version = host.input(INPUT_VERSION, true)?;
        let gpg_key = host.input(INPUT_GPG_KEY, true)?;
        let file = host.input(INPUT_FILE, true)?;
        let output_type = host.input(INPUT_OUTPUT_TYPE, false)?;

        Ok(Self {
            version,
            gpg_key: KeyMaterial::new(gpg_key),
            file,
            output_type,
        })
    }
}
