//! Core library components.
//!
//! Everything the two action steps need: subprocess execution, the GPG key
//! lifecycle, sops installation and decryption, payload masking and the CI
//! host abstraction.

pub mod action;
pub mod cleanup;
pub mod command;
pub mod config;
pub mod constants;
pub mod gpg;
pub mod host;
pub mod payload;
pub mod sops;
