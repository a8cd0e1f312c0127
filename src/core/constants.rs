//! Constants used throughout sops-decrypt.
//!
//! Centralizes action input names, state keys and release locations.

/// Input holding the sops release version (leading `v` allowed).
pub const INPUT_VERSION: &str = "version";

/// Input holding the base64-encoded private GPG key.
pub const INPUT_GPG_KEY: &str = "gpg_key";

/// Input holding the path to the encrypted secrets file.
pub const INPUT_FILE: &str = "file";

/// Optional input selecting json, yaml or dotenv output.
pub const INPUT_OUTPUT_TYPE: &str = "output_type";

/// Output receiving the decrypted data.
pub const OUTPUT_DATA: &str = "data";

/// State key carrying the base64 key from the main step to the post step.
pub const STATE_GPG_KEY: &str = "GPG_KEY";

/// Key-management tool binary.
pub const GPG: &str = "gpg";

/// Decryption tool name, used for the cache key and asset names.
pub const SOPS: &str = "sops";

/// Release download root for sops assets.
pub const SOPS_RELEASE_URL: &str = "https://github.com/getsops/sops/releases/download";

/// Last sops release whose assets carry no architecture suffix.
pub const LEGACY_ASSET_VERSION: &str = "3.7.1";

/// Log filter environment variable.
pub const LOG_ENV: &str = "SOPS_DECRYPT_LOG";
