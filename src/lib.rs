//! sops-decrypt - decrypt sops-encrypted secrets inside a CI job.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── run           # Main step
//! │   └── post          # Post step (key cleanup)
//! └── core/             # Core library components
//!     ├── command       # Subprocess execution
//!     ├── gpg           # GPG key import, fingerprint, deletion
//!     ├── sops/         # sops install + decrypt
//!     │   ├── release   # Release asset URLs per platform
//!     │   └── install   # Tool cache and download
//!     ├── host/         # CI host abstraction
//!     │   ├── github    # GitHub Actions runner
//!     │   └── memory    # In-memory host
//!     ├── config        # Action inputs
//!     ├── payload       # Decrypted output parsing and masking
//!     ├── action        # Decrypt flow
//!     └── cleanup       # Cleanup flow
//! ```
//!
//! # Flow
//!
//! The main step imports the key, decrypts and publishes the `data` output,
//! masking every decrypted value. It saves the base64 key as state; the post
//! step reads it back, derives the fingerprint and deletes the key from the
//! keyring.

pub mod cli;
pub mod core;
pub mod error;
