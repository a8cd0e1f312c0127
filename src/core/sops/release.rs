//! sops release assets.
//!
//! Maps a version and the runner's platform onto the release asset URL.
//! Platform is passed in explicitly; [`Platform::current`] reads it from the
//! compile target for production use.

use std::cmp::Ordering;
use std::fmt;

use crate::core::constants::{LEGACY_ASSET_VERSION, SOPS, SOPS_RELEASE_URL};
use crate::error::{Result, SopsError};

/// Operating system, named the way runners report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
    Other(String),
}

impl Os {
    /// Map a `std::env::consts::OS` value.
    pub fn from_target(os: &str) -> Self {
        match os {
            "macos" | "darwin" => Os::Darwin,
            "linux" => Os::Linux,
            "windows" | "win32" => Os::Windows,
            other => Os::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Darwin => f.write_str("darwin"),
            Os::Linux => f.write_str("linux"),
            Os::Windows => f.write_str("win32"),
            Os::Other(name) => f.write_str(name),
        }
    }
}

/// CPU architecture, named the way runners report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arch {
    X64,
    Arm64,
    Other(String),
}

impl Arch {
    /// Map a `std::env::consts::ARCH` value.
    pub fn from_target(arch: &str) -> Self {
        match arch {
            "x86_64" | "x64" => Arch::X64,
            "aarch64" | "arm64" => Arch::Arm64,
            other => Arch::Other(other.to_string()),
        }
    }

    /// Architecture token used in sops asset names.
    fn asset_token(&self) -> Result<&'static str> {
        match self {
            Arch::X64 => Ok("amd64"),
            Arch::Arm64 => Ok("arm64"),
            Arch::Other(_) => Err(SopsError::UnsupportedArchitecture(self.to_string()).into()),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::X64 => f.write_str("x64"),
            Arch::Arm64 => f.write_str("arm64"),
            Arch::Other(name) => f.write_str(name),
        }
    }
}

/// The (os, arch) pair an asset is resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// The platform this binary was built for.
    pub fn current() -> Self {
        Self::new(
            Os::from_target(std::env::consts::OS),
            Arch::from_target(std::env::consts::ARCH),
        )
    }

    /// Executable suffix for the sops binary.
    pub fn exe_suffix(&self) -> &'static str {
        if self.os == Os::Windows {
            ".exe"
        } else {
            ""
        }
    }
}

/// Strip a leading `v` from a release tag.
pub fn normalize_version(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Dotted version as a (major, minor, patch) triple.
///
/// Missing components count as 0. Each component uses its leading digits, so
/// `3.8.0-rc.1` parses as (3, 8, 0).
fn triple(version: &str) -> (u64, u64, u64) {
    let mut parts = normalize_version(version).split('.').map(|part| {
        let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<u64>().unwrap_or(0)
    });

    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

/// Whether `version` is strictly newer than `reference`.
pub fn is_version_newer_than(reference: &str, version: &str) -> bool {
    triple(version).cmp(&triple(reference)) == Ordering::Greater
}

/// Release asset URL for `version` on `platform`.
///
/// Windows only has an x64 `.exe` asset. Other platforms gained an
/// architecture suffix after 3.7.1.
///
/// # Errors
///
/// Returns `SopsError::UnsupportedPlatform` for an unknown OS and
/// `SopsError::UnsupportedArchitecture` when no asset exists for the CPU.
pub fn download_url(version: &str, platform: &Platform) -> Result<String> {
    let version = normalize_version(version);
    let base = format!("{}/v{}/{}-v{}", SOPS_RELEASE_URL, version, SOPS, version);

    match &platform.os {
        os @ (Os::Darwin | Os::Linux) => {
            if is_version_newer_than(LEGACY_ASSET_VERSION, version) {
                let arch = platform.arch.asset_token()?;
                Ok(format!("{}.{}.{}", base, os, arch))
            } else {
                Ok(format!("{}.{}", base, os))
            }
        }
        Os::Windows => {
            if platform.arch != Arch::X64 {
                return Err(SopsError::UnsupportedArchitecture(platform.arch.to_string()).into());
            }
            Ok(format!("{}.exe", base))
        }
        Os::Other(name) => Err(SopsError::UnsupportedPlatform(name.clone()).into()),
    }
}
