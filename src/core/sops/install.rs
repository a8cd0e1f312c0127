//! Installing sops into the runner tool cache.
//!
//! The cache uses the runner layout `<root>/<tool>/<version>/<arch>/` with a
//! sibling `<arch>.complete` marker, so a sops binary cached by an earlier job
//! on the same runner is picked up without a download.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use super::release::{download_url, normalize_version, Platform};
use crate::core::constants::SOPS;
use crate::core::host::Host;
use crate::error::{Result, SopsError};

/// Boxed download failure, kept as the source of `SopsError::Download`.
pub type DownloadError = Box<dyn std::error::Error + Send + Sync>;

/// Fetches a URL into a local file.
pub trait Downloader {
    /// Download `url` and return the path of the downloaded file.
    fn download(&self, url: &str) -> std::result::Result<PathBuf, DownloadError>;
}

/// Downloader using a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    dest_dir: PathBuf,
}

impl HttpDownloader {
    /// Downloads land in `dest_dir` under a random file name.
    pub fn new(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
        }
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str) -> std::result::Result<PathBuf, DownloadError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("sops-decrypt/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(300))
            .build()?;
        let mut response = client.get(url).send()?.error_for_status()?;

        fs::create_dir_all(&self.dest_dir)?;
        let path = self.dest_dir.join(uuid::Uuid::new_v4().to_string());
        let mut file = fs::File::create(&path)?;
        let bytes = response.copy_to(&mut file)?;

        debug!(bytes, path = %path.display(), "downloaded {}", url);
        Ok(path)
    }
}

/// Runner tool cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn version_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(version)
    }

    /// Cached directory for (tool, version, arch), if complete.
    pub fn find(&self, tool: &str, version: &str, arch: &str) -> Option<PathBuf> {
        let version_dir = self.version_dir(tool, version);
        let dir = version_dir.join(arch);
        let marker = version_dir.join(format!("{}.complete", arch));

        if marker.is_file() && dir.is_dir() {
            Some(dir)
        } else {
            None
        }
    }

    /// Copy `source` into the cache as `target_name` and mark the entry complete.
    ///
    /// Returns the cache directory holding the file.
    pub fn cache_file(
        &self,
        source: &Path,
        target_name: &str,
        tool: &str,
        version: &str,
        arch: &str,
    ) -> io::Result<PathBuf> {
        let version_dir = self.version_dir(tool, version);
        let dir = version_dir.join(arch);
        fs::create_dir_all(&dir)?;
        fs::copy(source, dir.join(target_name))?;
        fs::write(version_dir.join(format!("{}.complete", arch)), "")?;
        Ok(dir)
    }
}

/// Mark a file executable (0755). No-op where permission bits don't apply.
pub fn chmod_executable(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Installs a sops release for one platform.
#[derive(Debug, Clone)]
pub struct Installer<D> {
    cache: ToolCache,
    downloader: D,
    platform: Platform,
}

impl<D: Downloader> Installer<D> {
    pub fn new(cache: ToolCache, downloader: D, platform: Platform) -> Self {
        Self {
            cache,
            downloader,
            platform,
        }
    }

    /// Make sops `version` available and return the binary path.
    ///
    /// Downloads on a cache miss, then marks the binary executable with
    /// `chmod` and puts its directory on `PATH`.
    ///
    /// # Errors
    ///
    /// Platform errors surface before any download is attempted; a failed
    /// download becomes `SopsError::Download`.
    pub fn install<H, F>(&self, version: &str, host: &H, chmod: F) -> Result<PathBuf>
    where
        H: Host,
        F: Fn(&Path) -> io::Result<()>,
    {
        let version = normalize_version(version);
        let url = download_url(version, &self.platform)?;
        let arch = self.platform.arch.to_string();
        let binary_name = format!("{}{}", SOPS, self.platform.exe_suffix());

        let dir = match self.cache.find(SOPS, version, &arch) {
            Some(dir) => {
                debug!(dir = %dir.display(), "sops {} found in tool cache", version);
                dir
            }
            None => {
                info!("Downloading {} from: {}", SOPS, url);
                let downloaded =
                    self.downloader
                        .download(&url)
                        .map_err(|source| SopsError::Download {
                            version: version.to_string(),
                            source,
                        })?;

                let cached = self
                    .cache
                    .cache_file(&downloaded, &binary_name, SOPS, version, &arch);
                if let Err(e) = fs::remove_file(&downloaded) {
                    debug!(error = %e, "leaving downloaded file {}", downloaded.display());
                }
                cached.map_err(|source| SopsError::Cache {
                    path: downloaded,
                    source,
                })?
            }
        };

        let binary = dir.join(&binary_name);
        chmod(&binary).map_err(|source| SopsError::Permissions {
            path: binary.clone(),
            source,
        })?;
        host.add_path(&dir)?;

        info!("Installed {} {}", SOPS, version);
        Ok(binary)
    }
}
