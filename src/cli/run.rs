//! Main step.

use crate::core::action;
use crate::core::command::System;
use crate::core::host::GithubActions;
use crate::core::sops::{chmod_executable, HttpDownloader, Installer, Platform, ToolCache};
use crate::error::Result;

/// Decrypt with the real gpg, sops and tool cache of this runner.
pub fn execute(host: &GithubActions) -> Result<()> {
    let installer = Installer::new(
        ToolCache::new(host.tool_cache_dir()),
        HttpDownloader::new(host.temp_dir()),
        Platform::current(),
    );
    action::run(host, &System, &installer, chmod_executable)
}
