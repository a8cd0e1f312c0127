//! Post step.

use crate::core::cleanup;
use crate::core::command::System;
use crate::core::host::GithubActions;
use crate::error::Result;

/// Remove the key imported by the main step, if any.
pub fn execute(host: &GithubActions) -> Result<()> {
    cleanup::run(host, &System)
}
