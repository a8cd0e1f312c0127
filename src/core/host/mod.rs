//! CI host integration.
//!
//! The action only needs a small slice of what a CI runner offers: reading
//! inputs, publishing outputs, masking values in the log, carrying state from
//! the main step to the post step, extending `PATH` and marking the step as
//! failed. [`Host`] captures exactly that.
//!
//! ## Implementations
//!
//! - [`GithubActions`]: environment variables and runner file commands.
//! - [`MemoryHost`]: keeps everything in memory; used by tests.

use std::path::Path;

use crate::error::{Error, Result};

mod github;
mod memory;

pub use github::GithubActions;
pub use memory::MemoryHost;

/// Parameter store and log sink provided by the CI runner.
pub trait Host {
    /// Raw value of an input, `None` when unset.
    fn raw_input(&self, name: &str) -> Option<String>;

    /// Publish a step output.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;

    /// Mask a literal value in every later log line.
    ///
    /// Masking works per line, so the value must not contain a newline.
    fn set_secret(&self, value: &str) -> Result<()>;

    /// Persist a value for the post step of the same job.
    fn save_state(&self, name: &str, value: &str) -> Result<()>;

    /// Read a value persisted by the main step.
    fn state(&self, name: &str) -> Option<String>;

    /// Prepend a directory to `PATH` for this and later steps.
    fn add_path(&self, dir: &Path) -> Result<()>;

    /// Report the step as failed with a message.
    fn set_failed(&self, message: &str) -> Result<()>;

    /// Trimmed input value. Empty when unset.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingInput` when `required` and the value is empty.
    fn input(&self, name: &str, required: bool) -> Result<String> {
        let value = self
            .raw_input(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        if required && value.is_empty() {
            return Err(Error::MissingInput(name.to_string()));
        }
        Ok(value)
    }
}

impl<H: Host + ?Sized> Host for &H {
    fn raw_input(&self, name: &str) -> Option<String> {
        (**self).raw_input(name)
    }
    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        (**self).set_output(name, value)
    }
    fn set_secret(&self, value: &str) -> Result<()> {
        (**self).set_secret(value)
    }
    fn save_state(&self, name: &str, value: &str) -> Result<()> {
        (**self).save_state(name, value)
    }
    fn state(&self, name: &str) -> Option<String> {
        (**self).state(name)
    }
    fn add_path(&self, dir: &Path) -> Result<()> {
        (**self).add_path(dir)
    }
    fn set_failed(&self, message: &str) -> Result<()> {
        (**self).set_failed(message)
    }
}
