//! Decrypt step.
//!
//! Reads the inputs, installs sops, imports the GPG key, decrypts the file,
//! masks every decrypted value and publishes the result as the `data`
//! output. The first failure stops the flow; it is reported to the host as
//! `Failed decrypting the file: <cause>` and returned to the caller.

use std::io;
use std::path::Path;

use tracing::{debug, error, warn};

use super::command::Executor;
use super::config::ActionInputs;
use super::constants::{OUTPUT_DATA, STATE_GPG_KEY};
use super::gpg::Gpg;
use super::host::Host;
use super::payload::DecryptedPayload;
use super::sops::{Downloader, Installer, OutputFormat, Sops};
use crate::error::{Error, Result};

/// Run the decrypt step against `host`.
///
/// # Errors
///
/// Returns `Error::Action` wrapping the first failure, after reporting it.
pub fn run<H, E, D, F>(host: &H, executor: &E, installer: &Installer<D>, chmod: F) -> Result<()>
where
    H: Host,
    E: Executor,
    D: Downloader,
    F: Fn(&Path) -> io::Result<()>,
{
    decrypt(host, executor, installer, chmod).map_err(|cause| {
        let err = Error::action(cause);
        error!("{}", err);
        if let Err(e) = host.set_failed(&err.to_string()) {
            warn!(error = %e, "unable to report failure to the runner");
        }
        err
    })
}

fn decrypt<H, E, D, F>(host: &H, executor: &E, installer: &Installer<D>, chmod: F) -> Result<()>
where
    H: Host,
    E: Executor,
    D: Downloader,
    F: Fn(&Path) -> io::Result<()>,
{
    let inputs = ActionInputs::read(host)?;
    let format = OutputFormat::resolve(&inputs.output_type)?;
    let sops_path = installer.install(&inputs.version, host, chmod)?;

    Gpg::new(executor).import_key(&inputs.gpg_key)?;
    // Only an imported key gives the post step something to remove.
    host.save_state(STATE_GPG_KEY, inputs.gpg_key.as_base64())?;

    let raw = Sops::new(executor).decrypt(&sops_path, &inputs.file, format)?;
    let payload = DecryptedPayload::new(raw, format);

    let secrets = payload.secrets()?;
    debug!(count = secrets.len(), "masking decrypted values");
    for secret in &secrets {
        host.set_secret(secret)?;
    }

    host.set_output(OUTPUT_DATA, &payload.output()?)?;
    Ok(())
}
