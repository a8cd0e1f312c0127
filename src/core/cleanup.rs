//! Post step: remove the imported GPG key.
//!
//! Runs in a separate process after the job. The only link to the decrypt
//! step is the base64 key it saved as `GPG_KEY` state once the import
//! succeeded; without it there is nothing to do.

use tracing::{error, info, warn};

use super::command::Executor;
use super::constants::STATE_GPG_KEY;
use super::gpg::{Gpg, KeyMaterial};
use super::host::Host;
use crate::error::{Error, Result};

/// Run the post step against `host`.
///
/// # Errors
///
/// Returns `Error::Cleanup` wrapping the failure, after reporting it.
pub fn run<H: Host, E: Executor>(host: &H, executor: &E) -> Result<()> {
    let Some(key) = host
        .state(STATE_GPG_KEY)
        .filter(|key| !key.trim().is_empty())
    else {
        info!("No imported gpg key recorded, nothing to clean up");
        return Ok(());
    };

    remove_key(&Gpg::new(executor), &KeyMaterial::new(key)).map_err(|cause| {
        let err = Error::cleanup(cause);
        error!("{}", err);
        if let Err(e) = host.set_failed(&err.to_string()) {
            warn!(error = %e, "unable to report failure to the runner");
        }
        err
    })
}

fn remove_key<E: Executor>(gpg: &Gpg<E>, key: &KeyMaterial) -> Result<()> {
    info!("Getting the fingerprint");
    let fingerprint = gpg.fingerprint(key)?;
    info!("Got the fingerprint");

    if !gpg.key_exists(&fingerprint) {
        info!("GPG key does not exist");
        return Ok(());
    }

    info!("Deleting the imported gpg key");
    gpg.delete_key(&fingerprint)?;
    info!("Successfully deleted the imported gpg key");
    Ok(())
}
