//! Credential acquisition
//!
//! One shared password for the whole fleet, asked for once per run.
//! VIGIL_PASSWORD is honored first so watch mode and scripts can run
//! without a TTY.

use anyhow::{Context, Result};
use vigil_common::Credential;

pub const PASSWORD_ENV: &str = "VIGIL_PASSWORD";

pub fn acquire_credential() -> Result<Credential> {
    if let Ok(secret) = std::env::var(PASSWORD_ENV) {
        if !secret.is_empty() {
            return Ok(Credential::new(secret));
        }
    }

    let secret = dialoguer::Password::new()
        .with_prompt("Fleet password")
        .interact()
        .context("failed to read password from terminal")?;
    Ok(Credential::new(secret))
}
