use std::io::{BufRead, Write};

use crate::client_data::{AuthenticateResponse, ClientData};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::webauthn::{
    Assertion, CredentialList, GetAssertionOptions, GetCredentialsOptions, UserVerification,
    WebAuthnApi,
};
use crate::{diagnostics, prompt, render};

/// One pass: list credentials, pick one, assert with it, print the result.
///
/// The credential list and the assertion are released on every return path,
/// including errors, by their guards.
pub fn run_probe<A, R, W>(api: &A, cfg: &Config, input: &mut R, out: &mut W) -> Result<()>
where
    A: WebAuthnApi,
    R: BufRead,
    W: Write,
{
    let version = diagnostics::check(api, cfg)?;
    tracing::info!(version, "WebAuthn API available");
    render::api_version(out, version)?;

    let list = CredentialList::fetch(api, &GetCredentialsOptions::default())?;
    let creds = list.credentials();
    tracing::info!(count = creds.len(), "Platform credentials listed");
    render::credential_list(out, &creds)?;
    if creds.is_empty() {
        return Err(Error::NoCredentials);
    }

    let index = prompt::select_index(input, out, creds.len())?;
    let cred = &creds[index];
    let rp_id = cred.rp.id.clone().unwrap_or_default();

    let client_data = ClientData::get(&cfg.challenge, &cfg.origin).encode()?;
    tracing::debug!(
        client_data_hash = %hex::encode(client_data.hash()),
        "Client data built"
    );
    let options = GetAssertionOptions::new(cfg.timeout_ms)
        .with_user_verification(UserVerification::Required)
        .allow(cred.credential_id);

    let window = api.foreground_window();
    tracing::info!(index, rp_id = %rp_id, timeout_ms = cfg.timeout_ms, "Requesting assertion");
    let assertion = Assertion::request(api, window, &rp_id, &client_data, &options)?;

    drop(creds);
    drop(list);

    let details = assertion.details();
    render::assertion(out, &details)?;
    if cfg.json {
        let response =
            AuthenticateResponse::new(&client_data, details.signature, details.authenticator_data);
        writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
    }
    out.flush()?;
    Ok(())
}
