use crate::config::{Config, DEFAULT_TIMEOUT_MS, MIN_API_VERSION};
use crate::error::{Error, Result};
use crate::webauthn::WebAuthnApi;

const INTERACTIVE_TIMEOUT_MS: u32 = 5_000;

/// How loudly to report a timeout too short for a human to answer the
/// platform prompt. The demo default is expected and only noted at info.
fn short_timeout_level(cfg: &Config) -> Option<tracing::Level> {
    if cfg.timeout_ms >= INTERACTIVE_TIMEOUT_MS {
        None
    } else if cfg.timeout_ms == DEFAULT_TIMEOUT_MS {
        Some(tracing::Level::INFO)
    } else {
        Some(tracing::Level::WARN)
    }
}

/// Check the platform and arguments before touching any credentials.
/// Returns the platform API version.
pub fn check<A: WebAuthnApi>(api: &A, cfg: &Config) -> Result<u32> {
    let mut errors: Vec<String> = Vec::new();

    // Check 1: credential listing available
    let version = api.api_version();
    if version < MIN_API_VERSION {
        errors.push(format!(
            "WebAuthn API version {version} does not support listing platform credentials \
             (need {MIN_API_VERSION} or later)\n  \
             → update Windows to a release that ships passkey management"
        ));
    }

    // Check 2: usable request values
    if cfg.timeout_ms == 0 {
        errors.push("--timeout-ms must be greater than zero".to_string());
    }
    if cfg.challenge.is_empty() {
        errors.push("--challenge must not be empty".to_string());
    }
    if cfg.origin.is_empty() {
        errors.push("--origin must not be empty".to_string());
    }

    match short_timeout_level(cfg) {
        Some(level) if level == tracing::Level::WARN => tracing::warn!(
            timeout_ms = cfg.timeout_ms,
            "Assertion timeout is too short for interactive verification; raise --timeout-ms"
        ),
        Some(_) => tracing::info!(
            timeout_ms = cfg.timeout_ms,
            "Using the demo assertion timeout; pass --timeout-ms for interactive verification"
        ),
        None => {}
    }

    if errors.is_empty() {
        return Ok(version);
    }

    for err in &errors {
        eprintln!("ERROR: {err}");
    }
    Err(Error::Preflight(format!("{} preflight check(s) failed", errors.len())))
}
