pub mod client_data;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod probe;
pub mod prompt;
pub mod render;
pub mod webauthn;

pub use error::{Error, Result};

pub fn init_tracing(cfg: &config::Config) {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cfg.log_level()))
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cfg: config::Config) -> anyhow::Result<()> {
    init_tracing(&cfg);
    tracing::info!("Starting passkey-probe");
    probe_platform(&cfg)?;
    Ok(())
}

#[cfg(windows)]
fn probe_platform(cfg: &config::Config) -> Result<()> {
    let api = webauthn::windows::WindowsWebAuthn::load()?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    probe::run_probe(&api, cfg, &mut stdin.lock(), &mut stdout.lock())
}

#[cfg(not(windows))]
fn probe_platform(_cfg: &config::Config) -> Result<()> {
    Err(Error::Unsupported)
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform() {
        let err = probe_platform(&config::Config::default()).unwrap_err();
        assert!(matches!(err, Error::Unsupported));
        assert_eq!(
            err.to_string(),
            "System library webauthn authentication is not supported on this platform"
        );
    }
}
