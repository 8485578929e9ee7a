#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("WebAuthn: {0}")]
    Service(#[from] crate::webauthn::ServiceError),
    #[error("no platform credentials found")]
    NoCredentials,
    #[error("input closed before a credential was selected")]
    InputClosed,
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("client data: {0}")]
    ClientData(#[from] serde_json::Error),
    #[error("preflight: {0}")]
    Preflight(String),
    #[error("System library webauthn authentication is not supported on this platform")]
    Unsupported,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
