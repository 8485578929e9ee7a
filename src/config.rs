pub const CEREMONY_GET: &str = "webauthn.get";
pub const DEFAULT_CHALLENGE: &str = "aGVsbG8sIHdvcmxk";
pub const DEFAULT_ORIGIN: &str = "test.local";
pub const DEFAULT_TIMEOUT_MS: u32 = 1000;
/// First API version exposing `WebAuthNGetPlatformCredentialList`.
pub const MIN_API_VERSION: u32 = 4;

#[derive(clap::Parser, Debug, Clone)]
#[command(name = "passkey-probe", about = "List platform passkeys and test authentication with one")]
pub struct Config {
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Assertion timeout. Raise this when a real user has to interact with the prompt.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u32,
    /// Base64url challenge placed in the client data.
    #[arg(long, default_value = DEFAULT_CHALLENGE)]
    pub challenge: String,
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    pub origin: String,
    /// Also print the assertion as a base64 JSON authenticate response.
    #[arg(long)]
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: 0,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            challenge: DEFAULT_CHALLENGE.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
