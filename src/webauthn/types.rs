/// `HRESULT` returned by the platform service. Zero is success.
pub type HResult = i32;

pub const S_OK: HResult = 0;

/// Window that owns the platform's user-verification UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle(pub *mut std::ffi::c_void);

impl WindowHandle {
    pub fn null() -> Self {
        Self(std::ptr::null_mut())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetCredentialsOptions {
    /// Restrict the listing to one relying party. `None` lists everything.
    pub rp_id: Option<String>,
    pub browser_in_private_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserVerification {
    #[default]
    Any,
    Required,
    Preferred,
    Discouraged,
}

#[derive(Debug, Clone)]
pub struct GetAssertionOptions {
    pub timeout_ms: u32,
    pub user_verification: UserVerification,
    /// Credential ids the authenticator may use. Empty means any.
    pub allow_credentials: Vec<Vec<u8>>,
}

impl GetAssertionOptions {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            user_verification: UserVerification::Any,
            allow_credentials: Vec::new(),
        }
    }

    pub fn with_user_verification(mut self, uv: UserVerification) -> Self {
        self.user_verification = uv;
        self
    }

    pub fn allow(mut self, credential_id: &[u8]) -> Self {
        self.allow_credentials.push(credential_id.to_vec());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
}

impl HashAlgorithm {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
        }
    }
}

/// Serialized client data handed to the platform, which hashes it itself.
#[derive(Debug, Clone)]
pub struct EncodedClientData {
    pub json: Vec<u8>,
    pub hash_algorithm: HashAlgorithm,
}

// Views over platform-owned memory. Byte fields are borrowed from the
// owning list/assertion; text fields are decoded from UTF-16 and therefore
// owned.

#[derive(Debug, Clone)]
pub struct RpEntity {
    pub id: Option<String>,
    pub name: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserEntity<'a> {
    pub id: &'a [u8],
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CredentialDetails<'a> {
    pub credential_id: &'a [u8],
    pub rp: RpEntity,
    pub user: UserEntity<'a>,
    pub removable: bool,
    pub backed_up: bool,
}

#[derive(Debug, Clone)]
pub struct AssertionDetails<'a> {
    pub authenticator_data: &'a [u8],
    pub signature: &'a [u8],
    pub credential_id: &'a [u8],
    pub credential_type: Option<String>,
    pub user_id: &'a [u8],
    pub large_blob: &'a [u8],
    pub large_blob_status: u32,
}
