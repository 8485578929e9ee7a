pub mod handle;
pub mod types;
#[cfg(windows)]
pub mod windows;

pub use handle::{Assertion, CredentialList};
pub use types::*;

/// A failed call into the platform authenticator service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name} ({code:#010X})")]
pub struct ServiceError {
    pub code: HResult,
    pub name: String,
}

impl ServiceError {
    pub fn from_code<A: WebAuthnApi + ?Sized>(api: &A, code: HResult) -> Self {
        Self {
            code,
            name: api.error_name(code),
        }
    }
}

/// The native WebAuthn surface the probe drives.
///
/// Handles returned by `get_platform_credential_list` and `get_assertion`
/// own platform memory and must be passed to the matching `free_*` exactly
/// once, after which they are never touched again. Callers should go
/// through [`CredentialList`] and [`Assertion`], which free on drop.
pub trait WebAuthnApi {
    type ListHandle;
    type AssertionHandle;

    fn api_version(&self) -> u32;

    fn get_platform_credential_list(
        &self,
        options: &GetCredentialsOptions,
    ) -> Result<Self::ListHandle, HResult>;

    fn credentials<'a>(&self, list: &'a Self::ListHandle) -> Vec<CredentialDetails<'a>>;

    fn free_platform_credential_list(&self, list: &Self::ListHandle);

    /// Window the platform should parent its verification prompt to.
    fn foreground_window(&self) -> WindowHandle;

    fn get_assertion(
        &self,
        window: WindowHandle,
        rp_id: &str,
        client_data: &EncodedClientData,
        options: &GetAssertionOptions,
    ) -> Result<Self::AssertionHandle, HResult>;

    fn assertion<'a>(&self, assertion: &'a Self::AssertionHandle) -> AssertionDetails<'a>;

    fn free_assertion(&self, assertion: &Self::AssertionHandle);

    fn error_name(&self, code: HResult) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = ServiceError {
            code: 0x8009_0027_u32 as i32,
            name: "NTE_INVALID_PARAMETER".into(),
        };
        assert_eq!(err.to_string(), "NTE_INVALID_PARAMETER (0x80090027)");
    }
}
