use super::{
    AssertionDetails, CredentialDetails, EncodedClientData, GetAssertionOptions,
    GetCredentialsOptions, ServiceError, WebAuthnApi, WindowHandle,
};

/// Owned snapshot of the platform credential list. Released on drop.
pub struct CredentialList<'s, A: WebAuthnApi> {
    api: &'s A,
    raw: A::ListHandle,
}

impl<'s, A: WebAuthnApi> CredentialList<'s, A> {
    pub fn fetch(api: &'s A, options: &GetCredentialsOptions) -> Result<Self, ServiceError> {
        let raw = api
            .get_platform_credential_list(options)
            .map_err(|code| ServiceError::from_code(api, code))?;
        tracing::debug!("Platform credential list acquired");
        Ok(Self { api, raw })
    }

    /// Records in the order the platform returned them.
    pub fn credentials(&self) -> Vec<CredentialDetails<'_>> {
        self.api.credentials(&self.raw)
    }
}

impl<A: WebAuthnApi> Drop for CredentialList<'_, A> {
    fn drop(&mut self) {
        self.api.free_platform_credential_list(&self.raw);
        tracing::debug!("Platform credential list released");
    }
}

/// Owned assertion result. Released on drop.
pub struct Assertion<'s, A: WebAuthnApi> {
    api: &'s A,
    raw: A::AssertionHandle,
}

impl<'s, A: WebAuthnApi> Assertion<'s, A> {
    pub fn request(
        api: &'s A,
        window: WindowHandle,
        rp_id: &str,
        client_data: &EncodedClientData,
        options: &GetAssertionOptions,
    ) -> Result<Self, ServiceError> {
        let raw = api
            .get_assertion(window, rp_id, client_data, options)
            .map_err(|code| ServiceError::from_code(api, code))?;
        tracing::debug!(rp_id, "Assertion acquired");
        Ok(Self { api, raw })
    }

    pub fn details(&self) -> AssertionDetails<'_> {
        self.api.assertion(&self.raw)
    }
}

impl<A: WebAuthnApi> Drop for Assertion<'_, A> {
    fn drop(&mut self) {
        self.api.free_assertion(&self.raw);
        tracing::debug!("Assertion released");
    }
}
