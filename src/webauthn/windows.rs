//! `webauthn.dll` backend.
//!
//! Entry points are resolved at run time: the credential-listing calls only
//! exist from API version 4, and a static import of a missing export would
//! keep the process from starting at all.
//!
//! See <https://learn.microsoft.com/en-us/windows/win32/api/webauthn/>.

use std::ptr;

use windows_sys::core::{PCSTR, PCWSTR};
use windows_sys::Win32::Foundation::{FreeLibrary, E_NOTIMPL, HMODULE, HWND};
use windows_sys::Win32::Networking::WindowsWebServices::{
    WEBAUTHN_ASSERTION, WEBAUTHN_AUTHENTICATOR_GET_ASSERTION_OPTIONS,
    WEBAUTHN_AUTHENTICATOR_GET_ASSERTION_OPTIONS_CURRENT_VERSION, WEBAUTHN_CLIENT_DATA,
    WEBAUTHN_CLIENT_DATA_CURRENT_VERSION, WEBAUTHN_CREDENTIAL, WEBAUTHN_CREDENTIALS,
    WEBAUTHN_CREDENTIAL_CURRENT_VERSION, WEBAUTHN_CREDENTIAL_DETAILS,
    WEBAUTHN_CREDENTIAL_DETAILS_LIST, WEBAUTHN_GET_CREDENTIALS_OPTIONS,
    WEBAUTHN_GET_CREDENTIALS_OPTIONS_CURRENT_VERSION, WEBAUTHN_USER_VERIFICATION_REQUIREMENT_ANY,
    WEBAUTHN_USER_VERIFICATION_REQUIREMENT_DISCOURAGED,
    WEBAUTHN_USER_VERIFICATION_REQUIREMENT_PREFERRED,
    WEBAUTHN_USER_VERIFICATION_REQUIREMENT_REQUIRED,
};
use windows_sys::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};
use windows_sys::Win32::UI::WindowsAndMessaging::GetForegroundWindow;

use super::{
    AssertionDetails, CredentialDetails, EncodedClientData, GetAssertionOptions,
    GetCredentialsOptions, HResult, RpEntity, UserEntity, UserVerification, WebAuthnApi,
    WindowHandle, S_OK,
};
use crate::error::{Error, Result};

type GetApiVersionNumberFn = unsafe extern "system" fn() -> u32;
type GetPlatformCredentialListFn = unsafe extern "system" fn(
    *const WEBAUTHN_GET_CREDENTIALS_OPTIONS,
    *mut *mut WEBAUTHN_CREDENTIAL_DETAILS_LIST,
) -> HResult;
type FreePlatformCredentialListFn =
    unsafe extern "system" fn(*const WEBAUTHN_CREDENTIAL_DETAILS_LIST);
type AuthenticatorGetAssertionFn = unsafe extern "system" fn(
    HWND,
    PCWSTR,
    *const WEBAUTHN_CLIENT_DATA,
    *const WEBAUTHN_AUTHENTICATOR_GET_ASSERTION_OPTIONS,
    *mut *mut WEBAUTHN_ASSERTION,
) -> HResult;
type FreeAssertionFn = unsafe extern "system" fn(*const WEBAUTHN_ASSERTION);
type GetErrorNameFn = unsafe extern "system" fn(HResult) -> PCWSTR;

/// `webauthn.dll` exports; `None` where this Windows release lacks them.
#[derive(Default, Clone, Copy)]
pub(crate) struct EntryPoints {
    get_api_version_number: Option<GetApiVersionNumberFn>,
    get_platform_credential_list: Option<GetPlatformCredentialListFn>,
    free_platform_credential_list: Option<FreePlatformCredentialListFn>,
    authenticator_get_assertion: Option<AuthenticatorGetAssertionFn>,
    free_assertion: Option<FreeAssertionFn>,
    get_error_name: Option<GetErrorNameFn>,
}

/// Look up `name` (NUL-terminated) and reinterpret it as `F`, which must be
/// the export's real `extern "system"` fn pointer type.
unsafe fn resolve<F: Copy>(module: HMODULE, name: &[u8]) -> Option<F> {
    debug_assert_eq!(name.last(), Some(&0));
    let proc = GetProcAddress(module, name.as_ptr() as PCSTR)?;
    Some(std::mem::transmute_copy(&proc))
}

impl EntryPoints {
    unsafe fn load(module: HMODULE) -> Self {
        Self {
            get_api_version_number: resolve(module, b"WebAuthNGetApiVersionNumber\0"),
            get_platform_credential_list: resolve(module, b"WebAuthNGetPlatformCredentialList\0"),
            free_platform_credential_list: resolve(module, b"WebAuthNFreePlatformCredentialList\0"),
            authenticator_get_assertion: resolve(module, b"WebAuthNAuthenticatorGetAssertion\0"),
            free_assertion: resolve(module, b"WebAuthNFreeAssertion\0"),
            get_error_name: resolve(module, b"WebAuthNGetErrorName\0"),
        }
    }
}

const CREDENTIAL_TYPE_PUBLIC_KEY: &str = "public-key";

pub struct WindowsWebAuthn {
    module: HMODULE,
    fns: EntryPoints,
}

impl WindowsWebAuthn {
    pub fn load() -> Result<Self> {
        let name = to_wide("webauthn.dll");
        let module = unsafe { LoadLibraryW(name.as_ptr()) };
        if module.is_null() {
            return Err(Error::Preflight(
                "webauthn.dll not found; this Windows release has no WebAuthn API".to_string(),
            ));
        }
        let fns = unsafe { EntryPoints::load(module) };
        tracing::debug!(
            credential_listing = fns.get_platform_credential_list.is_some(),
            "webauthn.dll loaded"
        );
        Ok(Self { module, fns })
    }

    #[cfg(test)]
    pub(crate) fn with_entry_points(fns: EntryPoints) -> Self {
        Self { module: ptr::null_mut(), fns }
    }
}

impl Drop for WindowsWebAuthn {
    fn drop(&mut self) {
        if !self.module.is_null() {
            unsafe { FreeLibrary(self.module) };
        }
    }
}

pub struct RawCredentialList(*mut WEBAUTHN_CREDENTIAL_DETAILS_LIST);

pub struct RawAssertion(*mut WEBAUTHN_ASSERTION);

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Decode a NUL-terminated UTF-16 string owned by the platform.
unsafe fn from_wide(p: PCWSTR) -> Option<String> {
    if p.is_null() {
        return None;
    }
    let mut len = 0usize;
    while *p.add(len) != 0 {
        len += 1;
    }
    Some(String::from_utf16_lossy(std::slice::from_raw_parts(p, len)))
}

/// `from_raw_parts` rejects null even for empty slices; the platform hands
/// out null pointers for absent fields.
unsafe fn slice<'a, T>(p: *const T, len: u32) -> &'a [T] {
    if p.is_null() || len == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(p, len as usize)
    }
}

unsafe fn credential_view(cred: &WEBAUTHN_CREDENTIAL_DETAILS) -> CredentialDetails<'_> {
    let rp = match cred.pRpInformation.as_ref() {
        Some(rp) => RpEntity {
            id: from_wide(rp.pwszId),
            name: from_wide(rp.pwszName),
            icon: from_wide(rp.pwszIcon),
        },
        None => RpEntity { id: None, name: None, icon: None },
    };
    let user = match cred.pUserInformation.as_ref() {
        Some(user) => UserEntity {
            id: slice(user.pbId, user.cbId),
            name: from_wide(user.pwszName),
            display_name: from_wide(user.pwszDisplayName),
            icon: from_wide(user.pwszIcon),
        },
        None => UserEntity { id: &[], name: None, display_name: None, icon: None },
    };
    CredentialDetails {
        credential_id: slice(cred.pbCredentialID, cred.cbCredentialID),
        rp,
        user,
        removable: cred.bRemovable != 0,
        backed_up: cred.bBackedUp != 0,
    }
}

fn user_verification_code(uv: UserVerification) -> u32 {
    match uv {
        UserVerification::Any => WEBAUTHN_USER_VERIFICATION_REQUIREMENT_ANY,
        UserVerification::Required => WEBAUTHN_USER_VERIFICATION_REQUIREMENT_REQUIRED,
        UserVerification::Preferred => WEBAUTHN_USER_VERIFICATION_REQUIREMENT_PREFERRED,
        UserVerification::Discouraged => WEBAUTHN_USER_VERIFICATION_REQUIREMENT_DISCOURAGED,
    }
}

impl WebAuthnApi for WindowsWebAuthn {
    type ListHandle = RawCredentialList;
    type AssertionHandle = RawAssertion;

    fn api_version(&self) -> u32 {
        match self.fns.get_api_version_number {
            Some(f) => unsafe { f() },
            None => 0,
        }
    }

    fn get_platform_credential_list(
        &self,
        options: &GetCredentialsOptions,
    ) -> Result<RawCredentialList, HResult> {
        let Some(list_fn) = self.fns.get_platform_credential_list else {
            return Err(E_NOTIMPL);
        };
        let rp_id = options.rp_id.as_deref().map(to_wide);
        let raw_options = WEBAUTHN_GET_CREDENTIALS_OPTIONS {
            dwVersion: WEBAUTHN_GET_CREDENTIALS_OPTIONS_CURRENT_VERSION,
            pwszRpId: rp_id.as_ref().map_or(ptr::null(), |w| w.as_ptr()),
            bBrowserInPrivateMode: options.browser_in_private_mode.into(),
        };
        let mut list: *mut WEBAUTHN_CREDENTIAL_DETAILS_LIST = ptr::null_mut();
        let hr = unsafe { list_fn(&raw_options, &mut list) };
        if hr != S_OK {
            return Err(hr);
        }
        Ok(RawCredentialList(list))
    }

    fn credentials<'a>(&self, list: &'a RawCredentialList) -> Vec<CredentialDetails<'a>> {
        // SAFETY: the list stays valid until `free_platform_credential_list`,
        // which cannot run while `list` is borrowed.
        unsafe {
            let Some(list) = list.0.cast_const().as_ref() else {
                return Vec::new();
            };
            let entries = slice(list.ppCredentialDetails.cast_const(), list.cCredentialDetails);
            let creds: Vec<CredentialDetails<'a>> = entries
                .iter()
                .filter_map(|p| p.cast_const().as_ref())
                .map(|cred| credential_view(cred))
                .collect();
            if creds.len() != entries.len() {
                tracing::debug!(
                    reported = list.cCredentialDetails,
                    skipped = entries.len() - creds.len(),
                    "Skipped null credential entries"
                );
            }
            creds
        }
    }

    fn free_platform_credential_list(&self, list: &RawCredentialList) {
        if let (false, Some(free)) = (list.0.is_null(), self.fns.free_platform_credential_list) {
            unsafe { free(list.0) };
        }
    }

    fn foreground_window(&self) -> WindowHandle {
        WindowHandle(unsafe { GetForegroundWindow() })
    }

    fn get_assertion(
        &self,
        window: WindowHandle,
        rp_id: &str,
        client_data: &EncodedClientData,
        options: &GetAssertionOptions,
    ) -> Result<RawAssertion, HResult> {
        let Some(get_assertion) = self.fns.authenticator_get_assertion else {
            return Err(E_NOTIMPL);
        };
        let rp_id = to_wide(rp_id);
        let hash_alg = to_wide(client_data.hash_algorithm.id());
        let cred_type = to_wide(CREDENTIAL_TYPE_PUBLIC_KEY);

        // The C structs take mutable pointers; keep owned copies alive for
        // the duration of the call.
        let mut json = client_data.json.clone();
        let mut allow_ids = options.allow_credentials.clone();
        let mut allow: Vec<WEBAUTHN_CREDENTIAL> = allow_ids
            .iter_mut()
            .map(|id| WEBAUTHN_CREDENTIAL {
                dwVersion: WEBAUTHN_CREDENTIAL_CURRENT_VERSION,
                cbId: id.len() as u32,
                pbId: id.as_mut_ptr(),
                pwszCredentialType: cred_type.as_ptr(),
            })
            .collect();

        let raw_client_data = WEBAUTHN_CLIENT_DATA {
            dwVersion: WEBAUTHN_CLIENT_DATA_CURRENT_VERSION,
            cbClientDataJSON: json.len() as u32,
            pbClientDataJSON: json.as_mut_ptr(),
            pwszHashAlgId: hash_alg.as_ptr(),
        };

        // SAFETY: all-zero is the documented "unset" value for every field.
        let mut raw_options: WEBAUTHN_AUTHENTICATOR_GET_ASSERTION_OPTIONS =
            unsafe { std::mem::zeroed() };
        raw_options.dwVersion = WEBAUTHN_AUTHENTICATOR_GET_ASSERTION_OPTIONS_CURRENT_VERSION;
        raw_options.dwTimeoutMilliseconds = options.timeout_ms;
        raw_options.dwUserVerificationRequirement =
            user_verification_code(options.user_verification);
        raw_options.CredentialList = WEBAUTHN_CREDENTIALS {
            cCredentials: allow.len() as u32,
            pCredentials: if allow.is_empty() {
                ptr::null_mut()
            } else {
                allow.as_mut_ptr()
            },
        };

        let mut assertion: *mut WEBAUTHN_ASSERTION = ptr::null_mut();
        let hr = unsafe {
            get_assertion(
                window.0,
                rp_id.as_ptr(),
                &raw_client_data,
                &raw_options,
                &mut assertion,
            )
        };
        if hr != S_OK {
            return Err(hr);
        }
        Ok(RawAssertion(assertion))
    }

    fn assertion<'a>(&self, assertion: &'a RawAssertion) -> AssertionDetails<'a> {
        // SAFETY: valid until `free_assertion`, see `credentials`.
        unsafe {
            let Some(a) = assertion.0.cast_const().as_ref() else {
                return AssertionDetails {
                    authenticator_data: &[],
                    signature: &[],
                    credential_id: &[],
                    credential_type: None,
                    user_id: &[],
                    large_blob: &[],
                    large_blob_status: 0,
                };
            };
            AssertionDetails {
                authenticator_data: slice(a.pbAuthenticatorData, a.cbAuthenticatorData),
                signature: slice(a.pbSignature, a.cbSignature),
                credential_id: slice(a.Credential.pbId, a.Credential.cbId),
                credential_type: from_wide(a.Credential.pwszCredentialType),
                user_id: slice(a.pbUserId, a.cbUserId),
                large_blob: slice(a.pbCredLargeBlob, a.cbCredLargeBlob),
                large_blob_status: a.dwCredLargeBlobStatus,
            }
        }
    }

    fn free_assertion(&self, assertion: &RawAssertion) {
        if let (false, Some(free)) = (assertion.0.is_null(), self.fns.free_assertion) {
            unsafe { free(assertion.0) };
        }
    }

    fn error_name(&self, code: HResult) -> String {
        self.fns
            .get_error_name
            .and_then(|f| unsafe { from_wide(f(code)) })
            .unwrap_or_else(|| format!("HRESULT {code:#010X}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_exports_fail_soft() {
        let api = WindowsWebAuthn::with_entry_points(EntryPoints::default());
        assert_eq!(api.api_version(), 0);
        assert!(matches!(
            api.get_platform_credential_list(&GetCredentialsOptions::default()),
            Err(E_NOTIMPL)
        ));
        assert_eq!(api.error_name(E_NOTIMPL), "HRESULT 0x80004001");
    }

    #[test]
    fn test_old_dll_fails_preflight_before_listing() {
        let api = WindowsWebAuthn::with_entry_points(EntryPoints::default());
        let res = crate::diagnostics::check(&api, &crate::config::Config::default());
        assert!(matches!(res, Err(Error::Preflight(_))));
    }

    #[test]
    fn test_null_entries_are_skipped() {
        let mut cred_id = [0x01u8, 0x02];
        let mut details: WEBAUTHN_CREDENTIAL_DETAILS = unsafe { std::mem::zeroed() };
        details.cbCredentialID = cred_id.len() as u32;
        details.pbCredentialID = cred_id.as_mut_ptr();
        details.bRemovable = 1;

        let mut entries = [ptr::null_mut(), &mut details as *mut WEBAUTHN_CREDENTIAL_DETAILS];
        let mut raw = WEBAUTHN_CREDENTIAL_DETAILS_LIST {
            cCredentialDetails: entries.len() as u32,
            ppCredentialDetails: entries.as_mut_ptr(),
        };
        let list = RawCredentialList(&mut raw);

        let api = WindowsWebAuthn::with_entry_points(EntryPoints::default());
        let creds = api.credentials(&list);
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].credential_id, &[0x01, 0x02]);
        assert!(creds[0].removable);
        assert!(creds[0].rp.id.is_none());
    }
}
