use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::webauthn::{EncodedClientData, HashAlgorithm};

/// <https://www.w3.org/TR/webauthn-2/#dictdef-tokenbinding>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBinding {
    /// "present" or "supported".
    pub status: String,
    pub id: String,
}

/// <https://www.w3.org/TR/webauthn-2/#dictionary-client-data>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientData {
    #[serde(rename = "type")]
    pub ceremony: String,
    pub challenge: String,
    pub origin: String,
    pub cross_origin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_binding: Option<TokenBinding>,
}

impl ClientData {
    pub fn get(challenge: &str, origin: &str) -> Self {
        Self {
            ceremony: crate::config::CEREMONY_GET.to_string(),
            challenge: challenge.to_string(),
            origin: origin.to_string(),
            cross_origin: false,
            token_binding: None,
        }
    }

    pub fn encode(&self) -> Result<EncodedClientData, serde_json::Error> {
        Ok(EncodedClientData {
            json: serde_json::to_vec(self)?,
            hash_algorithm: HashAlgorithm::Sha256,
        })
    }
}

impl EncodedClientData {
    /// The clientDataHash the authenticator signs over.
    pub fn hash(&self) -> [u8; 32] {
        match self.hash_algorithm {
            HashAlgorithm::Sha256 => Sha256::digest(&self.json).into(),
        }
    }
}

/// Assertion fields as a relying party would receive them, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateResponse {
    pub client_data: String,
    pub signature_data: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub authenticator_data: String,
}

impl AuthenticateResponse {
    pub fn new(client_data: &EncodedClientData, signature: &[u8], authenticator_data: &[u8]) -> Self {
        Self {
            client_data: STANDARD.encode(&client_data.json),
            signature_data: STANDARD.encode(signature),
            authenticator_data: STANDARD.encode(authenticator_data),
        }
    }
}
