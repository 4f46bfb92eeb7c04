use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::JwksError;

/// One RSA public key as published in a JWK Set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: String,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    pub n: String,
    pub e: String,
}

impl Jwk {
    pub fn decoding_key(&self) -> Result<DecodingKey, jsonwebtoken::errors::Error> {
        DecodingKey::from_rsa_components(&self.n, &self.e)
    }

    fn is_signing_key(&self) -> bool {
        self.kty == "RSA" && self.key_use.as_deref().is_none_or(|u| u == "sig")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    pub fn new(keys: Vec<Jwk>) -> Self {
        Self { keys }
    }

    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid == kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Parses a `{"keys": [...]}` document, keeping only RSA signing keys.
    ///
    /// Entries that are not usable (other key types, encryption keys, missing fields)
    /// are skipped instead of failing the whole set.
    pub fn from_value(value: Value) -> Result<Self, JwksError> {
        let Some(Value::Array(entries)) = value.get("keys") else {
            return Err(JwksError::MissingKeys);
        };

        let keys: Vec<Jwk> = entries
            .iter()
            .filter_map(|entry| match serde_json::from_value::<Jwk>(entry.clone()) {
                Ok(jwk) if jwk.is_signing_key() => Some(jwk),
                Ok(jwk) => {
                    tracing::debug!(kid = %jwk.kid, kty = %jwk.kty, "ignoring non-signing JWK");
                    None
                }
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring malformed JWK");
                    None
                }
            })
            .collect();

        if keys.is_empty() {
            return Err(JwksError::NoUsableKeys);
        }
        Ok(Self::new(keys))
    }
}
