use std::sync::Arc;

use axum::http::HeaderMap;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, Validation, errors::ErrorKind};
use serde_json::Value;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::services::auth::bearer;
use crate::services::auth::claims::Claims;
use crate::services::auth::jwks::{Jwk, KeyResolver};

/// Bearer-token authorization gate.
///
/// `authorize` runs four stages, each terminal on failure:
/// header extraction -> key resolution -> signature/claims verification -> permission check.
///
/// Holds no per-request state; share it behind `Arc`.
pub struct AuthGate {
    keys: Arc<dyn KeyResolver>,
    validation: Validation,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(keys: Arc<dyn KeyResolver>, config: &AuthConfig) -> Self {
        let primary = config
            .algorithms
            .first()
            .copied()
            .unwrap_or(Algorithm::RS256);

        let mut validation = Validation::new(primary);
        validation.algorithms = config.algorithms.clone();
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        validation.validate_nbf = true;
        validation.leeway = config.leeway_seconds;

        Self { keys, validation }
    }

    /// Validates the request's bearer token and checks `required` against its permissions.
    ///
    /// On success the verified claims are returned for the protected operation.
    pub async fn authorize(&self, headers: &HeaderMap, required: &str) -> Result<Claims, AuthError> {
        let token = bearer::token_from_headers(headers)?;
        let claims = self.verify_decode(token).await?;
        claims.check_permission(required)?;

        Ok(claims)
    }

    /// Resolves the signing key named by the token's `kid` and verifies the token with it.
    pub async fn verify_decode(&self, token: &str) -> Result<Claims, AuthError> {
        let kid = key_id(token)?;
        let key = self.resolve_key(&kid).await;

        self.verify_with(token, key.as_ref())
    }

    // A kid without a matching key is not rejected here; `verify_with` reports it as KeyNotFound.
    async fn resolve_key(&self, kid: &str) -> Option<Jwk> {
        match self.keys.resolve(kid).await {
            Ok(Some(key)) => Some(key),
            Ok(None) => {
                tracing::debug!(kid, "no signing key matches token kid");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, kid, "signing key set unavailable");
                None
            }
        }
    }

    fn verify_with(&self, token: &str, key: Option<&Jwk>) -> Result<Claims, AuthError> {
        let key = key.ok_or_else(AuthError::key_not_found)?;

        let decoding_key = key.decoding_key().map_err(|e| {
            tracing::warn!(error = %e, kid = %key.kid, "unusable signing key material");
            AuthError::token_unparseable()
        })?;

        let data = jsonwebtoken::decode::<Claims>(token, &decoding_key, &self.validation)
            .map_err(classify)?;

        Ok(data.claims)
    }
}

/// Reads `kid` from the unverified header segment.
///
/// Only the segment's JSON is inspected here; `alg` and the rest of the header are
/// left to `jsonwebtoken::decode`, so an unsupported algorithm surfaces as unparseable.
fn key_id(token: &str) -> Result<String, AuthError> {
    let segment = token.split('.').next().unwrap_or(token);

    let header: Value = URL_SAFE_NO_PAD
        .decode(segment)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or_else(|| {
            tracing::debug!("undecodable token header");
            AuthError::token_malformed()
        })?;

    header
        .get("kid")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(AuthError::token_malformed)
}

fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::token_expired(),
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::claims_invalid(),
        _ => {
            tracing::debug!(error = %err, "token verification failed");
            AuthError::token_unparseable()
        }
    }
}
