/*
 * Responsibility
 * - 認可ゲートが返す AuthError (kind / code / description / status) の定義
 * - IntoResponse 実装 (HTTP status + {"code", "description"} JSON body)
 */
use std::borrow::Cow;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Every way the gate can reject a request. Each kind maps to exactly one status and code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    HeaderMissing,
    HeaderMalformed,
    TokenMalformed,
    KeyNotFound,
    TokenExpired,
    ClaimsInvalid,
    TokenUnparseable,
    PermissionsClaimMissing,
    PermissionDenied,
}

impl AuthErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::HeaderMissing
            | Self::HeaderMalformed
            | Self::TokenMalformed
            | Self::TokenExpired
            | Self::ClaimsInvalid => StatusCode::UNAUTHORIZED,
            Self::KeyNotFound | Self::TokenUnparseable | Self::PermissionsClaimMissing => {
                StatusCode::BAD_REQUEST
            }
            Self::PermissionDenied => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::HeaderMissing => "authorization_header_missing",
            Self::HeaderMalformed => "authorization_header_invalid",
            Self::TokenMalformed => "token_malformed",
            Self::KeyNotFound => "key_not_found",
            Self::TokenExpired => "token_expired",
            Self::ClaimsInvalid => "invalid_claims",
            Self::TokenUnparseable => "token_unparseable",
            Self::PermissionsClaimMissing => "permissions_missing",
            Self::PermissionDenied => "permission_denied",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description} ({kind:?})")]
pub struct AuthError {
    kind: AuthErrorKind,
    description: Cow<'static, str>,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, description: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }

    pub fn header_missing() -> Self {
        Self::new(
            AuthErrorKind::HeaderMissing,
            "Authorization header is expected.",
        )
    }

    /// The route reached a claims-consuming handler without passing a permission gate.
    pub fn gate_not_applied() -> Self {
        Self::new(
            AuthErrorKind::HeaderMissing,
            "Authorization is not configured for this route.",
        )
    }

    pub fn header_malformed(description: &'static str) -> Self {
        Self::new(AuthErrorKind::HeaderMalformed, description)
    }

    pub fn token_malformed() -> Self {
        Self::new(AuthErrorKind::TokenMalformed, "Authorization malformed.")
    }

    pub fn key_not_found() -> Self {
        Self::new(
            AuthErrorKind::KeyNotFound,
            "Unable to find the appropriate key.",
        )
    }

    pub fn token_expired() -> Self {
        Self::new(AuthErrorKind::TokenExpired, "Token is expired.")
    }

    pub fn claims_invalid() -> Self {
        Self::new(
            AuthErrorKind::ClaimsInvalid,
            "Incorrect claims, check audience and issuer.",
        )
    }

    pub fn token_unparseable() -> Self {
        Self::new(
            AuthErrorKind::TokenUnparseable,
            "Unable to parse authentication token.",
        )
    }

    pub fn permissions_missing() -> Self {
        Self::new(
            AuthErrorKind::PermissionsClaimMissing,
            "Permissions not included in token.",
        )
    }

    pub fn permission_denied() -> Self {
        Self::new(
            AuthErrorKind::PermissionDenied,
            "Caller does not have the required permission.",
        )
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub code: &'static str,
    pub description: &'a str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            description: self.description(),
        };

        (self.status(), Json(body)).into_response()
    }
}
