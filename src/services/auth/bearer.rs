//! `Authorization: Bearer <token>` header extraction.

use axum::http::{HeaderMap, HeaderValue, header};

use crate::error::AuthError;

/// Returns the raw token carried by the `Authorization` header.
///
/// - no header (or an empty / whitespace-only value) => `HeaderMissing`
/// - scheme other than `Bearer` (case-insensitive) => `HeaderMalformed`
/// - `Bearer` alone, or more than two whitespace-separated parts => `HeaderMalformed`
/// - a token with bytes outside visible ASCII => `HeaderMalformed`
pub fn token_from_headers(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .map(HeaderValue::as_bytes)
        .filter(|v| !v.trim_ascii().is_empty())
        .ok_or_else(AuthError::header_missing)?;

    token_from_value(value)
}

// header value は obs-text (0x80..) を含み得るので bytes のまま分割する
fn token_from_value(value: &[u8]) -> Result<&str, AuthError> {
    let mut parts = value
        .split(u8::is_ascii_whitespace)
        .filter(|part| !part.is_empty());

    let scheme = parts.next().ok_or_else(AuthError::header_missing)?;
    if !scheme.eq_ignore_ascii_case(b"bearer") {
        return Err(AuthError::header_malformed(
            "Authorization header must start with 'Bearer'.",
        ));
    }

    let token = parts
        .next()
        .ok_or_else(|| AuthError::header_malformed("Missing token."))?;

    if parts.next().is_some() {
        return Err(AuthError::header_malformed(
            "Authorization header must be a bearer token.",
        ));
    }

    std::str::from_utf8(token)
        .ok()
        .filter(|token| token.is_ascii())
        .ok_or_else(|| AuthError::header_malformed("Authorization header must be a bearer token."))
}
