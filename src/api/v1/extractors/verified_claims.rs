use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AuthError;
use crate::services::auth::Claims;

/// Handler で検証済み Claims を受け取るための extractor
///
/// `middleware::auth::permission::require` が Claims を request.extensions() に insert 済みである前提。
/// 見つからない場合 (ルートに permission gate が掛かっていない) は配線ミス。fail-closed で 401 を返す。
pub struct VerifiedClaims(pub Claims);

impl<S> FromRequestParts<S> for VerifiedClaims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(VerifiedClaims)
            .ok_or_else(|| {
                tracing::error!(path = %parts.uri.path(), "handler expects claims but no permission gate ran");
                AuthError::gate_not_applied()
            })
    }
}
