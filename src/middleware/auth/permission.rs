//! Permission gate for a single route: Bearer 検証 + permission チェック → Claims を extensions に入れる
//!
//! ```ignore
//! let route = permission::require(get(drinks_detail), state.auth.clone(), "get:drinks-detail");
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AuthError;
use crate::services::auth::AuthGate;

#[derive(Clone)]
struct RequiredPermission {
    gate: Arc<AuthGate>,
    permission: Arc<str>,
}

/// Wraps `route` so it only runs for callers whose token grants `permission`.
///
/// Uses `route_layer`, so unmatched methods still answer 405 instead of 401.
pub fn require<S>(
    route: MethodRouter<S>,
    gate: Arc<AuthGate>,
    permission: impl Into<Arc<str>>,
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let required = RequiredPermission {
        gate,
        permission: permission.into(),
    };

    route.route_layer(middleware::from_fn_with_state(required, permission_middleware))
}

async fn permission_middleware(
    State(required): State<RequiredPermission>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = match required
        .gate
        .authorize(req.headers(), &required.permission)
        .await
    {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                kind = ?err.kind(),
                code = err.code(),
                status = err.status().as_u16(),
                permission = %required.permission,
                method = %req.method(),
                path = %req.uri().path(),
                "request rejected by auth gate"
            );
            return Err(err);
        }
    };

    tracing::debug!(
        sub = claims.subject().unwrap_or("-"),
        permission = %required.permission,
        "request authorized"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
