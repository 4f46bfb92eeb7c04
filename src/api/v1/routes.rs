/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - permission が必要なルートには middleware::auth::permission::require を掛ける
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::claims::claims;
use crate::middleware::auth::permission;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/claims",
        permission::require(
            get(claims),
            state.auth.clone(),
            state.claims_permission.clone(),
        ),
    )
}
