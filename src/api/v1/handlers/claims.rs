/*
 * Responsibility
 * - GET /api/v1/claims
 * - permission gate を通過した呼び出し元に、検証済み Claims をそのまま返す
 */
use axum::Json;

use crate::api::v1::extractors::VerifiedClaims;
use crate::services::auth::Claims;

pub async fn claims(VerifiedClaims(claims): VerifiedClaims) -> Json<Claims> {
    Json(claims)
}
