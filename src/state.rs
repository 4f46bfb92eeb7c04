/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: AuthGate (JWKS cache を内包)
 *   - claims_permission: /api/v1/claims に要求する permission
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::services::auth::AuthGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthGate>,
    pub claims_permission: Arc<str>,
}

impl AppState {
    pub fn new(auth: Arc<AuthGate>, claims_permission: impl Into<Arc<str>>) -> Self {
        Self {
            auth,
            claims_permission: claims_permission.into(),
        }
    }
}
