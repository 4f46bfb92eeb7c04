/// Factory: build `AuthGate` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::AuthGate;
use crate::services::auth::jwks::{CachePolicy, HttpJwksSource, JwksCache, JwksError};

pub fn build_auth_gate(config: &Config) -> Result<Arc<AuthGate>, JwksError> {
    let source = HttpJwksSource::new(config.jwks.url.clone(), config.jwks.fetch_timeout)?;

    let keys = JwksCache::new(
        source,
        CachePolicy {
            ttl: config.jwks.cache_ttl,
            min_refresh_interval: config.jwks.min_refresh_interval,
        },
    );

    tracing::info!(
        jwks_url = %config.jwks.url,
        issuer = %config.auth.issuer,
        audience = %config.auth.audience,
        "auth gate configured"
    );

    Ok(Arc::new(AuthGate::new(Arc::new(keys), &config.auth)))
}
