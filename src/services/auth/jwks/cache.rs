use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use super::{Jwk, JwkSet, JwksError, JwksSource};

/// Key lookup used by the gate. `Ok(None)` means the set has no key for `kid`.
#[async_trait]
pub trait KeyResolver: Send + Sync + 'static {
    async fn resolve(&self, kid: &str) -> Result<Option<Jwk>, JwksError>;
}

#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    /// Snapshot lifetime. Zero refetches on every lookup.
    pub ttl: Duration,
    /// Floor between two fetches triggered by an unknown `kid` or a failed refresh.
    pub min_refresh_interval: Duration,
}

struct Snapshot {
    keys: JwkSet,
    fetched_at: Instant,
}

/// In-memory key-set cache in front of a `JwksSource`.
///
/// - fresh snapshot: served without touching the source
/// - stale snapshot: refreshed; if the refresh fails the stale keys keep being served
/// - unknown kid: one extra refresh, at most once per `min_refresh_interval`
///
/// Concurrent refreshes are coalesced: callers queue on `refresh` and the ones that
/// arrive after a successful fetch reuse its snapshot.
pub struct JwksCache<S> {
    source: S,
    policy: CachePolicy,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    // last failed fetch; also serializes refreshes
    refresh: Mutex<Option<Instant>>,
}

impl<S: JwksSource> JwksCache<S> {
    pub fn new(source: S, policy: CachePolicy) -> Self {
        Self {
            source,
            policy,
            snapshot: RwLock::new(None),
            refresh: Mutex::new(None),
        }
    }

    async fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().await.clone()
    }

    fn is_fresh(&self, snapshot: &Snapshot) -> bool {
        snapshot.fetched_at.elapsed() < self.policy.ttl
    }

    /// Fetches a new snapshot unless one newer than `seen` already landed while waiting.
    async fn refresh(&self, seen: Option<Instant>) -> Result<Arc<Snapshot>, JwksError> {
        let mut last_failure = self.refresh.lock().await;

        if let Some(current) = self.current().await
            && Some(current.fetched_at) != seen
        {
            return Ok(current);
        }

        if let Some(failed_at) = *last_failure
            && failed_at.elapsed() < self.policy.min_refresh_interval
        {
            return Err(JwksError::Backoff);
        }

        match self.source.fetch().await {
            Ok(keys) => {
                *last_failure = None;
                let snapshot = Arc::new(Snapshot {
                    keys,
                    fetched_at: Instant::now(),
                });
                *self.snapshot.write().await = Some(Arc::clone(&snapshot));
                tracing::info!(keys = snapshot.keys.len(), "jwks refreshed");
                Ok(snapshot)
            }
            Err(err) => {
                *last_failure = Some(Instant::now());
                Err(err)
            }
        }
    }

    async fn usable_snapshot(&self) -> Result<Arc<Snapshot>, JwksError> {
        let stale = match self.current().await {
            Some(snapshot) if self.is_fresh(&snapshot) => return Ok(snapshot),
            other => other,
        };

        match self.refresh(stale.as_ref().map(|s| s.fetched_at)).await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => match stale {
                Some(snapshot) => {
                    if !matches!(err, JwksError::Backoff) {
                        tracing::warn!(error = %err, "jwks refresh failed; serving stale keys");
                    }
                    Ok(snapshot)
                }
                None => Err(err),
            },
        }
    }
}

#[async_trait]
impl<S: JwksSource> KeyResolver for JwksCache<S> {
    async fn resolve(&self, kid: &str) -> Result<Option<Jwk>, JwksError> {
        let snapshot = self.usable_snapshot().await?;
        if let Some(key) = snapshot.keys.find(kid) {
            return Ok(Some(key.clone()));
        }

        // Unknown kid: the provider may have rotated keys since the last fetch.
        if snapshot.fetched_at.elapsed() < self.policy.min_refresh_interval {
            return Ok(None);
        }

        match self.refresh(Some(snapshot.fetched_at)).await {
            Ok(snapshot) => Ok(snapshot.keys.find(kid).cloned()),
            Err(err) => {
                tracing::warn!(error = %err, kid, "jwks refresh for unknown kid failed");
                Ok(None)
            }
        }
    }
}
