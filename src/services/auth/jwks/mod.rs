//! Signing-key material for token verification.
//!
//! - `JwkSet` / `Jwk`: the published key-set document
//! - `JwksSource`: where a key set comes from (HTTP endpoint, fixed set)
//! - `KeyResolver` / `JwksCache`: kid -> key lookup with TTL + miss-triggered refresh

pub mod cache;
pub mod source;
pub mod types;

pub use cache::{CachePolicy, JwksCache, KeyResolver};
pub use source::{HttpJwksSource, JwksSource};
pub use types::{Jwk, JwkSet};

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("jwks request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("jwks endpoint returned status {0}")]
    Status(u16),

    #[error("jwks document has no 'keys' array")]
    MissingKeys,

    #[error("jwks document has no usable signing key")]
    NoUsableKeys,

    #[error("jwks refresh suppressed after a recent failure")]
    Backoff,
}
