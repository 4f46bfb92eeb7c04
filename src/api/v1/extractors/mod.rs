/*!
 * Request extractors for v1 handlers
 *
 * Public API:
 * - VerifiedClaims
 */

mod verified_claims;

pub use verified_claims::VerifiedClaims;
