/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: route 単位の permission gate
 * - http: request-id / trace / body limit / timeout
 */
pub mod auth;
pub mod http;
