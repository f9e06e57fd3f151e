/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::required (Cognito 認証ゲート), cors, http (request-id / trace / timeout)
 */
pub mod auth;
pub mod cors;
pub mod http;
