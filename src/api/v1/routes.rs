/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health: public, /greeting: optional auth, /me: auth required
 * - Cognito 認証が必須な範囲はここで route_layer として適用する
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{greeting::greeting, health::health, me::me};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route("/me", get(me));
    let protected = middleware::auth::required::apply(protected, state.auth.clone());

    Router::new()
        .route("/health", get(health))
        .route("/greeting", get(greeting))
        .merge(protected)
}
