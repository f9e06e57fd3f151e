/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: CognitoAuth (AuthConfig + verifier + mappers)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use axum::extract::FromRef;

use crate::services::auth::CognitoAuth;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<CognitoAuth>,
}

impl AppState {
    pub fn new(auth: Arc<CognitoAuth>) -> Self {
        Self { auth }
    }
}

impl FromRef<AppState> for Arc<CognitoAuth> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
