//! Cognito 認証ゲート: token 検証 → AuthCtx を extensions に入れる → handler へ
//!
//! Wrapped handlers only run when `CognitoAuth::authenticate` succeeds; any
//! failure is returned as `AuthError` and rendered by its `IntoResponse`.
//! Handlers that accept anonymous callers skip this layer and call
//! `authenticate` themselves.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AuthError;
use crate::services::auth::CognitoAuth;

/// Require authentication on every route already added to `router`.
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/me", get(me));
/// let protected = middleware::auth::required::apply(protected, state.auth.clone());
/// ```
pub fn apply<S>(router: Router<S>, auth: Arc<CognitoAuth>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // route_layer: unmatched paths still 404 instead of 401
    router.route_layer(middleware::from_fn_with_state(auth, require_auth))
}

pub async fn require_auth(
    State(auth): State<Arc<CognitoAuth>>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let (mut parts, body) = req.into_parts();

    // middleware → extractor への受け渡しは authenticate 内で extensions に insert 済み
    auth.authenticate(&mut parts).await?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
