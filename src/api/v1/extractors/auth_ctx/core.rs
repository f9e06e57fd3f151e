use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::error::AuthError;
use crate::services::auth::CognitoAuth;

use super::{AuthCtx, CognitoIdentity, CognitoUser};

/// Handler で認証済みユーザーを受け取るための extractor.
/// Requires the auth middleware (or a manual `authenticate`) to have run first;
/// otherwise rejects with `AuthorizationRequired`.
pub struct CurrentUser(pub CognitoUser);

/// Secondary identity of an authenticated request (`None` when no mapper produced one).
pub struct CurrentIdentity(pub Option<CognitoIdentity>);

fn auth_ctx<S>(parts: &Parts, state: &S) -> Result<AuthCtx, AuthError>
where
    Arc<CognitoAuth>: FromRef<S>,
{
    parts.extensions.get::<AuthCtx>().cloned().ok_or_else(|| {
        let auth = Arc::<CognitoAuth>::from_ref(state);
        let config = auth.config();
        AuthError::authorization_required(&config.header_label, &config.header_prefix)
    })
}

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<CognitoAuth>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        auth_ctx(parts, state).map(|ctx| CurrentUser(ctx.user))
    }
}

impl<S> FromRequestParts<S> for CurrentIdentity
where
    Arc<CognitoAuth>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        auth_ctx(parts, state).map(|ctx| CurrentIdentity(ctx.identity))
    }
}
