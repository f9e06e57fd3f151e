use std::fmt;
use std::sync::Arc;

use axum::http::HeaderMap;
use axum::http::request::Parts;
use serde_json::Value;

use crate::api::v1::extractors::{AuthCtx, CognitoIdentity, CognitoUser};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::services::auth::claims::Claims;
use crate::services::auth::extractor::extract_token;
use crate::services::auth::verifier::{TokenVerifier, VerifyParams};

/// Claims -> principal.
pub type PrincipalMapper = Arc<dyn Fn(&Claims) -> Value + Send + Sync>;
/// Claims -> application identity.
pub type IdentityMapper = Arc<dyn Fn(&Claims) -> Option<Value> + Send + Sync>;

/// Request authenticator: header -> token -> verified claims -> AuthCtx.
///
/// The same `authenticate` backs both the mandatory gate
/// (`middleware::auth::required`) and handlers that accept anonymous callers
/// and authenticate on demand.
#[derive(Clone)]
pub struct CognitoAuth {
    config: Arc<AuthConfig>,
    verifier: Arc<dyn TokenVerifier>,
    principal_mapper: PrincipalMapper,
    identity_mapper: IdentityMapper,
}

impl fmt::Debug for CognitoAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CognitoAuth")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CognitoAuth {
    pub fn new(config: AuthConfig, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            config: Arc::new(config),
            verifier,
            principal_mapper: Arc::new(Claims::to_value),
            identity_mapper: Arc::new(|_: &Claims| None),
        }
    }

    pub fn with_principal_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&Claims) -> Value + Send + Sync + 'static,
    {
        self.principal_mapper = Arc::new(mapper);
        self
    }

    pub fn with_identity_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&Claims) -> Option<Value> + Send + Sync + 'static,
    {
        self.identity_mapper = Arc::new(mapper);
        self
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Authenticate the request and attach the result to its extensions.
    ///
    /// Running it again on the same request re-verifies and replaces the
    /// attached context.
    pub async fn authenticate(&self, parts: &mut Parts) -> Result<AuthCtx, AuthError> {
        let ctx = self.verify_headers(&parts.headers).await?;
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }

    /// Authenticate from headers alone, without touching request state.
    pub async fn verify_headers(&self, headers: &HeaderMap) -> Result<AuthCtx, AuthError> {
        let token = extract_token(headers, &self.config)?;

        if token.is_empty() {
            return Err(AuthError::authorization_required(
                &self.config.header_label,
                &self.config.header_prefix,
            ));
        }

        let params = VerifyParams::from_config(&self.config);
        let claims = self
            .verifier
            .verify(token, &params)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "cognito token verification failed");
                AuthError::invalid_token(err.to_string())
            })?;

        tracing::debug!(
            sub = claims.sub().unwrap_or("-"),
            username = claims.username().unwrap_or("-"),
            expires_at = ?claims.expires_at(),
            "cognito user authenticated"
        );

        let user = CognitoUser((self.principal_mapper)(&claims));
        let identity = (self.identity_mapper)(&claims).map(CognitoIdentity);

        Ok(AuthCtx::new(user, identity))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::http::{HeaderValue, Request, header};
    use serde_json::json;

    use super::*;
    use crate::api::v1::extractors::{current_identity, current_user};
    use crate::error::AuthErrorKind;
    use crate::services::auth::verifier::VerificationError;

    /// Accepts `good-token`, rejects anything else with a fixed message.
    struct StubVerifier {
        calls: AtomicUsize,
    }

    impl StubVerifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    fn payload() -> Claims {
        serde_json::from_value(json!({
            "sub": "user-1",
            "cognito:username": "alice",
            "token_use": "id",
        }))
        .unwrap()
    }

    #[async_trait]
    impl TokenVerifier for StubVerifier {
        async fn verify(
            &self,
            token: &str,
            params: &VerifyParams<'_>,
        ) -> Result<Claims, VerificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(params.region, "eu-west-1");
            assert_eq!(params.user_pool_id, "eu-west-1_pool");
            assert_eq!(params.app_client_id, "client");
            assert!(!params.skip_expiration_check);

            match token {
                "good-token" => Ok(payload()),
                _ => Err(VerificationError::Expired),
            }
        }
    }

    fn auth(verifier: Arc<StubVerifier>) -> CognitoAuth {
        let config = AuthConfig::new("eu-west-1", "eu-west-1_pool", "client").unwrap();
        CognitoAuth::new(config, verifier)
    }

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn attaches_claims_as_principal() {
        let auth = auth(StubVerifier::new());
        let mut parts = parts(Some("Bearer good-token"));

        let ctx = auth.authenticate(&mut parts).await.unwrap();

        assert_eq!(ctx.user.0, payload().to_value());
        assert_eq!(current_user(&parts.extensions), Some(&ctx.user));
        assert_eq!(current_identity(&parts.extensions), None);
    }

    #[tokio::test]
    async fn verification_failure_keeps_message_verbatim() {
        let auth = auth(StubVerifier::new());
        let mut parts = parts(Some("Bearer bad-token"));

        let err = auth.authenticate(&mut parts).await.unwrap_err();

        assert_eq!(err.kind(), AuthErrorKind::InvalidToken);
        assert_eq!(err.status().as_u16(), 401);
        assert_eq!(err.description(), "Token is expired");
        assert!(current_user(&parts.extensions).is_none());
    }

    #[tokio::test]
    async fn extraction_failure_skips_verifier() {
        let verifier = StubVerifier::new();
        let auth = auth(verifier.clone());
        let mut parts = parts(Some("Bearer a b"));

        let err = auth.authenticate(&mut parts).await.unwrap_err();

        assert_eq!(err.kind(), AuthErrorKind::InvalidHeader);
        assert_eq!(err.description(), "Token contains spaces");
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_header_is_invalid_header() {
        let auth = auth(StubVerifier::new());
        let mut parts = parts(None);

        let err = auth.authenticate(&mut parts).await.unwrap_err();

        assert_eq!(err.kind(), AuthErrorKind::InvalidHeader);
        assert_eq!(err.description(), "missing header");
    }

    #[tokio::test]
    async fn authenticating_twice_yields_same_principal() {
        let verifier = StubVerifier::new();
        let auth = auth(verifier.clone());
        let mut parts = parts(Some("Bearer good-token"));

        let first = auth.authenticate(&mut parts).await.unwrap();
        let second = auth.authenticate(&mut parts).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(current_user(&parts.extensions), Some(&first.user));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn custom_mappers_shape_principal_and_identity() {
        let auth = auth(StubVerifier::new())
            .with_principal_mapper(|claims| json!({ "id": claims.sub() }))
            .with_identity_mapper(|claims| {
                claims.username().map(|name| json!({ "account": name }))
            });
        let mut parts = parts(Some("Bearer good-token"));

        auth.authenticate(&mut parts).await.unwrap();

        assert_eq!(
            current_user(&parts.extensions).unwrap().0,
            json!({ "id": "user-1" })
        );
        assert_eq!(
            current_identity(&parts.extensions).unwrap().0,
            json!({ "account": "alice" })
        );
    }

    #[tokio::test]
    async fn verify_headers_does_not_touch_extensions() {
        let auth = auth(StubVerifier::new());
        let parts = parts(Some("Bearer good-token"));

        let ctx = auth.verify_headers(&parts.headers).await.unwrap();

        assert_eq!(ctx.user.username(), Some("alice"));
        assert!(parts.extensions.get::<AuthCtx>().is_none());
    }
}
