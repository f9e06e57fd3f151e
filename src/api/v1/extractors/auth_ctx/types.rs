/*
 * Responsibility
 * - Handler-facing types for the authenticated caller
 * - The authenticator inserts AuthCtx into request extensions; handlers only read it
 *
 * Notes
 * - Token verification lives in services::auth; this module is the contract only
 * - AuthCtx lives in the request's Extensions, so it never outlives the request
 */
use axum::http::Extensions;
use serde::Serialize;
use serde_json::Value;

/// The authenticated Cognito user (by default: the verified claims payload).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CognitoUser(pub Value);

impl CognitoUser {
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.claim(name).and_then(Value::as_str)
    }

    pub fn sub(&self) -> Option<&str> {
        self.claim_str("sub")
    }

    pub fn username(&self) -> Option<&str> {
        self.claim_str("cognito:username")
            .or_else(|| self.claim_str("username"))
    }
}

/// Application identity mapped from the Cognito user, if the app configured a mapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CognitoIdentity(pub Value);

/// Attached to a request once it has been authenticated.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthCtx {
    pub user: CognitoUser,
    pub identity: Option<CognitoIdentity>,
}

impl AuthCtx {
    pub fn new(user: CognitoUser, identity: Option<CognitoIdentity>) -> Self {
        Self { user, identity }
    }
}

/// Current principal of the in-flight request, `None` outside an authenticated request.
pub fn current_user(extensions: &Extensions) -> Option<&CognitoUser> {
    extensions.get::<AuthCtx>().map(|ctx| &ctx.user)
}

/// Current secondary identity of the in-flight request.
pub fn current_identity(extensions: &Extensions) -> Option<&CognitoIdentity> {
    extensions
        .get::<AuthCtx>()
        .and_then(|ctx| ctx.identity.as_ref())
}
