//! Cognito user-pool authentication for axum.
//!
//! `CognitoAuth` extracts the bearer token from the configured header,
//! verifies it against the pool's JWKS and attaches the caller to the
//! request extensions, where `CurrentUser` / `current_user` read it back.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use api::v1::extractors::{
    AuthCtx, CognitoIdentity, CognitoUser, CurrentIdentity, CurrentUser, current_identity,
    current_user,
};
pub use config::{AuthConfig, Config, ConfigError};
pub use error::{AuthError, AuthErrorKind};
pub use services::auth::{
    Claims, CognitoAuth, CognitoVerifier, JwksCache, TokenVerifier, VerificationError, VerifyParams,
};
