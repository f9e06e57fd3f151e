use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::config::{AuthConfig, MAX_TOKEN_LEEWAY_SECONDS, issuer_url};
use crate::services::auth::claims::{Claims, TokenUse};
use crate::services::auth::jwks::{JwksCache, JwksError};

/// User-pool coordinates handed to a verifier for one call.
#[derive(Debug, Clone, Copy)]
pub struct VerifyParams<'a> {
    pub region: &'a str,
    pub user_pool_id: &'a str,
    pub app_client_id: &'a str,
    pub skip_expiration_check: bool,
}

impl<'a> VerifyParams<'a> {
    pub fn from_config(config: &'a AuthConfig) -> Self {
        Self {
            region: &config.region,
            user_pool_id: &config.user_pool_id,
            app_client_id: &config.app_client_id,
            skip_expiration_check: !config.check_expiration,
        }
    }

    pub fn issuer(&self) -> String {
        issuer_url(self.region, self.user_pool_id)
    }
}

/// Every way a token can be rejected. The Display text is what callers see.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Malformed token: {0}")]
    Malformed(String),
    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("Token header is missing 'kid'")]
    MissingKeyId,
    #[error(transparent)]
    Keys(#[from] JwksError),
    #[error("Unusable signing key: {0}")]
    UnusableKey(String),
    #[error("Signature verification failed")]
    InvalidSignature,
    #[error("Token is expired")]
    Expired,
    #[error("Token is not yet valid")]
    Immature,
    #[error("Token was not issued by this user pool")]
    InvalidIssuer,
    #[error("Token was not issued for this audience")]
    InvalidAudience,
    #[error("Token is missing required claim '{0}'")]
    MissingClaim(String),
    #[error("Unsupported token use: {0}")]
    InvalidTokenUse(String),
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::Immature,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidIssuer => Self::InvalidIssuer,
            ErrorKind::InvalidAudience => Self::InvalidAudience,
            ErrorKind::MissingRequiredClaim(claim) => Self::MissingClaim(claim.clone()),
            _ => Self::Malformed(e.to_string()),
        }
    }
}

/// Verification collaborator: turns a raw token into verified claims.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(
        &self,
        token: &str,
        params: &VerifyParams<'_>,
    ) -> Result<Claims, VerificationError>;
}

/// RS256 verifier backed by the user pool's JWKS.
///
/// `jsonwebtoken::Validation` covers signature, `exp` (unless skipped) and
/// `iss`. Audience and `token_use` are checked here because access tokens
/// carry `client_id` instead of `aud`.
#[derive(Debug)]
pub struct CognitoVerifier {
    keys: JwksCache,
    leeway_seconds: u64,
}

impl CognitoVerifier {
    pub fn new(keys: JwksCache, leeway_seconds: u64) -> Self {
        Self {
            keys,
            leeway_seconds: leeway_seconds.min(MAX_TOKEN_LEEWAY_SECONDS),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, JwksError> {
        Ok(Self::new(
            JwksCache::from_config(config)?,
            config.leeway_seconds,
        ))
    }

    fn validation(&self, params: &VerifyParams<'_>) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[params.issuer()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.validate_aud = false;
        validation.validate_exp = !params.skip_expiration_check;
        validation.leeway = self.leeway_seconds;
        validation
    }
}

#[async_trait]
impl TokenVerifier for CognitoVerifier {
    async fn verify(
        &self,
        token: &str,
        params: &VerifyParams<'_>,
    ) -> Result<Claims, VerificationError> {
        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| VerificationError::Malformed(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(VerificationError::UnsupportedAlgorithm(format!(
                "{:?}",
                header.alg
            )));
        }

        let kid = header.kid.ok_or(VerificationError::MissingKeyId)?;
        let jwk = self.keys.get(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk)
            .map_err(|e| VerificationError::UnusableKey(e.to_string()))?;

        let data = jsonwebtoken::decode::<Claims>(token, &key, &self.validation(params))?;
        check_client(&data.claims, params)?;

        Ok(data.claims)
    }
}

// id tokens: `aud` == client id; access tokens: `client_id` == client id.
fn check_client(claims: &Claims, params: &VerifyParams<'_>) -> Result<(), VerificationError> {
    let raw = claims
        .get_str("token_use")
        .ok_or_else(|| VerificationError::MissingClaim("token_use".to_string()))?;
    let token_use = raw
        .parse::<TokenUse>()
        .map_err(|_| VerificationError::InvalidTokenUse(raw.to_string()))?;

    let issued_for_client = match token_use {
        TokenUse::Id => claims.has_audience(params.app_client_id),
        TokenUse::Access => claims.client_id() == Some(params.app_client_id),
    };

    if !issued_for_client {
        return Err(VerificationError::InvalidAudience);
    }
    Ok(())
}
