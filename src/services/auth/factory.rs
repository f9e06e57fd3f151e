/// Factory: build `CognitoAuth` from `AuthConfig`.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::auth::{CognitoAuth, CognitoVerifier, JwksError};

pub fn build_cognito_auth(config: &AuthConfig) -> Result<Arc<CognitoAuth>, JwksError> {
    if !config.check_expiration {
        tracing::warn!("cognito token expiration checks are DISABLED");
    }

    let verifier = CognitoVerifier::from_config(config)?;
    let auth = CognitoAuth::new(config.clone(), Arc::new(verifier));

    Ok(Arc::new(auth))
}
