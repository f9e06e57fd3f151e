pub mod authenticator;
pub mod claims;
pub mod extractor;
pub mod factory;
pub mod jwks;
pub mod verifier;

pub use authenticator::{CognitoAuth, IdentityMapper, PrincipalMapper};
pub use claims::{Claims, TokenUse};
pub use extractor::extract_token;
pub use factory::build_cognito_auth;
pub use jwks::{JwksCache, JwksError};
pub use verifier::{CognitoVerifier, TokenVerifier, VerificationError, VerifyParams};
