pub mod auth_ctx;

pub use auth_ctx::{
    AuthCtx, CognitoIdentity, CognitoUser, CurrentIdentity, CurrentUser, current_identity,
    current_user,
};
