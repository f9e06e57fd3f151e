use serde::Serialize;

use crate::api::v1::extractors::{CognitoIdentity, CognitoUser};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: CognitoUser,
    pub identity: Option<CognitoIdentity>,
}
