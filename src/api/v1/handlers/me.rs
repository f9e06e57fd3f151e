/*
 * Responsibility
 * - GET /me (認証必須)
 * - Returns the principal and identity the auth middleware attached
 */
use axum::Json;

use crate::api::v1::dto::me::MeResponse;
use crate::api::v1::extractors::{CurrentIdentity, CurrentUser};

pub async fn me(
    CurrentUser(user): CurrentUser,
    CurrentIdentity(identity): CurrentIdentity,
) -> Json<MeResponse> {
    Json(MeResponse { user, identity })
}
