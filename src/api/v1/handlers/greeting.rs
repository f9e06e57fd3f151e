/*
 * Responsibility
 * - GET /greeting (認証任意)
 * - No auth header: anonymous greeting
 * - Auth header present: authenticate manually; a bad token is still an error
 */
use axum::{Json, extract::Request, extract::State};

use crate::api::v1::dto::greeting::GreetingResponse;
use crate::error::AuthError;
use crate::state::AppState;

pub async fn greeting(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<GreetingResponse>, AuthError> {
    let (mut parts, _body) = req.into_parts();

    if !parts.headers.contains_key(&state.auth.config().header_name) {
        return Ok(Json(GreetingResponse {
            message: "hello, stranger".to_string(),
            authenticated: false,
        }));
    }

    let ctx = state.auth.authenticate(&mut parts).await?;
    let name = ctx.user.username().or(ctx.user.sub()).unwrap_or("user");

    Ok(Json(GreetingResponse {
        message: format!("hello, {name}"),
        authenticated: true,
    }))
}
