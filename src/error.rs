/*
 * Responsibility
 * - AuthError: the single request-scoped error type of the auth flow
 * - IntoResponse implementation (status / ordered JSON body / extra headers)
 * - Every AuthError returned from middleware, extractor or handler renders here
 */
use std::fmt;

use axum::{
    Json,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Header absent, wrong prefix, token missing or containing spaces.
    InvalidHeader,
    /// No usable token came out of extraction.
    AuthorizationRequired,
    /// The verifier rejected the token.
    InvalidToken,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidHeader => "Invalid Cognito JWT header",
            Self::AuthorizationRequired => "Authorization Required",
            Self::InvalidToken => "Invalid Cognito Authentication Token",
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind} {description}")]
pub struct AuthError {
    kind: AuthErrorKind,
    description: String,
    status: StatusCode,
    headers: Option<HeaderMap>,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            status: StatusCode::UNAUTHORIZED,
            headers: None,
        }
    }

    pub fn invalid_header(description: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::InvalidHeader, description)
    }

    pub fn authorization_required(header: &str, header_prefix: &str) -> Self {
        Self::new(
            AuthErrorKind::AuthorizationRequired,
            format!(
                "Request does not contain a well-formed access token in {header} beginning with \"{header_prefix}\""
            ),
        )
    }

    pub fn invalid_token(description: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::InvalidToken, description)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers
            .get_or_insert_with(HeaderMap::new)
            .insert(name, value);
        self
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }
}

/// Response body. Field order is part of the contract.
#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
    pub status_code: u16,
    pub error: &'static str,
    pub description: &'a str,
}

impl<'a> From<&'a AuthError> for ErrorResponse<'a> {
    fn from(err: &'a AuthError) -> Self {
        Self {
            status_code: err.status.as_u16(),
            error: err.kind.as_str(),
            description: &err.description,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::error!(
            error = ?self,
            kind = %self.kind,
            status = self.status.as_u16(),
            "authentication failed: {}",
            self.description
        );

        let mut response = (self.status, Json(ErrorResponse::from(&self))).into_response();
        if let Some(headers) = self.headers {
            response.headers_mut().extend(headers);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::header;

    use super::*;

    #[test]
    fn display_joins_kind_and_description() {
        let err = AuthError::invalid_header("Token missing");
        assert_eq!(err.to_string(), "Invalid Cognito JWT header Token missing");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(err.headers().is_none());
    }

    #[test]
    fn body_keeps_field_order() {
        let err = AuthError::invalid_token("Token is expired");
        let json = serde_json::to_string(&ErrorResponse::from(&err)).unwrap();
        assert_eq!(
            json,
            r#"{"status_code":401,"error":"Invalid Cognito Authentication Token","description":"Token is expired"}"#
        );
    }

    #[test]
    fn authorization_required_names_header_and_prefix() {
        let err = AuthError::authorization_required("Authorization", "Bearer");
        assert_eq!(err.kind(), AuthErrorKind::AuthorizationRequired);
        assert_eq!(
            err.description(),
            "Request does not contain a well-formed access token in Authorization beginning with \"Bearer\""
        );
    }

    #[tokio::test]
    async fn into_response_renders_status_body_and_headers() {
        let err = AuthError::invalid_header("missing header")
            .with_status(StatusCode::BAD_REQUEST)
            .with_header(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status_code"], 400);
        assert_eq!(value["error"], "Invalid Cognito JWT header");
        assert_eq!(value["description"], "missing header");
    }
}
