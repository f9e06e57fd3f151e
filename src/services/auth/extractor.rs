//! Bearer token extraction from the configured request header.

use axum::http::HeaderMap;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Pull the raw token out of `<prefix> <token>`.
///
/// Pure read of the headers; every malformed shape maps to `InvalidHeader`.
pub fn extract_token<'h>(
    headers: &'h HeaderMap,
    config: &AuthConfig,
) -> Result<&'h str, AuthError> {
    let value = headers
        .get(&config.header_name)
        .ok_or_else(|| AuthError::invalid_header("missing header"))?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::invalid_header("Header contains invalid characters"))?;

    let parts: Vec<&str> = value.split_whitespace().collect();

    let Some(scheme) = parts.first() else {
        return Err(AuthError::invalid_header("Token missing"));
    };

    if !scheme.eq_ignore_ascii_case(&config.header_prefix) {
        return Err(AuthError::invalid_header(format!(
            "Unsupported authorization type. Header prefix \"{}\" does not match \"{}\"",
            scheme.to_lowercase(),
            config.header_prefix.to_lowercase()
        )));
    }

    match parts.len() {
        1 => Err(AuthError::invalid_header("Token missing")),
        2 => Ok(parts[1]),
        _ => Err(AuthError::invalid_header("Token contains spaces")),
    }
}
