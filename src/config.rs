/*
 * Responsibility
 * - Environment / .env loading (PORT, CORS, Cognito coordinates)
 * - Validation of required values (missing -> startup failure)
 * - AuthConfig is built once and shared read-only for the process lifetime
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;
use url::Url;

pub const REGION: &str = "COGNITO_REGION";
pub const USERPOOL_ID: &str = "COGNITO_USERPOOL_ID";
pub const APP_CLIENT_ID: &str = "COGNITO_APP_CLIENT_ID";
pub const JWT_HEADER_NAME: &str = "COGNITO_JWT_HEADER_NAME";
pub const JWT_HEADER_PREFIX: &str = "COGNITO_JWT_HEADER_PREFIX";
pub const CHECK_TOKEN_EXPIRATION: &str = "COGNITO_CHECK_TOKEN_EXPIRATION";
pub const TOKEN_LEEWAY_SECONDS: &str = "COGNITO_TOKEN_LEEWAY_SECONDS";
pub const JWKS_URL: &str = "COGNITO_JWKS_URL";
pub const JWKS_CACHE_TTL_SECONDS: &str = "COGNITO_JWKS_CACHE_TTL_SECONDS";
pub const JWKS_TIMEOUT_SECONDS: &str = "COGNITO_JWKS_TIMEOUT_SECONDS";

pub const DEFAULT_HEADER_NAME: &str = "Authorization";
pub const DEFAULT_HEADER_PREFIX: &str = "Bearer";

/// Upper bound for `exp`/`nbf` clock-skew tolerance.
pub const MAX_TOKEN_LEEWAY_SECONDS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => {
                write!(f, "missing configuration: {} is required", key)
            }
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Cognito user-pool coordinates and token conventions.
///
/// Built once at startup; every request reads it through an `Arc`.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub region: String,
    pub user_pool_id: String,
    pub app_client_id: String,

    pub header_name: HeaderName,
    // As configured; `HeaderName` lowercases, error messages quote this one.
    pub header_label: String,
    pub header_prefix: String,

    // `false` disables the `exp` check. Test setups only.
    pub check_expiration: bool,
    pub leeway_seconds: u64,

    pub jwks_url: Url,
    pub jwks_cache_ttl: Duration,
    pub jwks_timeout: Duration,
}

impl AuthConfig {
    /// Coordinates only; everything else takes its default.
    pub fn new(
        region: impl Into<String>,
        user_pool_id: impl Into<String>,
        app_client_id: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let region = region.into();
        let user_pool_id = user_pool_id.into();
        let app_client_id = app_client_id.into();

        Self::from_lookup(|key| match key {
            REGION => Some(region.clone()),
            USERPOOL_ID => Some(user_pool_id.clone()),
            APP_CLIENT_ID => Some(app_client_id.clone()),
            _ => None,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key/value source (env, map in tests, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let region = required(&lookup, REGION)?;
        let user_pool_id = required(&lookup, USERPOOL_ID)?;
        let app_client_id = required(&lookup, APP_CLIENT_ID)?;

        let header_label = non_empty_or(&lookup, JWT_HEADER_NAME, DEFAULT_HEADER_NAME)?;
        let header_name = HeaderName::from_str(&header_label)
            .map_err(|_| ConfigError::Invalid(JWT_HEADER_NAME))?;

        let header_prefix = non_empty_or(&lookup, JWT_HEADER_PREFIX, DEFAULT_HEADER_PREFIX)?;

        let check_expiration = match lookup(CHECK_TOKEN_EXPIRATION) {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid(CHECK_TOKEN_EXPIRATION))?,
            None => true,
        };

        let leeway_seconds = parse_or(&lookup, TOKEN_LEEWAY_SECONDS, 0)?;
        if leeway_seconds > MAX_TOKEN_LEEWAY_SECONDS {
            return Err(ConfigError::Invalid(TOKEN_LEEWAY_SECONDS));
        }

        let jwks_url = match lookup(JWKS_URL).filter(|v| !v.trim().is_empty()) {
            Some(v) => Url::parse(v.trim()).map_err(|_| ConfigError::Invalid(JWKS_URL))?,
            None => Url::parse(&format!(
                "{}/.well-known/jwks.json",
                issuer_url(&region, &user_pool_id)
            ))
            .map_err(|_| ConfigError::Invalid(REGION))?,
        };

        let jwks_cache_ttl = parse_or(&lookup, JWKS_CACHE_TTL_SECONDS, 3600)?;
        let jwks_timeout = parse_or(&lookup, JWKS_TIMEOUT_SECONDS, 5)?;

        Ok(Self {
            region,
            user_pool_id,
            app_client_id,
            header_name,
            header_label,
            header_prefix,
            check_expiration,
            leeway_seconds,
            jwks_url,
            jwks_cache_ttl: Duration::from_secs(jwks_cache_ttl),
            jwks_timeout: Duration::from_secs(jwks_timeout),
        })
    }

    pub fn issuer(&self) -> String {
        issuer_url(&self.region, &self.user_pool_id)
    }

    pub fn with_header_name(mut self, header_name: HeaderName) -> Self {
        self.header_label = header_name.as_str().to_string();
        self.header_name = header_name;
        self
    }

    pub fn with_header_prefix(mut self, header_prefix: impl Into<String>) -> Self {
        self.header_prefix = header_prefix.into();
        self
    }

    pub fn with_check_expiration(mut self, check_expiration: bool) -> Self {
        self.check_expiration = check_expiration;
        self
    }
}

pub fn issuer_url(region: &str, user_pool_id: &str) -> String {
    format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}")
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

// Defaulted, but an explicit empty override is still a missing value.
fn non_empty_or<F>(lookup: &F, key: &'static str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default.to_string()),
        Some(_) => required(lookup, key),
    }
}

fn parse_or<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let auth = AuthConfig::from_env()?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            request_timeout,
            auth,
        })
    }
}
