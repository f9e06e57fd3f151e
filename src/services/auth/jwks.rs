//! User-pool signing keys (JWKS), fetched over HTTP and cached.
//!
//! - Keys are served from cache while younger than `ttl`.
//! - An unknown `kid` forces a refetch (key rotation); refetches are at least
//!   `min_refresh_interval` apart.
//! - Readers share the lock; a refresh takes it exclusively.

use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{Jwk, JwkSet};
use thiserror::Error;
use tokio::sync::RwLock;
use url::Url;

use crate::config::AuthConfig;

const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum JwksError {
    #[error("failed to fetch jwks.json: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Public key not found in jwks.json")]
    KeyNotFound(String),
}

#[derive(Debug)]
struct CachedKeys {
    set: JwkSet,
    fetched_at: Instant,
}

#[derive(Debug)]
enum KeySource {
    Remote { client: reqwest::Client, url: Url },
    // Fixed key set (tests, air-gapped setups). Never refetched.
    Static,
}

#[derive(Debug)]
pub struct JwksCache {
    source: KeySource,
    ttl: Duration,
    min_refresh_interval: Duration,
    cached: RwLock<Option<CachedKeys>>,
}

impl JwksCache {
    pub fn remote(url: Url, ttl: Duration, timeout: Duration) -> Result<Self, JwksError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            source: KeySource::Remote { client, url },
            ttl,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            cached: RwLock::new(None),
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, JwksError> {
        Self::remote(
            config.jwks_url.clone(),
            config.jwks_cache_ttl,
            config.jwks_timeout,
        )
    }

    pub fn from_static(set: JwkSet) -> Self {
        Self {
            source: KeySource::Static,
            ttl: Duration::MAX,
            min_refresh_interval: Duration::MAX,
            cached: RwLock::new(Some(CachedKeys {
                set,
                fetched_at: Instant::now(),
            })),
        }
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Resolve the signing key for `kid`.
    pub async fn get(&self, kid: &str) -> Result<Jwk, JwksError> {
        if let Some(jwk) = self.cached_key(kid).await {
            return Ok(jwk);
        }

        let set = self.refresh().await?;
        set.find(kid)
            .cloned()
            .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }

    async fn cached_key(&self, kid: &str) -> Option<Jwk> {
        let guard = self.cached.read().await;
        let cached = guard.as_ref()?;
        if cached.fetched_at.elapsed() >= self.ttl {
            return None;
        }
        cached.set.find(kid).cloned()
    }

    async fn refresh(&self) -> Result<JwkSet, JwksError> {
        let (client, url) = match &self.source {
            KeySource::Remote { client, url } => (client, url),
            KeySource::Static => {
                let guard = self.cached.read().await;
                return Ok(guard
                    .as_ref()
                    .map(|c| c.set.clone())
                    .unwrap_or(JwkSet { keys: Vec::new() }));
            }
        };

        let mut guard = self.cached.write().await;

        // Someone else refreshed while we waited for the lock.
        if let Some(cached) = guard.as_ref() {
            let age = cached.fetched_at.elapsed();
            if age < self.min_refresh_interval && age < self.ttl {
                return Ok(cached.set.clone());
            }
        }

        tracing::debug!(url = %url, "fetching cognito jwks");
        let set = fetch(client, url)
            .await
            .inspect_err(|err| tracing::warn!(url = %url, error = %err, "jwks fetch failed"))?;
        tracing::info!(url = %url, keys = set.keys.len(), "cognito jwks refreshed");

        *guard = Some(CachedKeys {
            set: set.clone(),
            fetched_at: Instant::now(),
        });

        Ok(set)
    }
}

async fn fetch(client: &reqwest::Client, url: &Url) -> Result<JwkSet, reqwest::Error> {
    client
        .get(url.clone())
        .send()
        .await?
        .error_for_status()?
        .json::<JwkSet>()
        .await
}
