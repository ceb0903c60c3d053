//! Outbound JSON gateway: TTL cache keyed by URL + headers, per-provider
//! rate-limit budgets, typed failures for throttling and bad statuses.

pub mod rate_limit;

use backoff::future::retry;
use backoff::ExponentialBackoffBuilder;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub use rate_limit::{RateLimitBudget, RateLimits};

pub const USER_AGENT: &str = "WebAPI-Research-Tool/1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Github,
    Mdn,
    Caniuse,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Github => write!(f, "github"),
            Provider::Mdn => write!(f, "mdn"),
            Provider::Caniuse => write!(f, "caniuse"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(
        "{provider}: rate limited, retry after {} seconds",
        .retry_after.as_deref().unwrap_or("unknown")
    )]
    RateLimited {
        provider: Provider,
        retry_after: Option<String>,
    },

    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("invalid JSON body: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Worth another attempt: server-side errors and connection failures.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Status { status, .. } => *status >= 500,
            GatewayError::Transport(_) => true,
            GatewayError::RateLimited { .. } | GatewayError::Decode(_) => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub size: u64,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub cache_ttl: Duration,
    pub cache_max_capacity: u64,
    pub retry_initial_interval: Duration,
    pub retry_max_interval: Duration,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(5 * 60),
            cache_max_capacity: 1_000,
            retry_initial_interval: Duration::from_millis(200),
            retry_max_interval: Duration::from_secs(2),
        }
    }
}

pub struct ApiGateway {
    client: reqwest::Client,
    cache: moka::future::Cache<String, Value>,
    rate_limits: RateLimits,
    options: GatewayOptions,
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("cache_entries", &self.cache.entry_count())
            .field("cache_ttl", &self.options.cache_ttl)
            .finish()
    }
}

/// `"{url}-{headers as JSON}"`; headers serialize in sorted key order and
/// credentials are masked so keys are safe to expose in stats.
pub fn cache_key(url: &str, headers: &BTreeMap<String, String>) -> String {
    let masked: BTreeMap<&str, &str> = headers
        .iter()
        .map(|(k, v)| {
            if k.eq_ignore_ascii_case("authorization") {
                (k.as_str(), "[redacted]")
            } else {
                (k.as_str(), v.as_str())
            }
        })
        .collect();
    let headers_json = serde_json::to_string(&masked).unwrap_or_else(|_| "{}".to_string());
    format!("{}-{}", url, headers_json)
}

impl ApiGateway {
    pub fn new(client: reqwest::Client, options: GatewayOptions) -> Self {
        let cache = moka::future::Cache::builder()
            .max_capacity(options.cache_max_capacity)
            .time_to_live(options.cache_ttl)
            .build();
        Self {
            client,
            cache,
            rate_limits: RateLimits::default(),
            options,
        }
    }

    /// GET `url` and decode the body as JSON, serving from cache when fresh.
    ///
    /// Caller headers take precedence over the default `User-Agent`.
    pub async fn get_json(
        &self,
        provider: Provider,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<Value, GatewayError> {
        let caller_headers: BTreeMap<String, String> = headers.iter().cloned().collect();
        let key = cache_key(url, &caller_headers);

        if let Some(hit) = self.cache.get(&key).await {
            debug!("cache hit: {}", url);
            return Ok(hit);
        }

        if let Some(wait) = self.rate_limits.blocked_for(provider, chrono::Utc::now()) {
            warn!("{} budget exhausted, skipping {}", provider, url);
            return Err(GatewayError::RateLimited {
                provider,
                retry_after: Some(wait.to_string()),
            });
        }

        let mut request_headers = caller_headers.clone();
        if !request_headers
            .keys()
            .any(|k| k.eq_ignore_ascii_case("user-agent"))
        {
            request_headers.insert("User-Agent".to_string(), USER_AGENT.to_string());
        }

        match self.fetch_with_retry(provider, url, &request_headers).await {
            Ok(data) => {
                self.cache.insert(key, data.clone()).await;
                Ok(data)
            }
            Err(e) => {
                warn!("API request failed for {}: {}", url, e);
                Err(e)
            }
        }
    }

    async fn fetch_with_retry(
        &self,
        provider: Provider,
        url: &str,
        headers: &BTreeMap<String, String>,
    ) -> Result<Value, GatewayError> {
        let max_retries = self.rate_limits.snapshot(provider).max_retries;
        let attempts = AtomicU32::new(0);
        let attempts = &attempts;

        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.options.retry_initial_interval)
            .with_max_interval(self.options.retry_max_interval)
            .with_max_elapsed_time(None)
            .build();

        retry(policy, move || async move {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed);
            match self.fetch_once(provider, url, headers).await {
                Ok(v) => Ok(v),
                Err(e) if e.is_transient() && attempt < max_retries => {
                    debug!("transient failure on attempt {} for {}: {}", attempt + 1, url, e);
                    Err(backoff::Error::transient(e))
                }
                Err(e) => Err(backoff::Error::permanent(e)),
            }
        })
        .await
    }

    async fn fetch_once(
        &self,
        provider: Provider,
        url: &str,
        headers: &BTreeMap<String, String>,
    ) -> Result<Value, GatewayError> {
        let mut req = self.client.get(url);
        for (k, v) in headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let resp = req
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = resp.status();
        self.rate_limits.record_response(provider, resp.headers());

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string());
            self.rate_limits
                .record_throttled(provider, retry_after.as_deref(), chrono::Utc::now());
            return Err(GatewayError::RateLimited {
                provider,
                retry_after,
            });
        }

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.run_pending_tasks().await;
        let mut keys: Vec<String> = self.cache.iter().map(|(k, _)| k.as_ref().clone()).collect();
        keys.sort();
        CacheStats {
            size: keys.len() as u64,
            keys,
        }
    }

    pub fn rate_limit(&self, provider: Provider) -> RateLimitBudget {
        self.rate_limits.snapshot(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_header_order_independent() {
        let mut a = BTreeMap::new();
        a.insert("b".to_string(), "2".to_string());
        a.insert("a".to_string(), "1".to_string());
        assert_eq!(cache_key("https://x.test/q", &a), r#"https://x.test/q-{"a":"1","b":"2"}"#);
        assert_eq!(cache_key("https://x.test/q", &BTreeMap::new()), "https://x.test/q-{}");
    }

    #[test]
    fn cache_key_masks_credentials() {
        let mut h = BTreeMap::new();
        h.insert("Authorization".to_string(), "Bearer secret".to_string());
        let key = cache_key("https://x.test/q", &h);
        assert!(!key.contains("secret"));
        assert!(key.contains("[redacted]"));
    }

    #[test]
    fn transient_classification() {
        assert!(GatewayError::Status { status: 503, reason: String::new() }.is_transient());
        assert!(!GatewayError::Status { status: 404, reason: String::new() }.is_transient());
        assert!(GatewayError::Transport("reset".into()).is_transient());
        assert!(!GatewayError::RateLimited { provider: Provider::Github, retry_after: None }
            .is_transient());
    }

    #[test]
    fn fresh_gateway_is_empty() {
        let gateway = ApiGateway::new(reqwest::Client::new(), GatewayOptions::default());
        let stats = tokio_test::block_on(gateway.cache_stats());
        assert_eq!(stats, CacheStats { size: 0, keys: vec![] });
        assert_eq!(gateway.rate_limit(Provider::Github).remaining, 60);
    }

    #[test]
    fn rate_limited_message_mentions_retry_after() {
        let e = GatewayError::RateLimited {
            provider: Provider::Github,
            retry_after: Some("42".into()),
        };
        assert_eq!(e.to_string(), "github: rate limited, retry after 42 seconds");
    }
}
