use std::sync::Arc;

use crate::core::config::ScoutConfig;
use crate::gateway::{ApiGateway, GatewayOptions};

/// Resolved endpoints for every upstream the pipeline talks to.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub mdn: String,
    pub github: String,
    pub caniuse: String,
}

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ApiGateway>,
    pub endpoints: Endpoints,
    /// File-based config loaded from `webapi-scout.json` (env-var fallback for all fields).
    pub config: Arc<ScoutConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("endpoints", &self.endpoints)
            .field("caniuse_enabled", &self.config.resolve_caniuse_enabled())
            .field("github_auth", &self.config.resolve_github_token().is_some())
            .finish()
    }
}

impl AppState {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self::with_config(http_client, crate::core::config::load_scout_config())
    }

    pub fn with_config(http_client: reqwest::Client, config: ScoutConfig) -> Self {
        let options = GatewayOptions {
            cache_ttl: config.resolve_cache_ttl(),
            cache_max_capacity: config.resolve_cache_max_capacity(),
            ..Default::default()
        };
        let endpoints = Endpoints {
            mdn: config.resolve_mdn_base_url(),
            github: config.resolve_github_base_url(),
            caniuse: config.resolve_caniuse_base_url(),
        };
        Self {
            gateway: Arc::new(ApiGateway::new(http_client, options)),
            endpoints,
            config: Arc::new(config),
        }
    }

    /// Headers for GitHub REST calls, with a bearer token when configured.
    pub fn github_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            (
                "Accept".to_string(),
                "application/vnd.github.v3+json".to_string(),
            ),
            ("User-Agent".to_string(), "WebAPI-Research-Tool".to_string()),
        ];
        if let Some(token) = self.config.resolve_github_token() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        headers
    }
}
