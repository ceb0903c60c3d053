#![allow(dead_code)]

use std::sync::Arc;
use webapi_scout::core::config::ScoutConfig;
use webapi_scout::AppState;

pub fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Config with every upstream pointed at `base` and a fixed seed.
pub fn test_config(base: &str) -> ScoutConfig {
    ScoutConfig {
        mdn_base_url: Some(base.to_string()),
        github_base_url: Some(base.to_string()),
        caniuse_base_url: Some(base.to_string()),
        caniuse_enabled: Some(false),
        // Explicit empty token keeps a developer's GITHUB_TOKEN out of tests.
        github_token: Some(String::new()),
        cache_ttl_secs: Some(300),
        cache_max_capacity: Some(100),
        step_delay_ms: Some(0),
        rng_seed: Some(7),
    }
}

pub fn test_state(config: ScoutConfig) -> Arc<AppState> {
    Arc::new(AppState::with_config(reqwest::Client::new(), config))
}
