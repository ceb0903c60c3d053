// ---------------------------------------------------------------------------
// ScoutConfig: file-based config loader (webapi-scout.json) with env-var fallback
// ---------------------------------------------------------------------------

pub const ENV_CONFIG_PATH: &str = "WEBAPI_SCOUT_CONFIG";

pub const DEFAULT_MDN_BASE_URL: &str = "https://developer.mozilla.org";
pub const DEFAULT_GITHUB_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_CANIUSE_BASE_URL: &str = "https://raw.githubusercontent.com/Fyrd/caniuse/main";

/// Top-level config loaded from `webapi-scout.json`. Every field is optional;
/// `resolve_*` falls back to an env var, then a built-in default.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct ScoutConfig {
    /// MDN origin used for search and document API calls.
    pub mdn_base_url: Option<String>,
    /// GitHub REST API root.
    pub github_base_url: Option<String>,
    /// Root of the caniuse `features-json` tree.
    pub caniuse_base_url: Option<String>,
    /// Query caniuse for live browser support. Defaults to `false`.
    pub caniuse_enabled: Option<bool>,
    /// Personal access token. Never logged. Raises the GitHub search quota.
    pub github_token: Option<String>,
    /// Response cache lifetime. Default: 300.
    pub cache_ttl_secs: Option<u64>,
    pub cache_max_capacity: Option<u64>,
    /// Pause before each research step, for paced progress output. Default: 0.
    pub step_delay_ms: Option<u64>,
    /// Fixed seed for the simulated Chromium data.
    pub rng_seed: Option<u64>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.parse().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    let v = env_string(key)?.to_ascii_lowercase();
    Some(matches!(v.as_str(), "1" | "true" | "yes" | "on"))
}

/// Trimmed with any trailing `/` dropped, so paths can be appended verbatim.
fn base_url(v: &str) -> Option<String> {
    let v = v.trim().trim_end_matches('/');
    (!v.is_empty()).then(|| v.to_string())
}

fn resolve_base_url(field: &Option<String>, env_key: &str, default: &str) -> String {
    field
        .as_deref()
        .and_then(base_url)
        .or_else(|| env_string(env_key).as_deref().and_then(base_url))
        .unwrap_or_else(|| default.to_string())
}

impl ScoutConfig {
    /// MDN origin: JSON field → `MDN_BASE_URL` → `https://developer.mozilla.org`.
    pub fn resolve_mdn_base_url(&self) -> String {
        resolve_base_url(&self.mdn_base_url, "MDN_BASE_URL", DEFAULT_MDN_BASE_URL)
    }

    /// GitHub API root: JSON field → `GITHUB_API_URL` → `https://api.github.com`.
    pub fn resolve_github_base_url(&self) -> String {
        resolve_base_url(&self.github_base_url, "GITHUB_API_URL", DEFAULT_GITHUB_BASE_URL)
    }

    pub fn resolve_caniuse_base_url(&self) -> String {
        resolve_base_url(&self.caniuse_base_url, "CANIUSE_BASE_URL", DEFAULT_CANIUSE_BASE_URL)
    }

    pub fn resolve_caniuse_enabled(&self) -> bool {
        self.caniuse_enabled
            .or_else(|| env_flag("CANIUSE_ENABLED"))
            .unwrap_or(false)
    }

    /// Token: JSON field → `GITHUB_TOKEN` → `None`. An explicit `""` disables auth.
    pub fn resolve_github_token(&self) -> Option<String> {
        if let Some(t) = &self.github_token {
            let t = t.trim();
            return (!t.is_empty()).then(|| t.to_string());
        }
        env_string("GITHUB_TOKEN")
    }

    pub fn resolve_cache_ttl(&self) -> std::time::Duration {
        let secs = self
            .cache_ttl_secs
            .or_else(|| env_parse("CACHE_TTL_SECS"))
            .unwrap_or(300);
        std::time::Duration::from_secs(secs)
    }

    pub fn resolve_cache_max_capacity(&self) -> u64 {
        self.cache_max_capacity
            .or_else(|| env_parse("CACHE_MAX_CAPACITY"))
            .unwrap_or(1_000)
    }

    pub fn resolve_step_delay(&self) -> std::time::Duration {
        let ms = self
            .step_delay_ms
            .or_else(|| env_parse("STEP_DELAY_MS"))
            .unwrap_or(0);
        std::time::Duration::from_millis(ms)
    }

    pub fn resolve_rng_seed(&self) -> Option<u64> {
        self.rng_seed.or_else(|| env_parse("RESEARCH_SEED"))
    }
}

/// Load `webapi-scout.json` from standard locations.
///
/// Search order (first found wins):
/// 1. `WEBAPI_SCOUT_CONFIG` env var path
/// 2. `./webapi-scout.json`
/// 3. `../webapi-scout.json`
///
/// Missing file → `ScoutConfig::default()`.
/// Parse error → log a warning, return `ScoutConfig::default()`.
pub fn load_scout_config() -> ScoutConfig {
    let mut candidates = vec![
        std::path::PathBuf::from("webapi-scout.json"),
        std::path::PathBuf::from("../webapi-scout.json"),
    ];
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        candidates.insert(0, std::path::PathBuf::from(env_path));
    }

    for path in &candidates {
        let Ok(contents) = std::fs::read_to_string(path) else {
            continue;
        };
        return match serde_json::from_str::<ScoutConfig>(&contents) {
            Ok(cfg) => {
                tracing::info!("webapi-scout.json loaded from {}", path.display());
                cfg
            }
            Err(e) => {
                tracing::warn!(
                    "webapi-scout.json parse error at {}: {}, using defaults",
                    path.display(),
                    e
                );
                ScoutConfig::default()
            }
        };
    }

    ScoutConfig::default()
}

/// HTTP client timeouts: `HTTP_TIMEOUT_SECS` (30) and `HTTP_CONNECT_TIMEOUT_SECS` (10).
pub fn http_timeouts() -> (std::time::Duration, std::time::Duration) {
    let timeout = env_parse("HTTP_TIMEOUT_SECS").unwrap_or(30);
    let connect = env_parse("HTTP_CONNECT_TIMEOUT_SECS").unwrap_or(10);
    (
        std::time::Duration::from_secs(timeout),
        std::time::Duration::from_secs(connect),
    )
}

pub const DEFAULT_PORT: u16 = 5000;

/// Listen port: `--port N` / `--port=N`, then `WEBAPI_SCOUT_PORT`, then `PORT`,
/// then [`DEFAULT_PORT`]. Unparseable values are skipped.
pub fn resolve_port<I>(args: I) -> u16
where
    I: IntoIterator<Item = String>,
{
    port_from_args(args)
        .or_else(|| env_parse("WEBAPI_SCOUT_PORT"))
        .or_else(|| env_parse("PORT"))
        .unwrap_or(DEFAULT_PORT)
}

fn port_from_args<I>(args: I) -> Option<u16>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let value = match arg.strip_prefix("--port") {
            Some("") => args.next(),
            Some(rest) => rest.strip_prefix('=').map(str::to_string),
            None => None,
        };
        if let Some(port) = value.and_then(|v| v.trim().parse().ok()) {
            return Some(port);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fields_win_and_trailing_slash_is_dropped() {
        let cfg: ScoutConfig = serde_json::from_str(
            r#"{"mdn_base_url": "http://127.0.0.1:9000/", "cache_ttl_secs": 5, "rng_seed": 7}"#,
        )
        .unwrap();
        assert_eq!(cfg.resolve_mdn_base_url(), "http://127.0.0.1:9000");
        assert_eq!(cfg.resolve_cache_ttl(), std::time::Duration::from_secs(5));
        assert_eq!(cfg.resolve_rng_seed(), Some(7));
    }

    #[test]
    fn env_base_urls_lose_trailing_slash() {
        std::env::set_var("CANIUSE_BASE_URL", " https://mirror.test/caniuse// ");
        let resolved = ScoutConfig::default().resolve_caniuse_base_url();
        std::env::remove_var("CANIUSE_BASE_URL");
        assert_eq!(resolved, "https://mirror.test/caniuse");
    }

    #[test]
    fn slash_only_base_url_falls_back_to_default() {
        let cfg = ScoutConfig {
            github_base_url: Some("/".into()),
            ..Default::default()
        };
        assert_eq!(
            resolve_base_url(&cfg.github_base_url, "WEBAPI_SCOUT_UNSET_TEST_URL", DEFAULT_GITHUB_BASE_URL),
            DEFAULT_GITHUB_BASE_URL
        );
    }

    #[test]
    fn port_flag_forms() {
        let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(port_from_args(args(&["bin", "--port", "8080"])), Some(8080));
        assert_eq!(port_from_args(args(&["bin", "--port=9090"])), Some(9090));
        assert_eq!(port_from_args(args(&["bin", "--port", "nope", "--port=7070"])), Some(7070));
        assert_eq!(port_from_args(args(&["bin", "--portal=1"])), None);
        assert_eq!(port_from_args(args(&["bin"])), None);
    }

    #[test]
    fn explicit_empty_token_disables_auth() {
        let cfg = ScoutConfig {
            github_token: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(cfg.resolve_github_token(), None);
    }

    #[test]
    fn empty_object_leaves_every_field_unset() {
        let cfg: ScoutConfig = serde_json::from_str("{}").unwrap();
        assert!(cfg.mdn_base_url.is_none());
        assert!(cfg.caniuse_enabled.is_none());
    }
}
