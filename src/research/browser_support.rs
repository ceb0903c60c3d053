use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use super::collapse_whitespace;
use crate::gateway::{GatewayError, Provider};
use crate::types::{BrowserSupport, SupportEntry, SupportStatus};
use crate::AppState;

static TRAILING_API: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+api\s*$").unwrap());

fn yes(version: &str) -> SupportEntry {
    SupportEntry {
        supported: true,
        version: version.to_string(),
        status: SupportStatus::Supported,
    }
}

fn partial(version: &str) -> SupportEntry {
    SupportEntry {
        supported: true,
        version: version.to_string(),
        status: SupportStatus::Partial,
    }
}

fn no() -> SupportEntry {
    SupportEntry {
        supported: false,
        version: "No".to_string(),
        status: SupportStatus::NotSupported,
    }
}

/// Table key for a query: lower-case, trailing " api" dropped, whitespace → `_`.
pub fn support_key(query: &str) -> String {
    let lowered = query.to_lowercase();
    let stripped = TRAILING_API.replace(&lowered, "");
    collapse_whitespace(&stripped, "_")
}

pub fn known_support(key: &str) -> Option<BrowserSupport> {
    let support = match key {
        "fetch" => BrowserSupport {
            chrome: yes("42"),
            firefox: yes("39"),
            safari: yes("10.1"),
            edge: yes("14"),
            ie: no(),
        },
        "webgl" => BrowserSupport {
            chrome: yes("9"),
            firefox: yes("4"),
            safari: yes("5.1"),
            edge: yes("12"),
            ie: partial("11"),
        },
        "web_audio" => BrowserSupport {
            chrome: yes("35"),
            firefox: yes("25"),
            safari: yes("14.1"),
            edge: yes("79"),
            ie: no(),
        },
        "service_worker" => BrowserSupport {
            chrome: yes("40"),
            firefox: yes("44"),
            safari: yes("11.1"),
            edge: yes("17"),
            ie: no(),
        },
        "geolocation" => BrowserSupport {
            chrome: yes("5"),
            firefox: yes("3.5"),
            safari: yes("5"),
            edge: yes("12"),
            ie: yes("9"),
        },
        "notification" => BrowserSupport {
            chrome: yes("22"),
            firefox: yes("22"),
            safari: yes("16"),
            edge: yes("14"),
            ie: no(),
        },
        "websocket" => BrowserSupport {
            chrome: yes("16"),
            firefox: yes("11"),
            safari: yes("7"),
            edge: yes("12"),
            ie: yes("10"),
        },
        "canvas" => BrowserSupport {
            chrome: yes("4"),
            firefox: yes("3.6"),
            safari: yes("3.1"),
            edge: yes("12"),
            ie: yes("9"),
        },
        "indexeddb" => BrowserSupport {
            chrome: yes("24"),
            firefox: yes("16"),
            safari: yes("10"),
            edge: yes("12"),
            ie: partial("10"),
        },
        _ => return None,
    };
    Some(support)
}

pub fn default_support() -> BrowserSupport {
    BrowserSupport {
        chrome: yes("Latest"),
        firefox: yes("Latest"),
        safari: partial("Latest"),
        edge: yes("Latest"),
        ie: no(),
    }
}

/// caniuse feature id for a support key.
pub fn caniuse_feature(key: &str) -> Option<&'static str> {
    match key {
        "fetch" => Some("fetch"),
        "webgl" => Some("webgl"),
        "web_audio" => Some("audio-api"),
        "service_worker" => Some("serviceworkers"),
        "geolocation" => Some("geolocation"),
        "notification" => Some("notifications"),
        "websocket" => Some("websockets"),
        "canvas" => Some("canvas"),
        "indexeddb" => Some("indexeddb"),
        _ => None,
    }
}

pub async fn browser_support(state: &Arc<AppState>, query: &str) -> BrowserSupport {
    let key = support_key(query);
    let table = known_support(&key).unwrap_or_else(default_support);

    if !state.config.resolve_caniuse_enabled() {
        return table;
    }
    let Some(feature) = caniuse_feature(&key) else {
        return table;
    };

    match fetch_caniuse(state, feature).await {
        Ok(Some(live)) => live,
        Ok(None) => {
            debug!("caniuse data for '{}' incomplete, using static table", feature);
            table
        }
        Err(e) => {
            warn!("caniuse data not available: {}", e);
            table
        }
    }
}

async fn fetch_caniuse(state: &Arc<AppState>, feature: &str) -> Result<Option<BrowserSupport>, GatewayError> {
    let url = format!("{}/features-json/{}.json", state.endpoints.caniuse, feature);
    let data = state.gateway.get_json(Provider::Caniuse, &url, &[]).await?;
    Ok(support_from_caniuse(&data))
}

/// Sort key for caniuse version labels like `"3.1"`, `"4-5"` or `"TP"`.
fn version_rank(label: &str) -> f64 {
    label
        .split('-')
        .next()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(f64::INFINITY)
}

/// Earliest full support wins; otherwise earliest partial; otherwise none.
fn entry_from_stats(stats: &serde_json::Map<String, Value>) -> SupportEntry {
    let mut versions: Vec<(&str, &str)> = stats
        .iter()
        .filter_map(|(v, flag)| flag.as_str().map(|f| (v.as_str(), f)))
        .collect();
    versions.sort_by(|a, b| version_rank(a.0).total_cmp(&version_rank(b.0)));

    let first = |prefix: char| {
        versions
            .iter()
            .find(|(_, flag)| flag.starts_with(prefix))
            .map(|(v, _)| v.split('-').next().unwrap_or(*v).to_string())
    };

    if let Some(v) = first('y') {
        yes(&v)
    } else if let Some(v) = first('a') {
        partial(&v)
    } else {
        no()
    }
}

pub fn support_from_caniuse(data: &Value) -> Option<BrowserSupport> {
    let stats = data.get("stats")?.as_object()?;
    let browser = |name: &str| stats.get(name).and_then(|s| s.as_object()).map(entry_from_stats);
    Some(BrowserSupport {
        chrome: browser("chrome")?,
        firefox: browser("firefox")?,
        safari: browser("safari")?,
        edge: browser("edge")?,
        ie: browser("ie")?,
    })
}
