use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use super::{collapse_whitespace, encode_component, mdn_docs_url, MDN_ORIGIN};
use crate::gateway::{GatewayError, Provider};
use crate::matching::{fuzzy_match, lookup_known, normalize, KnownApi};
use crate::types::{BestMatch, Confidence};
use crate::AppState;

pub const FUZZY_NOTE: &str = "Fuzzy match - please verify this is the correct API";
pub const UNKNOWN_NOTE: &str = "API not found in our database. Please verify the API name.";

static NON_PATH_CHAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_]").unwrap());

#[derive(Debug, Deserialize)]
struct MdnSearchResponse {
    #[serde(default)]
    documents: Vec<MdnSearchDocument>,
}

#[derive(Debug, Deserialize)]
struct MdnSearchDocument {
    mdn_url: Option<String>,
    title: Option<String>,
    summary: Option<String>,
}

fn from_known(query: &str, api: &KnownApi, confidence: Confidence, note: Option<&str>) -> BestMatch {
    BestMatch {
        original: query.to_string(),
        matched: api.name.to_string(),
        confidence,
        mdn_url: mdn_docs_url(api.path),
        mdn_path: api.path.to_string(),
        summary: None,
        note: note.map(str::to_string),
    }
}

/// MDN path built from the raw query: whitespace → `_`, everything else non-word dropped.
pub fn generic_path(query: &str) -> String {
    let underscored = collapse_whitespace(query, "_");
    NON_PATH_CHAR.replace_all(&underscored, "").into_owned()
}

/// Resolve a free-text query: dictionary, then MDN search, then fuzzy, then generic.
pub async fn find_best_match(state: &Arc<AppState>, query: &str) -> BestMatch {
    let normalized = normalize(query);

    if let Some(api) = lookup_known(&normalized) {
        return from_known(query, api, Confidence::High, None);
    }

    match search_mdn(state, query).await {
        Ok(Some(found)) => return found,
        Ok(None) => debug!("MDN search returned no Web API document for '{}'", query),
        Err(e) => warn!("MDN search failed: {}", e),
    }

    if let Some(api) = fuzzy_match(&normalized) {
        return from_known(query, api, Confidence::Low, Some(FUZZY_NOTE));
    }

    let path = generic_path(query);
    BestMatch {
        original: query.to_string(),
        matched: query.to_string(),
        confidence: Confidence::Unknown,
        mdn_url: mdn_docs_url(&path),
        mdn_path: path,
        summary: None,
        note: Some(UNKNOWN_NOTE.to_string()),
    }
}

async fn search_mdn(state: &Arc<AppState>, query: &str) -> Result<Option<BestMatch>, GatewayError> {
    let url = format!(
        "{}/api/v1/search?q={}&locale=en-US",
        state.endpoints.mdn,
        encode_component(&format!("{} API", query))
    );
    let data = state.gateway.get_json(Provider::Mdn, &url, &[]).await?;
    let response: MdnSearchResponse =
        serde_json::from_value(data).map_err(|e| GatewayError::Decode(e.to_string()))?;

    let top = response.documents.into_iter().find(|doc| {
        let is_web_api = doc
            .mdn_url
            .as_deref()
            .map(|u| u.contains("/Web/API/"))
            .unwrap_or(false);
        let titled_api = doc
            .title
            .as_deref()
            .map(|t| t.to_lowercase().contains("api"))
            .unwrap_or(false);
        is_web_api && titled_api
    });

    Ok(top.and_then(|doc| {
        let mdn_url = doc.mdn_url?;
        let path = mdn_url.split("/Web/API/").nth(1)?.to_string();
        Some(BestMatch {
            original: query.to_string(),
            matched: doc.title.unwrap_or_default(),
            confidence: Confidence::Medium,
            mdn_url: format!("{}{}", MDN_ORIGIN, mdn_url),
            mdn_path: path,
            summary: doc.summary,
            note: None,
        })
    }))
}
