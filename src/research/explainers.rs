use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use super::{collapse_whitespace, encode_component};
use crate::gateway::{GatewayError, Provider};
use crate::types::Explainer;
use crate::AppState;

pub const MAX_EXPLAINERS: usize = 5;
const MAX_GITHUB_EXPLAINERS: usize = 2;

fn explainer(title: &str, description: &str, url: &str, source: &str) -> Explainer {
    Explainer {
        title: title.to_string(),
        description: description.to_string(),
        url: url.to_string(),
        source: source.to_string(),
    }
}

/// Curated explainers keyed by the lower-cased query.
pub fn known_explainers(normalized: &str) -> Option<Vec<Explainer>> {
    let list = match normalized {
        "fetch api" => vec![
            explainer("Fetch Standard", "The official WHATWG Fetch specification defining the API.", "https://fetch.spec.whatwg.org/", "WHATWG"),
            explainer("Fetch API MDN Documentation", "Comprehensive guide and reference for the Fetch API.", "https://developer.mozilla.org/en-US/docs/Web/API/Fetch_API", "MDN Web Docs"),
        ],
        "service worker" => vec![
            explainer("Service Workers Specification", "W3C specification for Service Workers API.", "https://w3c.github.io/ServiceWorker/", "W3C"),
            explainer("Service Worker Explainer", "Detailed explainer document for Service Workers implementation.", "https://github.com/w3c/ServiceWorker/blob/main/explainer.md", "W3C GitHub"),
        ],
        "web audio" => vec![
            explainer("Web Audio API Specification", "W3C specification for the Web Audio API.", "https://webaudio.github.io/web-audio-api/", "W3C"),
            explainer("Web Audio API Explainer", "Technical explainer for Web Audio API implementation.", "https://github.com/WebAudio/web-audio-api/blob/main/explainer.md", "Web Audio CG"),
        ],
        "webgl" => vec![
            explainer("WebGL Specification", "Khronos Group specification for WebGL.", "https://www.khronos.org/registry/webgl/specs/latest/", "Khronos Group"),
            explainer("WebGL Implementation Guide", "Implementation guide for browser vendors.", "https://www.khronos.org/webgl/wiki/Implementation_Notes", "Khronos Wiki"),
        ],
        "geolocation" => vec![
            explainer("Geolocation API Specification", "W3C specification for the Geolocation API.", "https://w3c.github.io/geolocation-api/", "W3C"),
        ],
        "notification" => vec![
            explainer("Notifications API Standard", "WHATWG specification for the Notifications API.", "https://notifications.spec.whatwg.org/", "WHATWG"),
        ],
        _ => return None,
    };
    Some(list)
}

/// Speculative W3C links for APIs without curated explainers.
pub fn generic_explainers(query: &str) -> Vec<Explainer> {
    let slug = collapse_whitespace(&query.to_lowercase(), "-");
    vec![
        Explainer {
            title: format!("{} Specification", query),
            description: format!("Official specification document for {}.", query),
            url: format!("https://www.w3.org/TR/{}/", slug),
            source: "W3C (Potential)".to_string(),
        },
        Explainer {
            title: format!("{} Explainer", query),
            description: format!("Technical explainer and implementation guide for {}.", query),
            url: format!("https://github.com/w3c/{}/blob/main/explainer.md", slug),
            source: "W3C GitHub (Potential)".to_string(),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct RepoSearchResponse {
    #[serde(default)]
    items: Vec<Repository>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    name: String,
    description: Option<String>,
    html_url: String,
}

impl Repository {
    fn mentions_explainer(&self) -> bool {
        self.name.to_lowercase().contains("explainer")
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains("explainer"))
                .unwrap_or(false)
    }
}

pub async fn find_explainers(state: &Arc<AppState>, query: &str) -> Vec<Explainer> {
    let mut explainers =
        known_explainers(&query.to_lowercase()).unwrap_or_else(|| generic_explainers(query));

    match search_github_explainers(state, query).await {
        Ok(found) => explainers.extend(found),
        Err(e) => warn!("GitHub explainer search failed: {}", e),
    }

    explainers.truncate(MAX_EXPLAINERS);
    explainers
}

/// Any failed search discards the whole enrichment.
async fn search_github_explainers(state: &Arc<AppState>, query: &str) -> Result<Vec<Explainer>, GatewayError> {
    let headers = state.github_headers();
    let terms = [
        format!("{} explainer", query),
        format!("{} specification", query),
        format!("{} spec", query),
    ];

    let mut found = Vec::new();
    for term in &terms {
        let url = format!(
            "{}/search/repositories?q={}+explainer&sort=stars&order=desc&per_page=2",
            state.endpoints.github,
            encode_component(term)
        );
        let data = state.gateway.get_json(Provider::Github, &url, &headers).await?;
        let response: RepoSearchResponse =
            serde_json::from_value(data).map_err(|e| GatewayError::Decode(e.to_string()))?;

        for repo in response.items.into_iter().filter(Repository::mentions_explainer) {
            found.push(Explainer {
                description: repo.description.clone().unwrap_or_else(|| {
                    format!("GitHub repository containing explainer for {}", query)
                }),
                title: repo.name,
                url: repo.html_url,
                source: "GitHub".to_string(),
            });
        }

        if found.len() >= MAX_GITHUB_EXPLAINERS {
            break;
        }
    }

    Ok(found)
}
