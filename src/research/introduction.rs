use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tracing::warn;

use crate::gateway::{GatewayError, Provider};
use crate::types::{BestMatch, Introduction};
use crate::AppState;

static CITATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").unwrap());

pub const UNAVAILABLE_NOTE: &str = "Could not retrieve detailed information";

const KNOWN_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Fetch API", "The Fetch API provides a JavaScript interface for accessing and manipulating parts of the HTTP pipeline, such as requests and responses. It provides a global fetch() method that provides an easy, logical way to fetch resources asynchronously across the network. This kind of functionality was previously achieved using XMLHttpRequest."),
    ("WebGL API", "WebGL (Web Graphics Library) is a JavaScript API for rendering high-performance interactive 3D and 2D graphics within any compatible web browser without the use of plug-ins. WebGL does so by introducing an API that closely conforms to OpenGL ES 2.0 that can be used in HTML5 canvas elements."),
    ("Web Audio API", "The Web Audio API provides a powerful and versatile system for controlling audio on the Web, allowing developers to choose audio sources, add effects to audio, create audio visualizations, apply spatial effects (such as panning) and much more."),
    ("Service Worker API", "Service workers essentially act as proxy servers that sit between web applications, the browser, and the network (when available). They are intended, among other things, to enable the creation of effective offline experiences, intercept network requests and take appropriate action based on whether the network is available, and update assets residing on the server."),
    ("Geolocation API", "The Geolocation API allows the user to provide their location to web applications if they so desire. For privacy reasons, the user is asked for permission to report location information."),
    ("Notifications API", "The Notifications API allows web pages to control the display of system notifications to the end user. These are outside the top-level browsing context viewport, so therefore can be displayed even when the user has switched tabs or moved to a different app."),
    ("WebSocket API", "The WebSocket API is an advanced technology that makes it possible to open a two-way interactive communication session between the user's browser and a server. With this API, you can send messages to a server and receive event-driven responses without having to poll the server for a reply."),
    ("Canvas API", "The Canvas API provides a means for drawing graphics via JavaScript and the HTML <canvas> element. Among other things, it can be used for animation, game graphics, data visualization, photo manipulation, and real-time video processing."),
    ("IndexedDB API", "IndexedDB is a transactional database system, like an SQL-based RDBMS. However, unlike SQL-based RDBMSes, which use fixed-column tables, IndexedDB is a JavaScript-based object-oriented database."),
];

#[derive(Debug, Deserialize)]
struct MdnDocumentResponse {
    doc: Option<MdnDocument>,
}

#[derive(Debug, Deserialize)]
struct MdnDocument {
    title: Option<String>,
    summary: Option<String>,
    /// Either raw HTML or a list of `{ type, value: { content } }` sections.
    body: Option<Value>,
    #[serde(alias = "modified")]
    last_modified: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn body_html(body: &Value) -> Option<String> {
    match body {
        Value::String(html) => Some(html.clone()),
        Value::Array(sections) => {
            let html: String = sections
                .iter()
                .filter_map(|s| s.pointer("/value/content").and_then(|c| c.as_str()))
                .collect();
            (!html.is_empty()).then_some(html)
        }
        _ => None,
    }
}

/// First paragraph of an HTML body, citation markers removed; only kept when
/// longer than 50 characters.
pub fn extract_description(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse("p").ok()?;
    let paragraph = fragment.select(&selector).next()?;
    let text = paragraph.text().collect::<String>();
    let text = CITATION.replace_all(text.trim(), "").trim().to_string();
    (text.chars().count() > 50).then_some(text)
}

pub fn known_description(matched: &str) -> Option<&'static str> {
    KNOWN_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == matched)
        .map(|(_, d)| *d)
}

pub async fn fetch_introduction(state: &Arc<AppState>, best: &BestMatch) -> Introduction {
    match fetch_mdn_document(state, &best.mdn_path).await {
        Ok(doc) => from_document(best, doc),
        Err(e) => {
            warn!("MDN document API failed, using static description: {}", e);
            fallback_introduction(best)
        }
    }
}

async fn fetch_mdn_document(state: &Arc<AppState>, path: &str) -> Result<Option<MdnDocument>, GatewayError> {
    let url = format!(
        "{}/api/v1/document/en-US/docs/Web/API/{}",
        state.endpoints.mdn, path
    );
    let data = state.gateway.get_json(Provider::Mdn, &url, &[]).await?;
    let response: MdnDocumentResponse =
        serde_json::from_value(data).map_err(|e| GatewayError::Decode(e.to_string()))?;
    Ok(response.doc)
}

fn from_document(best: &BestMatch, doc: Option<MdnDocument>) -> Introduction {
    let (title, summary, body, last_modified, tags) = match doc {
        Some(d) => (d.title, d.summary, d.body, d.last_modified, d.tags),
        None => (None, None, None, None, Vec::new()),
    };

    let description = non_empty(summary)
        .or_else(|| body.as_ref().and_then(body_html).and_then(|h| extract_description(&h)))
        .or_else(|| non_empty(best.summary.clone()))
        .unwrap_or_else(|| {
            format!(
                "The {} provides web developers with programmatic access to browser functionality and web platform features.",
                best.matched
            )
        });

    Introduction {
        title: non_empty(title).unwrap_or_else(|| best.matched.clone()),
        description,
        mdn_url: best.mdn_url.clone(),
        last_modified: non_empty(last_modified).unwrap_or_else(|| "Unknown".to_string()),
        tags,
        error: None,
    }
}

pub fn fallback_introduction(best: &BestMatch) -> Introduction {
    let description = known_description(&best.matched)
        .map(str::to_string)
        .or_else(|| non_empty(best.summary.clone()))
        .unwrap_or_else(|| {
            format!(
                "The {} is a web API that provides specific functionality for web applications. This API enables developers to interact with browser features and create enhanced web experiences.",
                best.matched
            )
        });

    Introduction {
        title: best.matched.clone(),
        description,
        mdn_url: best.mdn_url.clone(),
        last_modified: "Unknown".to_string(),
        tags: Vec::new(),
        error: Some(UNAVAILABLE_NOTE.to_string()),
    }
}
