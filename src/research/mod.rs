//! Eight-stage research pipeline: match → intro → browser support →
//! explainers → issues → bugs → status → prediction.
//!
//! Each stage fills one fragment of [`ResearchReport`](crate::types::ResearchReport).
//! Stages backed by the network degrade to static tables when upstreams fail.

pub mod best_match;
pub mod browser_support;
pub mod chromium_bugs;
pub mod chromium_status;
pub mod explainers;
pub mod github_issues;
pub mod introduction;
pub mod pipeline;
pub mod prediction;
pub mod progress;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::sync::LazyLock;

pub use pipeline::{ResearchError, Researcher};
pub use progress::{LoggingObserver, ProgressObserver, ProgressTracker, ResearchStep, StepState};

/// Public MDN origin used for links in the report, independent of the API base URL.
pub const MDN_ORIGIN: &str = "https://developer.mozilla.org";

/// Characters left unescaped by a URI component encoder.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Replace every run of whitespace with `sep`.
pub fn collapse_whitespace(value: &str, sep: &str) -> String {
    WHITESPACE_RUN.replace_all(value, sep).into_owned()
}

pub fn mdn_docs_url(path: &str) -> String {
    format!("{}/en-US/docs/Web/API/{}", MDN_ORIGIN, path)
}
