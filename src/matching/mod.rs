//! Resolves free-text API names against the known-API dictionary.
//!
//! Exact lookup works on the normalized (trimmed, lower-cased) input. Fuzzy
//! lookup ranks every dictionary key by normalized Levenshtein similarity and
//! accepts the best one only above [`FUZZY_THRESHOLD`].

pub mod known_apis;
pub mod similarity;

pub use known_apis::{lookup_known, KnownApi, KNOWN_APIS};
pub use similarity::{levenshtein_distance, similarity};

/// Minimum similarity (exclusive) for a fuzzy hit.
pub const FUZZY_THRESHOLD: f64 = 0.6;

pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Best dictionary entry strictly above [`FUZZY_THRESHOLD`]; ties keep the
/// earlier entry.
pub fn fuzzy_match(normalized: &str) -> Option<&'static KnownApi> {
    let mut best: Option<&'static KnownApi> = None;
    let mut highest = 0.0;

    for api in KNOWN_APIS {
        let score = similarity(normalized, api.key);
        if score > FUZZY_THRESHOLD && score > highest {
            highest = score;
            best = Some(api);
        }
    }

    best
}
