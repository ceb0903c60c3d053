use chrono::NaiveDate;
use rand::prelude::*;
use rand::rngs::StdRng;
use regex::Regex;
use std::sync::LazyLock;

use super::{collapse_whitespace, encode_component};
use crate::types::{ChromiumStatus, RecentChange};

static NON_SLUG_CHAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9-]").unwrap());

const CHANGE_TYPES: [&str; 6] = [
    "Performance optimization",
    "Security enhancement",
    "Bug fix",
    "Spec compliance improvement",
    "Developer tool integration",
    "Memory usage optimization",
];

const COMMIT_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

struct KnownStatus {
    current_status: &'static str,
    implementation: &'static str,
    chrome_status: &'static str,
}

fn known_status(normalized: &str) -> Option<KnownStatus> {
    let (current_status, implementation, chrome_status) = match normalized {
        "fetch api" => (
            "Stable and widely implemented",
            "Fully implemented in Chromium 42+ with ongoing improvements",
            "https://chromestatus.com/feature/6730533392195584",
        ),
        "service worker" => (
            "Stable with active development",
            "Fully implemented in Chromium 40+ with regular updates",
            "https://chromestatus.com/feature/6561526227927040",
        ),
        "web audio" => (
            "Stable implementation with performance optimizations",
            "Fully implemented in Chromium 35+ with WebAudio 2.0 features",
            "https://chromestatus.com/feature/4570326751911936",
        ),
        "webgl" => (
            "Mature and stable implementation",
            "WebGL 1.0 in Chromium 9+, WebGL 2.0 in Chromium 56+",
            "https://chromestatus.com/feature/5734147429343232",
        ),
        "geolocation" => (
            "Stable with privacy enhancements",
            "Implemented since early Chromium versions with HTTPS requirement",
            "https://chromestatus.com/feature/5636955912437760",
        ),
        _ => return None,
    };
    Some(KnownStatus {
        current_status,
        implementation,
        chrome_status,
    })
}

/// `chrome://flags` entry most likely to gate experimental work on the API.
pub fn experimental_flag(api_name: &str) -> String {
    let slug = collapse_whitespace(&api_name.to_lowercase(), "-");
    let slug = NON_SLUG_CHAR.replace_all(&slug, "");
    format!("chrome://flags/#enable-experimental-{}-features", slug)
}

fn commit_id(rng: &mut StdRng) -> String {
    (0..12)
        .map(|_| COMMIT_ALPHABET[rng.random_range(0..COMMIT_ALPHABET.len())] as char)
        .collect()
}

/// Three synthetic changes, one per week going back, newest first.
pub fn recent_changes(api_name: &str, rng: &mut StdRng, today: NaiveDate) -> Vec<RecentChange> {
    let mut changes: Vec<RecentChange> = (0..3u64)
        .map(|i| {
            let days_ago = (i + 1) * 7 + rng.random_range(0..7u64);
            let date = today
                .checked_sub_days(chrono::Days::new(days_ago))
                .unwrap_or(today);
            let change_type = CHANGE_TYPES[rng.random_range(0..CHANGE_TYPES.len())];
            RecentChange {
                date: date.format("%Y-%m-%d").to_string(),
                change: format!("{} for {}", change_type, api_name),
                commit: commit_id(rng),
                kind: change_type.to_lowercase().replace(' ', "_"),
            }
        })
        .collect();
    changes.sort_by(|a, b| b.date.cmp(&a.date));
    changes
}

pub fn chromium_status(api_name: &str, rng: &mut StdRng, today: NaiveDate) -> ChromiumStatus {
    let base = known_status(&api_name.to_lowercase()).unwrap_or(KnownStatus {
        current_status: "Implementation varies - check Chrome Platform Status",
        implementation: "Implementation status varies by specific API features",
        chrome_status: "https://chromestatus.com/features",
    });

    ChromiumStatus {
        current_status: base.current_status.to_string(),
        implementation: base.implementation.to_string(),
        recent_changes: recent_changes(api_name, rng, today),
        flags: experimental_flag(api_name),
        chrome_status: base.chrome_status.to_string(),
        intent: format!(
            "https://groups.google.com/a/chromium.org/g/blink-dev/search?q={}",
            encode_component(api_name)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn flag_slug_is_sanitized() {
        assert_eq!(
            experimental_flag("Web Audio (v2)"),
            "chrome://flags/#enable-experimental-web-audio-v2-features"
        );
    }

    #[test]
    fn known_and_default_status() {
        let mut rng = StdRng::seed_from_u64(0);
        let s = chromium_status("WebGL", &mut rng, today());
        assert_eq!(s.current_status, "Mature and stable implementation");
        assert!(s.chrome_status.ends_with("5734147429343232"));
        assert_eq!(
            s.intent,
            "https://groups.google.com/a/chromium.org/g/blink-dev/search?q=WebGL"
        );

        let d = chromium_status("Widget", &mut rng, today());
        assert_eq!(d.chrome_status, "https://chromestatus.com/features");
    }

    #[test]
    fn recent_changes_are_weekly_and_newest_first() {
        let mut rng = StdRng::seed_from_u64(11);
        let changes = recent_changes("fetch", &mut rng, today());
        assert_eq!(changes.len(), 3);
        for (i, change) in changes.iter().enumerate() {
            let date = NaiveDate::parse_from_str(&change.date, "%Y-%m-%d").unwrap();
            let age = (today() - date).num_days();
            let week = (i as i64 + 1) * 7;
            assert!((week..week + 7).contains(&age), "age {} at {}", age, i);
            assert_eq!(change.commit.len(), 12);
            assert!(change.commit.bytes().all(|c| COMMIT_ALPHABET.contains(&c)));
            assert!(change.change.ends_with(" for fetch"));
            assert!(!change.kind.contains(' '));
        }
    }
}
