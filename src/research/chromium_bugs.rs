use chrono::NaiveDate;
use rand::prelude::*;
use rand::rngs::StdRng;

use super::encode_component;
use crate::types::{BugPriority, ChromiumBug, ChromiumBugReport};

const DEFAULT_COMPONENT: &str = "Blink>API";

struct BugCategory {
    kind: &'static str,
    priority: BugPriority,
    component: &'static str,
}

const CATEGORIES: [BugCategory; 5] = [
    BugCategory { kind: "memory_leak", priority: BugPriority::High, component: "Blink>API" },
    BugCategory { kind: "performance", priority: BugPriority::Medium, component: "V8>Runtime" },
    BugCategory { kind: "error_handling", priority: BugPriority::Low, component: "Blink>Bindings" },
    BugCategory { kind: "feature_request", priority: BugPriority::Medium, component: "Blink>API" },
    BugCategory { kind: "security", priority: BugPriority::High, component: "Blink>SecurityFeatures" },
];

/// Status distribution; weights sum to 1.
pub const STATUS_WEIGHTS: [(&str, f64); 6] = [
    ("New", 0.30),
    ("Assigned", 0.25),
    ("Started", 0.20),
    ("Triaged", 0.15),
    ("Fixed", 0.05),
    ("WontFix", 0.05),
];

fn bug_title(kind: &str, api: &str) -> String {
    match kind {
        "memory_leak" => format!("{} causes memory leak in certain conditions", api),
        "performance" => format!("{} performance regression in latest build", api),
        "error_handling" => format!("{} throws incorrect error messages", api),
        "feature_request" => format!("Add {} support for new web platform features", api),
        _ => format!("{} security vulnerability in cross-origin contexts", api),
    }
}

/// Blink component owning an API; `Blink>API` when unknown.
pub fn component_for(api_name: &str) -> &'static str {
    match api_name.to_lowercase().as_str() {
        "fetch" => "Blink>Network>FetchAPI",
        "service worker" => "Blink>ServiceWorker",
        "web audio" => "Blink>WebAudio",
        "webgl" => "Blink>WebGL",
        "geolocation" => "Blink>Permissions",
        "notification" => "Blink>Notifications",
        "websocket" => "Blink>Network>WebSockets",
        "canvas" => "Blink>Canvas",
        "indexeddb" => "Blink>Storage>IndexedDB",
        "web workers" => "Blink>Workers",
        "file api" => "Blink>FileAPI",
        "payment request" => "Blink>Payments",
        "web bluetooth" => "Blink>Bluetooth",
        "intersection observer" => "Blink>IntersectionObserver",
        _ => DEFAULT_COMPONENT,
    }
}

pub fn random_status(rng: &mut StdRng) -> &'static str {
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    for (status, weight) in STATUS_WEIGHTS {
        cumulative += weight;
        if roll < cumulative {
            return status;
        }
    }
    STATUS_WEIGHTS[0].0
}

/// Chromium's tracker has no public API, so bugs are synthesized from fixed
/// categories with random ids, dates and statuses.
pub fn simulate_chromium_bugs(api_name: &str, rng: &mut StdRng, today: NaiveDate) -> ChromiumBugReport {
    let component = component_for(api_name);

    let mut bugs: Vec<ChromiumBug> = CATEGORIES
        .iter()
        .map(|category| {
            let id = 1_500_000 + rng.random_range(0..100_000u32);
            let days_ago = rng.random_range(1..=30u64);
            let reported = today
                .checked_sub_days(chrono::Days::new(days_ago))
                .unwrap_or(today);
            let status = random_status(rng);
            ChromiumBug {
                id,
                title: bug_title(category.kind, api_name),
                priority: category.priority,
                status: status.to_string(),
                component: if category.component == DEFAULT_COMPONENT {
                    component.to_string()
                } else {
                    category.component.to_string()
                },
                reported: reported.format("%Y-%m-%d").to_string(),
                url: format!("https://issues.chromium.org/issues/{}", id),
                kind: category.kind.to_string(),
            }
        })
        .collect();

    bugs.sort_by(|a, b| b.priority.cmp(&a.priority));

    ChromiumBugReport {
        search_url: format!(
            "https://issues.chromium.org/issues?q=status:open+{}",
            encode_component(api_name)
        ),
        simulated: true,
        bugs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    #[test]
    fn five_bugs_sorted_by_priority() {
        let mut rng = StdRng::seed_from_u64(1);
        let report = simulate_chromium_bugs("Fetch", &mut rng, today());
        assert!(report.simulated);
        assert_eq!(report.bugs.len(), 5);

        let kinds: Vec<&str> = report.bugs.iter().map(|b| b.kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec!["memory_leak", "security", "performance", "feature_request", "error_handling"]
        );
        assert_eq!(report.search_url, "https://issues.chromium.org/issues?q=status:open+Fetch");
    }

    #[test]
    fn ids_dates_and_statuses_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let report = simulate_chromium_bugs("canvas", &mut rng, today());
            for bug in &report.bugs {
                assert!((1_500_000..1_600_000).contains(&bug.id));
                assert_eq!(bug.url, format!("https://issues.chromium.org/issues/{}", bug.id));
                let reported = NaiveDate::parse_from_str(&bug.reported, "%Y-%m-%d").unwrap();
                let age = (today() - reported).num_days();
                assert!((1..=30).contains(&age), "age {}", age);
                assert!(STATUS_WEIGHTS.iter().any(|(s, _)| *s == bug.status));
            }
        }
    }

    #[test]
    fn generic_component_is_replaced_by_mapping() {
        let mut rng = StdRng::seed_from_u64(3);
        let report = simulate_chromium_bugs("WebGL", &mut rng, today());
        let components: Vec<&str> = report.bugs.iter().map(|b| b.component.as_str()).collect();
        assert!(!components.contains(&"Blink>API"));
        assert_eq!(components.iter().filter(|c| **c == "Blink>WebGL").count(), 2);
        assert!(components.contains(&"V8>Runtime"));

        let unknown = simulate_chromium_bugs("Widget", &mut rng, today());
        assert!(unknown.bugs.iter().any(|b| b.component == "Blink>API"));
    }

    #[test]
    fn same_seed_same_report() {
        let a = simulate_chromium_bugs("fetch", &mut StdRng::seed_from_u64(5), today());
        let b = simulate_chromium_bugs("fetch", &mut StdRng::seed_from_u64(5), today());
        assert_eq!(a.bugs, b.bugs);
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = STATUS_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
