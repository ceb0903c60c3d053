use crate::types::{FuturePrediction, Milestone};

const WEB_PLATFORM_TRENDS: [&str; 4] = [
    "Increased focus on privacy and security",
    "Better performance and optimization",
    "Enhanced developer experience and tooling",
    "Cross-platform consistency improvements",
];

const MARKET_FACTORS: [&str; 4] = [
    "Growing demand for Progressive Web Apps",
    "Increased mobile-first development",
    "Enterprise adoption of web technologies",
    "Integration with AI and machine learning",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn timeline(entries: [(&str, String); 4]) -> Vec<Milestone> {
    entries
        .into_iter()
        .map(|(quarter, milestone)| Milestone {
            quarter: quarter.to_string(),
            milestone,
        })
        .collect()
}

fn specific_prediction(normalized: &str) -> Option<(Vec<String>, Vec<Milestone>, Vec<String>)> {
    let prediction = match normalized {
        "fetch api" => (
            strings(&[
                "Enhanced streaming capabilities with better ReadableStream support",
                "Improved caching mechanisms and cache control",
                "Better integration with Service Workers",
                "Enhanced security features for cross-origin requests",
            ]),
            timeline([
                ("2025 Q2", "Fetch API enhancements for better streaming performance".into()),
                ("2025 Q3", "Improved developer tools integration".into()),
                ("2025 Q4", "New security features for enterprise environments".into()),
                ("2026 Q1", "Integration with upcoming web platform features".into()),
            ]),
            strings(&[
                "Maintaining backward compatibility with XMLHttpRequest patterns",
                "Performance optimization for large data transfers",
                "Cross-browser consistency in error handling",
            ]),
        ),
        "service worker" => (
            strings(&[
                "Better offline-first application support",
                "Enhanced background sync capabilities",
                "Improved push notification handling",
                "Integration with WebAssembly for performance",
            ]),
            timeline([
                ("2025 Q2", "Enhanced background processing capabilities".into()),
                ("2025 Q3", "Better integration with Progressive Web Apps".into()),
                ("2025 Q4", "Improved debugging and developer experience".into()),
                ("2026 Q1", "New caching strategies and optimization".into()),
            ]),
            strings(&[
                "Complexity in debugging and development",
                "Memory management in long-running workers",
                "Security considerations for background operations",
            ]),
        ),
        "web audio" => (
            strings(&[
                "Enhanced spatial audio capabilities",
                "Better integration with WebXR for immersive audio",
                "Improved low-latency audio processing",
                "Machine learning integration for audio analysis",
            ]),
            timeline([
                ("2025 Q2", "Spatial audio enhancements for VR/AR".into()),
                ("2025 Q3", "Performance improvements for real-time audio".into()),
                ("2025 Q4", "Better mobile device support".into()),
                ("2026 Q1", "Integration with WebCodecs for advanced audio processing".into()),
            ]),
            strings(&[
                "Cross-platform audio consistency",
                "Latency optimization for real-time applications",
                "Battery usage optimization on mobile devices",
            ]),
        ),
        _ => return None,
    };
    Some(prediction)
}

fn generic_prediction(api_name: &str) -> (Vec<String>, Vec<Milestone>, Vec<String>) {
    (
        vec![
            format!("Enhanced {} capabilities for modern web applications", api_name),
            "Improved performance and optimization".to_string(),
            "Better cross-browser compatibility".to_string(),
            "Enhanced security and privacy features".to_string(),
        ],
        timeline([
            ("2025 Q2", format!("{} stability improvements and bug fixes", api_name)),
            ("2025 Q3", format!("New {} features based on developer feedback", api_name)),
            ("2025 Q4", format!("Performance optimizations for {}", api_name)),
            ("2026 Q1", "Integration with emerging web technologies".to_string()),
        ]),
        strings(&[
            "Maintaining backward compatibility",
            "Cross-browser implementation consistency",
            "Performance optimization across devices",
            "Developer adoption and education",
        ]),
    )
}

/// Outlook for the API; curated for a few APIs, templated otherwise. The
/// platform-wide trends and market factors are always appended.
pub fn future_prediction(api_name: &str) -> FuturePrediction {
    let (trends, timeline, challenges) = specific_prediction(&api_name.to_lowercase())
        .unwrap_or_else(|| generic_prediction(api_name));

    FuturePrediction {
        trends,
        timeline,
        challenges,
        web_platform_trends: strings(&WEB_PLATFORM_TRENDS),
        market_factors: strings(&MARKET_FACTORS),
    }
}
