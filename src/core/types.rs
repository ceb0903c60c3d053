use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub query: String,
}

/// How the free-text query was resolved to an API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    /// Exact dictionary hit.
    High,
    /// First Web API document from MDN search.
    Medium,
    /// Fuzzy dictionary hit.
    Low,
    /// Nothing matched; identity derived from the query itself.
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestMatch {
    pub original: String,
    pub matched: String,
    pub confidence: Confidence,
    pub mdn_url: String,
    pub mdn_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Introduction {
    pub title: String,
    pub description: String,
    pub mdn_url: String,
    pub last_modified: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupportStatus {
    Supported,
    Partial,
    NotSupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportEntry {
    pub supported: bool,
    pub version: String,
    pub status: SupportStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserSupport {
    pub chrome: SupportEntry,
    pub firefox: SupportEntry,
    pub safari: SupportEntry,
    pub edge: SupportEntry,
    pub ie: SupportEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explainer {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubIssue {
    pub title: String,
    pub repository: String,
    pub number: u64,
    pub status: String,
    pub labels: Vec<String>,
    /// `YYYY-MM-DD`
    pub created: String,
    pub url: String,
    pub author: String,
    pub comments: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BugPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromiumBug {
    pub id: u32,
    pub title: String,
    pub priority: BugPriority,
    pub status: String,
    pub component: String,
    /// `YYYY-MM-DD`
    pub reported: String,
    pub url: String,
    pub kind: String,
}

/// Chromium has no public issue API; bugs are synthesized from templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChromiumBugReport {
    pub search_url: String,
    pub simulated: bool,
    pub bugs: Vec<ChromiumBug>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentChange {
    pub date: String,
    pub change: String,
    pub commit: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChromiumStatus {
    pub current_status: String,
    pub implementation: String,
    pub recent_changes: Vec<RecentChange>,
    pub flags: String,
    pub chrome_status: String,
    pub intent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub quarter: String,
    pub milestone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturePrediction {
    pub trends: Vec<String>,
    pub timeline: Vec<Milestone>,
    pub challenges: Vec<String>,
    pub web_platform_trends: Vec<String>,
    pub market_factors: Vec<String>,
}

/// Everything the eight research stages produce for one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    pub best_match: BestMatch,
    pub introduction: Introduction,
    pub browser_support: BrowserSupport,
    pub explainers: Vec<Explainer>,
    pub github_issues: Vec<GithubIssue>,
    pub chromium_bugs: ChromiumBugReport,
    pub chromium_status: ChromiumStatus,
    pub future_prediction: FuturePrediction,
    pub generated_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
