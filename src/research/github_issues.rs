use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use super::encode_component;
use crate::gateway::{GatewayError, Provider};
use crate::types::GithubIssue;
use crate::AppState;

pub const MAX_ISSUES: usize = 5;

/// Repositories likely to track Web API problems. Only the first
/// [`REPOS_SEARCHED`] are queried per run to stay inside the search quota.
pub const TARGET_REPOS: &[&str] = &[
    "microsoft/TypeScript",
    "mdn/content",
    "mdn/browser-compat-data",
    "w3c/webappsec",
    "whatwg/fetch",
    "whatwg/html",
    "web-platform-tests/wpt",
    "chromium/chromium",
];
pub const REPOS_SEARCHED: usize = 4;

#[derive(Debug, Deserialize)]
struct IssueSearchResponse {
    #[serde(default)]
    items: Vec<IssueItem>,
}

#[derive(Debug, Deserialize)]
struct IssueItem {
    title: String,
    number: u64,
    state: String,
    #[serde(default)]
    labels: Vec<Label>,
    created_at: String,
    html_url: String,
    user: Option<User>,
    #[serde(default)]
    comments: u64,
    repository_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Label {
    name: String,
}

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

impl IssueItem {
    fn into_issue(self, repository: String) -> GithubIssue {
        GithubIssue {
            created: self.created_at.split('T').next().unwrap_or_default().to_string(),
            title: self.title,
            repository,
            number: self.number,
            status: self.state,
            labels: self.labels.into_iter().map(|l| l.name).collect(),
            url: self.html_url,
            author: self.user.map(|u| u.login).unwrap_or_default(),
            comments: self.comments,
        }
    }
}

/// `owner/name` from a `.../repos/owner/name` API URL.
pub fn repository_from_api_url(url: &str) -> Option<String> {
    url.split_once("/repos/")
        .map(|(_, repo)| repo.to_string())
        .filter(|repo| !repo.is_empty())
}

/// Newest first (stable for equal dates), capped at [`MAX_ISSUES`].
pub fn newest_first(mut issues: Vec<GithubIssue>) -> Vec<GithubIssue> {
    issues.sort_by(|a, b| b.created.cmp(&a.created));
    issues.truncate(MAX_ISSUES);
    issues
}

pub async fn github_issues(state: &Arc<AppState>, query: &str) -> Vec<GithubIssue> {
    let mut issues = Vec::new();

    for repo in TARGET_REPOS.iter().take(REPOS_SEARCHED) {
        match search_repository_issues(state, repo, query).await {
            Ok(found) => issues.extend(found),
            Err(e) => warn!("Failed to search {}: {}", repo, e),
        }
        if issues.len() >= MAX_ISSUES {
            break;
        }
    }

    if issues.len() < MAX_ISSUES {
        match search_global_issues(state, query).await {
            Ok(found) => issues.extend(found),
            Err(e) => warn!("Global GitHub search failed: {}", e),
        }
    }

    newest_first(issues)
}

async fn search_issues(state: &Arc<AppState>, url: &str) -> Result<Vec<IssueItem>, GatewayError> {
    let headers = state.github_headers();
    let data = state.gateway.get_json(Provider::Github, url, &headers).await?;
    let response: IssueSearchResponse =
        serde_json::from_value(data).map_err(|e| GatewayError::Decode(e.to_string()))?;
    Ok(response.items)
}

async fn search_repository_issues(
    state: &Arc<AppState>,
    repo: &str,
    query: &str,
) -> Result<Vec<GithubIssue>, GatewayError> {
    let url = format!(
        "{}/search/issues?q={}+repo:{}+state:open&sort=created&order=desc&per_page=3",
        state.endpoints.github,
        encode_component(query),
        repo
    );
    let items = search_issues(state, &url).await?;
    Ok(items
        .into_iter()
        .map(|item| item.into_issue(repo.to_string()))
        .collect())
}

async fn search_global_issues(state: &Arc<AppState>, query: &str) -> Result<Vec<GithubIssue>, GatewayError> {
    let url = format!(
        "{}/search/issues?q={}+state:open+is:issue&sort=created&order=desc&per_page=5",
        state.endpoints.github,
        encode_component(query)
    );
    let items = search_issues(state, &url).await?;
    Ok(items
        .into_iter()
        .map(|item| {
            let repo = item
                .repository_url
                .as_deref()
                .and_then(repository_from_api_url)
                .unwrap_or_else(|| "Unknown".to_string());
            item.into_issue(repo)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(title: &str, created: &str) -> GithubIssue {
        GithubIssue {
            title: title.to_string(),
            repository: "o/r".to_string(),
            number: 1,
            status: "open".to_string(),
            labels: vec![],
            created: created.to_string(),
            url: String::new(),
            author: String::new(),
            comments: 0,
        }
    }

    #[test]
    fn repository_is_parsed_from_api_url() {
        assert_eq!(
            repository_from_api_url("https://api.github.com/repos/whatwg/fetch").as_deref(),
            Some("whatwg/fetch")
        );
        assert!(repository_from_api_url("https://example.com/x").is_none());
    }

    #[test]
    fn sorted_newest_first_and_stable() {
        let sorted = newest_first(vec![
            issue("a", "2024-01-01"),
            issue("b", "2025-03-01"),
            issue("c", "2024-01-01"),
            issue("d", "2023-05-05"),
            issue("e", "2025-03-01"),
            issue("f", "2022-01-01"),
        ]);
        let titles: Vec<&str> = sorted.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "e", "a", "c", "d"]);
    }

    #[test]
    fn item_maps_to_issue() {
        let item: IssueItem = serde_json::from_value(serde_json::json!({
            "title": "fetch() hangs",
            "number": 42,
            "state": "open",
            "labels": [{"name": "bug"}],
            "created_at": "2025-02-03T10:00:00Z",
            "html_url": "https://github.com/o/r/issues/42",
            "user": {"login": "octo"},
            "comments": 4
        }))
        .unwrap();
        let issue = item.into_issue("o/r".into());
        assert_eq!(issue.created, "2025-02-03");
        assert_eq!(issue.labels, vec!["bug".to_string()]);
        assert_eq!(issue.author, "octo");
    }
}
