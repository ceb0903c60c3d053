use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

use super::Provider;

/// Block applied after a 429 that carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER_SECS: i64 = 60;

/// Per-provider request budget, refreshed from `x-ratelimit-*` headers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RateLimitBudget {
    pub remaining: u32,
    pub reset_at: Option<DateTime<Utc>>,
    /// Extra attempts allowed after a transient failure.
    pub max_retries: u32,
}

impl RateLimitBudget {
    pub fn initial(provider: Provider) -> Self {
        let (remaining, max_retries) = match provider {
            // Unauthenticated GitHub search quota.
            Provider::Github => (60, 3),
            Provider::Mdn => (100, 2),
            Provider::Caniuse => (100, 2),
        };
        Self {
            remaining,
            reset_at: None,
            max_retries,
        }
    }

    /// Known to be empty until a reset instant that has not passed yet.
    pub fn is_exhausted(&self, now: DateTime<Utc>) -> bool {
        self.remaining == 0 && self.reset_at.map(|r| r > now).unwrap_or(false)
    }
}

#[derive(Debug, Default)]
pub struct RateLimits {
    budgets: Mutex<HashMap<Provider, RateLimitBudget>>,
}

impl RateLimits {
    pub fn snapshot(&self, provider: Provider) -> RateLimitBudget {
        let budgets = self.budgets.lock().unwrap_or_else(|e| e.into_inner());
        budgets
            .get(&provider)
            .cloned()
            .unwrap_or_else(|| RateLimitBudget::initial(provider))
    }

    /// Seconds until the budget resets, when the provider must not be called.
    pub fn blocked_for(&self, provider: Provider, now: DateTime<Utc>) -> Option<i64> {
        let budget = self.snapshot(provider);
        if budget.is_exhausted(now) {
            budget.reset_at.map(|r| (r - now).num_seconds().max(0))
        } else {
            None
        }
    }

    /// Account for one outbound request and apply any rate-limit headers.
    pub fn record_response(&self, provider: Provider, headers: &HeaderMap) {
        let mut budgets = self.budgets.lock().unwrap_or_else(|e| e.into_inner());
        let budget = budgets
            .entry(provider)
            .or_insert_with(|| RateLimitBudget::initial(provider));

        budget.remaining = budget.remaining.saturating_sub(1);

        if let Some(remaining) = header_number(headers, "x-ratelimit-remaining") {
            budget.remaining = remaining.min(u32::MAX as i64).max(0) as u32;
        }
        if let Some(reset) = header_number(headers, "x-ratelimit-reset") {
            budget.reset_at = DateTime::from_timestamp(reset, 0);
        }
    }

    /// A 429 empties the budget until `Retry-After` passes, or
    /// [`DEFAULT_RETRY_AFTER_SECS`] when the header is missing or unreadable.
    pub fn record_throttled(&self, provider: Provider, retry_after: Option<&str>, now: DateTime<Utc>) {
        let mut budgets = self.budgets.lock().unwrap_or_else(|e| e.into_inner());
        let budget = budgets
            .entry(provider)
            .or_insert_with(|| RateLimitBudget::initial(provider));
        budget.remaining = 0;
        budget.reset_at = Some(
            retry_after
                .and_then(|v| retry_after_instant(v, now))
                .unwrap_or_else(|| now + chrono::Duration::seconds(DEFAULT_RETRY_AFTER_SECS)),
        );
    }
}

/// `Retry-After` is either delta-seconds or an HTTP-date.
fn retry_after_instant(value: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<i64>() {
        return Some(now + chrono::Duration::seconds(secs.max(0)));
    }
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
}
