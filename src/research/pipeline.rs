use chrono::Utc;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use super::progress::{LoggingObserver, ProgressObserver, ProgressTracker, ResearchStep};
use super::{
    best_match, browser_support, chromium_bugs, chromium_status, explainers, github_issues,
    introduction, prediction,
};
use crate::types::ResearchReport;
use crate::AppState;

#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("Please enter a Web API name")]
    EmptyQuery,
}

pub struct Researcher {
    state: Arc<AppState>,
    observer: Arc<dyn ProgressObserver>,
    step_delay: Duration,
    seed: Option<u64>,
}

impl Researcher {
    pub fn new(state: Arc<AppState>) -> Self {
        let step_delay = state.config.resolve_step_delay();
        let seed = state.config.resolve_rng_seed();
        Self {
            state,
            observer: Arc::new(LoggingObserver),
            step_delay,
            seed,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    async fn enter(&self, tracker: &mut ProgressTracker, step: ResearchStep) {
        tracker.start(step);
        self.observer.step_started(step, tracker.states());
        if !self.step_delay.is_zero() {
            tokio::time::sleep(self.step_delay).await;
        }
    }

    /// Run all eight stages in order. Only an empty query is an error; every
    /// stage degrades to static data when its upstream fails.
    pub async fn research(&self, query: &str) -> Result<ResearchReport, ResearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResearchError::EmptyQuery);
        }
        info!("researching '{}'", query);

        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);
        let today = Utc::now().date_naive();
        let state = &self.state;
        let mut tracker = ProgressTracker::default();

        self.enter(&mut tracker, ResearchStep::BestMatch).await;
        let best_match = best_match::find_best_match(state, query).await;

        self.enter(&mut tracker, ResearchStep::Introduction).await;
        let introduction = introduction::fetch_introduction(state, &best_match).await;

        self.enter(&mut tracker, ResearchStep::BrowserSupport).await;
        let browser_support = browser_support::browser_support(state, query).await;

        self.enter(&mut tracker, ResearchStep::Explainers).await;
        let explainers = explainers::find_explainers(state, query).await;

        self.enter(&mut tracker, ResearchStep::GithubIssues).await;
        let github_issues = github_issues::github_issues(state, query).await;

        self.enter(&mut tracker, ResearchStep::ChromiumBugs).await;
        let chromium_bugs = chromium_bugs::simulate_chromium_bugs(query, &mut rng, today);

        self.enter(&mut tracker, ResearchStep::ChromiumStatus).await;
        let chromium_status = chromium_status::chromium_status(query, &mut rng, today);

        self.enter(&mut tracker, ResearchStep::FuturePrediction).await;
        let future_prediction = prediction::future_prediction(query);

        tracker.finish();
        self.observer.finished();

        Ok(ResearchReport {
            best_match,
            introduction,
            browser_support,
            explainers,
            github_issues,
            chromium_bugs,
            chromium_status,
            future_prediction,
            generated_at: Utc::now().to_rfc3339(),
        })
    }
}
