use serde::Serialize;
use tracing::info;

pub const TOTAL_STEPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchStep {
    BestMatch,
    Introduction,
    BrowserSupport,
    Explainers,
    GithubIssues,
    ChromiumBugs,
    ChromiumStatus,
    FuturePrediction,
}

impl ResearchStep {
    pub const ALL: [ResearchStep; TOTAL_STEPS] = [
        ResearchStep::BestMatch,
        ResearchStep::Introduction,
        ResearchStep::BrowserSupport,
        ResearchStep::Explainers,
        ResearchStep::GithubIssues,
        ResearchStep::ChromiumBugs,
        ResearchStep::ChromiumStatus,
        ResearchStep::FuturePrediction,
    ];

    /// 1-based position in the pipeline.
    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    pub fn label(self) -> &'static str {
        match self {
            ResearchStep::BestMatch => "Finding best match",
            ResearchStep::Introduction => "Fetching introduction",
            ResearchStep::BrowserSupport => "Checking browser support",
            ResearchStep::Explainers => "Collecting explainers",
            ResearchStep::GithubIssues => "Searching GitHub issues",
            ResearchStep::ChromiumBugs => "Collecting Chromium bugs",
            ResearchStep::ChromiumStatus => "Checking Chromium status",
            ResearchStep::FuturePrediction => "Predicting future direction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Pending,
    Active,
    Completed,
}

/// Linear progress indicator: starting step `n` completes every step before it.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    states: [StepState; TOTAL_STEPS],
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self {
            states: [StepState::Pending; TOTAL_STEPS],
        }
    }
}

impl ProgressTracker {
    pub fn start(&mut self, step: ResearchStep) {
        let idx = step.number() - 1;
        for state in &mut self.states[..idx] {
            *state = StepState::Completed;
        }
        self.states[idx] = StepState::Active;
    }

    pub fn finish(&mut self) {
        self.states = [StepState::Completed; TOTAL_STEPS];
    }

    pub fn states(&self) -> &[StepState; TOTAL_STEPS] {
        &self.states
    }

    pub fn is_finished(&self) -> bool {
        self.states.iter().all(|s| *s == StepState::Completed)
    }
}

pub trait ProgressObserver: Send + Sync {
    fn step_started(&self, step: ResearchStep, states: &[StepState; TOTAL_STEPS]);

    fn finished(&self) {}
}

/// Default observer: one `info!` line per step.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl ProgressObserver for LoggingObserver {
    fn step_started(&self, step: ResearchStep, _states: &[StepState; TOTAL_STEPS]) {
        info!("[{}/{}] {}", step.number(), TOTAL_STEPS, step.label());
    }

    fn finished(&self) {
        info!("research complete");
    }
}
