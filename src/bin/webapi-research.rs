use std::sync::Arc;
use webapi_scout::{core::config, AppState, Researcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .ok();

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        eprintln!("Usage: webapi-research <api name>");
        eprintln!("\nEnv:");
        eprintln!("  GITHUB_TOKEN=... (optional, raises the GitHub search quota)");
        eprintln!("  CANIUSE_ENABLED=1 (optional, live browser support from caniuse)");
        eprintln!("  RESEARCH_SEED=42 (optional, reproducible simulated Chromium data)");
        eprintln!("  STEP_DELAY_MS=500 (optional, paced progress output)");
        std::process::exit(2);
    }

    let (http_timeout, connect_timeout) = config::http_timeouts();
    let http_client = reqwest::Client::builder()
        .timeout(http_timeout)
        .connect_timeout(connect_timeout)
        .build()?;

    let state = Arc::new(AppState::new(http_client));
    let report = Researcher::new(state).research(&query).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
