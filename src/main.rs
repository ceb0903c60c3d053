use std::sync::Arc;
use tracing::info;

use webapi_scout::{core::config, server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("Starting webapi-scout");

    let (http_timeout, connect_timeout) = config::http_timeouts();
    let http_client = reqwest::Client::builder()
        .timeout(http_timeout)
        .connect_timeout(connect_timeout)
        .build()?;

    let state = Arc::new(AppState::new(http_client));
    info!("{:?}", state);

    let app = server::router(state);

    let port = config::resolve_port(std::env::args().skip(1));
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!(
                "Address already in use: {}. Stop the existing process or run with --port {} (or set PORT/WEBAPI_SCOUT_PORT).",
                bind_addr,
                port.saturating_add(1)
            )
        }
        Err(e) => return Err(e.into()),
    };
    info!("webapi-scout listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    Ok(())
}
