//! HTTP surface: research endpoint plus cache inspection.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::gateway::{CacheStats, Provider};
use crate::types::{ErrorResponse, ResearchReport, ResearchRequest};
use crate::{AppState, ResearchError, Researcher};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/research", post(research_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache/clear", post(cache_clear_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "webapi-scout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn research_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<ResearchReport>, (StatusCode, Json<ErrorResponse>)> {
    match Researcher::new(state).research(&request.query).await {
        Ok(report) => Ok(Json(report)),
        Err(e @ ResearchError::EmptyQuery) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

async fn cache_stats_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let CacheStats { size, keys } = state.gateway.cache_stats().await;
    Json(serde_json::json!({
        "size": size,
        "keys": keys,
        "rate_limits": {
            "github": state.gateway.rate_limit(Provider::Github),
            "mdn": state.gateway.rate_limit(Provider::Mdn),
            "caniuse": state.gateway.rate_limit(Provider::Caniuse),
        }
    }))
}

async fn cache_clear_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.gateway.clear_cache();
    info!("response cache cleared");
    StatusCode::NO_CONTENT
}

pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).ok();

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = async {
                if let Some(ref mut s) = sigterm {
                    s.recv().await;
                } else {
                    futures::future::pending::<()>().await;
                }
            } => {},
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
        }
    }

    info!("shutdown signal received");
}
