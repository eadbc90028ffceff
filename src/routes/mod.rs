use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::alphavantage::AlphaVantageClient;
use crate::config::AppConfig;
use crate::services::chart_service::ChartOutput;

pub mod index;
pub mod visualize;

/// Shared, read-only state for the handlers
pub struct AppState {
    pub client: AlphaVantageClient,
    pub chart_output: ChartOutput,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            client: AlphaVantageClient::with_base_url(
                config.api_key.clone(),
                config.api_base_url.clone(),
            ),
            chart_output: config.chart_output(),
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

pub fn create_router(state: Arc<AppState>, config: &AppConfig) -> Router {
    Router::new()
        .route("/", get(index::execute))
        .route("/visualize", post(visualize::execute))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
