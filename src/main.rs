use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod routes;
mod services;
mod utils;

use config::AppConfig;
use routes::AppState;

const DEFAULT_LOG_FILTER: &str = "stockviz=debug,tower_http=info";

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received, finishing in-flight requests");
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📈 Starting stockviz v{}...", env!("CARGO_PKG_VERSION"));

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };

    let state = Arc::new(AppState::from_config(&config));
    info!("Market data endpoint: {}", state.client.base_url());
    info!(
        "Charts: {}x{} px in {} (keeping last {})",
        config.chart_width,
        config.chart_height,
        state.chart_output.dir.display(),
        config.chart_retention
    );

    let app = routes::create_router(state, &config);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };
    info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }
}
