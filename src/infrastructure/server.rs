// Server module - Provides reusable HTTP server functionality
// Used by main.rs and by the integration tests

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::infrastructure::{AppState, Config};

/// Build the full router: HTML pages plus the JSON API
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::pages_router())
        .nest("/api", api::api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured port on all interfaces; a taken port is an error
pub async fn bind(port: u16) -> Result<TcpListener, String> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))
}

/// Everything that can fail before serving: OCR client, then listener
pub async fn prepare(config: &Config) -> Result<(AppState, TcpListener), String> {
    let state = AppState::from_config(config)
        .map_err(|e| format!("Failed to create OCR client: {}", e))?;
    let listener = bind(config.port).await?;
    Ok((state, listener))
}

/// Serve on an already bound listener until the process stops
pub async fn serve(state: AppState, listener: TcpListener) -> Result<(), String> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("readlens listening on http://{}", addr);
    }

    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| format!("HTTP server error: {}", e))
}
