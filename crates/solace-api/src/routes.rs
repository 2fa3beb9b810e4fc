//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, body limits
//! and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use solace_core::config::SolaceConfig;
use solace_core::error::SolaceError;

use crate::handlers;
use crate::state::AppState;

/// Body limit for JSON endpoints.
const JSON_BODY_LIMIT: usize = 1024 * 1024;

/// Room for multipart boundaries and headers around the audio bytes.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state
        .config
        .speech
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD);

    let speech_routes = Router::new().route(
        "/speech-to-text",
        post(handlers::speech_to_text).layer(DefaultBodyLimit::max(upload_limit)),
    );

    let json_routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/chat", post(handlers::chat))
        .route("/history", get(handlers::history))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT));

    // The browser frontend is served from another origin.
    let cors = CorsLayer::permissive();

    json_routes
        .merge(speech_routes)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind to the configured host and port and serve until Ctrl-C.
pub async fn start_server(config: &SolaceConfig, state: AppState) -> Result<(), SolaceError> {
    let addr = format!("{}:{}", config.general.host, config.general.port);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SolaceError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SolaceError::Api(format!("Server error: {}", e)))?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
