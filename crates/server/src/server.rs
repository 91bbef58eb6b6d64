//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration
//! - Middleware stack (CORS, tracing)
//! - Graceful shutdown handling

use crate::routes::{api_info, chat, health, not_found};
use crate::state::ServerState;
use axum::routing::{get, post};
use axum::Router;
use gems_core::AppConfig;
use gems_knowledge::AnswerService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.server.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/chat", post(chat::chat))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the GEMS Agent HTTP server
///
/// Listens on the configured host and port until SIGTERM or Ctrl+C, then
/// lets in-flight requests finish.
///
/// # Arguments
///
/// * `config` - Application configuration (bind address, CORS, status info)
/// * `answers` - The answering pipeline shared by all requests
pub async fn start_server(config: AppConfig, answers: Arc<dyn AnswerService>) -> anyhow::Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;

    tracing::info!(
        "Starting GEMS Agent server on {}:{} (project={}, location={}, corpus={})",
        host,
        port,
        config.project_id,
        config.location,
        config.rag_corpus_id
    );
    tracing::info!("CORS: {}", config.server.enable_cors);

    let state = Arc::new(ServerState::new(config, answers));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
