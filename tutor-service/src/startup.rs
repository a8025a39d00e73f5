//! Application startup and lifecycle management.

use crate::config::TutorConfig;
use crate::handlers;
use crate::services::providers::{GeminiConfig, GeminiTextProvider, TextProvider};
use crate::services::TutorService;
use axum::middleware::from_fn;
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    make_request_span, metrics_middleware, permissive_cors_layer, request_id_middleware,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub tutor: TutorService,
}

impl AppState {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self {
            tutor: TutorService::new(provider),
        }
    }
}

/// Build the HTTP router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/api/ask", post(handlers::ask_question))
        .fallback(handlers::not_found)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .layer(permissive_cors_layer())
        .with_state(state)
}

/// Build the Gemini provider from configuration.
pub fn gemini_provider(config: &TutorConfig) -> Result<Arc<dyn TextProvider>, AppError> {
    let provider = GeminiTextProvider::new(GeminiConfig {
        api_key: config.gemini.api_key.clone(),
        model: config.gemini.model.clone(),
        api_base: config.gemini.api_base.clone(),
        timeout: config.gemini.timeout(),
    })
    .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

    tracing::info!(
        model = %config.gemini.model,
        timeout_secs = ?config.gemini.timeout_secs,
        "Initialized Gemini text provider"
    );

    Ok(Arc::new(provider))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the Gemini provider.
    pub async fn build(config: TutorConfig) -> Result<Self, AppError> {
        let provider = gemini_provider(&config)?;
        Self::build_with_provider(config, provider).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: TutorConfig,
        provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        // Bind HTTP listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Tutor service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(provider),
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped or a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
