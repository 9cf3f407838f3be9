//! HTTP surface for the studio.

pub mod handlers;

use crate::config::StudioConfig;
use crate::core::studio::Studio;
use crate::utils::error::Result;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Shared handler state
pub struct AppState {
    pub studio: Arc<Studio>,
    pub templates_dir: PathBuf,
    pub started_at: DateTime<Utc>,
}

pub struct StudioServer {
    studio: Arc<Studio>,
    bind_address: String,
    templates_dir: PathBuf,
    static_dir: PathBuf,
    request_timeout: Duration,
}

impl StudioServer {
    pub fn new(studio: Arc<Studio>, config: &StudioConfig) -> Self {
        Self {
            studio,
            bind_address: config.bind_address(),
            templates_dir: PathBuf::from(&config.server.templates_dir),
            static_dir: PathBuf::from(&config.render.static_dir),
            request_timeout: Duration::from_secs(config.server.timeout_seconds),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn build_router(&self) -> Router {
        let state = Arc::new(AppState {
            studio: self.studio.clone(),
            templates_dir: self.templates_dir.clone(),
            started_at: Utc::now(),
        });

        Router::new()
            .route("/", get(handlers::index))
            .route("/health", get(handlers::health))
            .route("/generate", post(handlers::generate))
            .route("/suggest_prompts", get(handlers::suggest_prompts))
            .route("/explain_code", post(handlers::explain_code))
            .nest_service("/static", ServeDir::new(&self.static_dir))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.request_timeout,
            ))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Binds the configured address and serves until Ctrl-C.
    pub async fn start(self) -> Result<()> {
        let listener = TcpListener::bind(&self.bind_address).await?;
        self.serve(listener, shutdown_signal()).await
    }

    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        info!(
            "🚀 Serving on {} (timeout {:?}, static dir {})",
            listener.local_addr()?,
            self.request_timeout,
            self.static_dir.display()
        );

        let app = self.build_router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
