//! `ScribeServer`: Axum HTTP server for the transcription endpoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{DefaultBodyLimit, State};
use axum::response::{Html, Json};
use axum::routing::{get, post};
use scribe_transcription::{Transcriber, decoder};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::health::{self, DecoderStatus, HealthResponse};
use crate::shutdown::ShutdownCoordinator;
use crate::transcribe;

const RECORDER_PAGE: &str = include_str!("../static/index.html");

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Transcription engine, loaded once at startup.
    pub transcriber: Arc<dyn Transcriber>,
    /// Upload handling configuration.
    pub config: Arc<ServerConfig>,
    /// When the server started.
    pub start_time: Instant,
}

/// A running server.
pub struct ServerHandle {
    /// Bound address (useful with port `0`).
    pub addr: SocketAddr,
    /// Task serving connections; completes after shutdown.
    pub task: JoinHandle<()>,
}

/// The main scribe server.
pub struct ScribeServer {
    config: Arc<ServerConfig>,
    transcriber: Arc<dyn Transcriber>,
    shutdown: Arc<ShutdownCoordinator>,
    start_time: Instant,
}

impl ScribeServer {
    /// Create a new server around an already-loaded engine.
    pub fn new(config: ServerConfig, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            config: Arc::new(config),
            transcriber,
            shutdown: Arc::new(ShutdownCoordinator::new()),
            start_time: Instant::now(),
        }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        let state = AppState {
            transcriber: self.transcriber.clone(),
            config: self.config.clone(),
            start_time: self.start_time,
        };

        Router::new()
            .route("/", get(index_handler))
            .route("/health", get(health_handler))
            .route("/transcribe", post(transcribe::transcribe))
            .route("/transcribe/", post(transcribe::transcribe))
            .layer(DefaultBodyLimit::max(self.config.body_limit()))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind the configured address and serve until shutdown is requested.
    pub async fn listen(&self) -> std::io::Result<ServerHandle> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!(
            addr = %local_addr,
            engine = self.transcriber.name(),
            "scribe server listening"
        );

        let router = self.router();
        let shutdown = self.shutdown.clone();
        let task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "server terminated with error");
            }
            tracing::info!("scribe server stopped");
        });

        Ok(ServerHandle {
            addr: local_addr,
            task,
        })
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the transcription engine.
    pub fn transcriber(&self) -> &Arc<dyn Transcriber> {
        &self.transcriber
    }
}

/// GET /
async fn index_handler() -> Html<&'static str> {
    Html(RECORDER_PAGE)
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let decoder_status = match &state.config.decoder {
        Some(ffmpeg) => Some(DecoderStatus::from(decoder::probe(ffmpeg).await)),
        None => None,
    };
    Json(health::health_check(
        state.start_time,
        state.transcriber.name(),
        decoder_status,
    ))
}
