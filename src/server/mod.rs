//! Location server
//!
//! Serves the formatted dataset, the keyword conversation endpoint and the
//! location images over HTTP.
//!
//! | Route                    | Description                         |
//! |--------------------------|-------------------------------------|
//! | `GET /health`            | Liveness probe                      |
//! | `GET /api/locations`     | Every location as a feed post       |
//! | `POST /api/conversation` | Recommendations for the latest turn |
//! | `GET /images/*`          | Static location images              |

pub mod dataset;
pub mod handler;

pub use dataset::Dataset;
pub use handler::{
    locations_router, recommend, ConversationRequest, ConversationResponse, ConversationTurn,
    LocationsState, RetrievedLocation, OPENING_QUESTION,
};

use crate::assistant::IntentClassifier;
use crate::config::FeedConfig;
use crate::error::{Error, Result};
use axum::http::{header, Method};
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the complete HTTP application
pub fn build_app(state: LocationsState, images_dir: &Path, cors_origins: &[String]) -> Router {
    locations_router(state)
        .nest_service("/images", ServeDir::new(images_dir))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(cors_origins))
}

/// Empty origin list allows any origin
fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}

/// Location server state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Not started
    Stopped,
    /// Loading the dataset and binding
    Starting,
    /// Accepting connections
    Running,
    /// Draining connections
    ShuttingDown,
}

struct RunningServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

/// HTTP server for the location dataset
pub struct LocationServer {
    config: FeedConfig,
    state: Arc<RwLock<ServerState>>,
    running: Mutex<Option<RunningServer>>,
}

impl LocationServer {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ServerState::Stopped)),
            running: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub async fn state(&self) -> ServerState {
        *self.state.read().await
    }

    /// Bound address while running
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|r| r.local_addr)
    }

    /// Load the dataset, bind and start serving in the background.
    ///
    /// The server refuses to start without a readable dataset.
    pub async fn start(&self) -> Result<SocketAddr> {
        let mut state = self.state.write().await;
        if *state != ServerState::Stopped {
            return Err(Error::Server("Server already running".to_string()));
        }
        *state = ServerState::Starting;
        drop(state);

        match self.spawn().await {
            Ok(addr) => {
                *self.state.write().await = ServerState::Running;
                tracing::info!("Location server listening on {}", addr);
                Ok(addr)
            }
            Err(e) => {
                *self.state.write().await = ServerState::Stopped;
                tracing::error!("Location server failed to start: {}", e);
                Err(e)
            }
        }
    }

    async fn spawn(&self) -> Result<SocketAddr> {
        let dataset_config = &self.config.dataset;
        let dataset = Dataset::load(&dataset_config.path, &dataset_config.images_dir)?;

        let state = LocationsState {
            dataset: Arc::new(dataset),
            classifier: Arc::new(IntentClassifier::default()),
            top_k: self.config.assistant.top_k,
        };
        let app = build_app(
            state,
            &dataset_config.images_dir,
            &self.config.server.cors_origins,
        );

        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(format!("Failed to bind {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move { signal.cancelled().await })
                .await;
            if let Err(e) = result {
                tracing::error!("Location server error: {}", e);
            }
        });

        *self.running.lock().await = Some(RunningServer {
            local_addr,
            shutdown,
            handle,
        });
        Ok(local_addr)
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if *state != ServerState::Running {
            return Ok(());
        }
        *state = ServerState::ShuttingDown;
        drop(state);

        tracing::info!("Stopping location server");

        let running = self.running.lock().await.take();
        if let Some(running) = running {
            running.shutdown.cancel();
            if let Err(e) = running.handle.await {
                tracing::warn!("Location server task ended abnormally: {}", e);
            }
        }

        *self.state.write().await = ServerState::Stopped;
        tracing::info!("Location server stopped");
        Ok(())
    }
}

/// Builder for [`LocationServer`]
pub struct LocationServerBuilder {
    config: FeedConfig,
}

impl LocationServerBuilder {
    pub fn new() -> Self {
        Self {
            config: FeedConfig::default(),
        }
    }

    pub fn config(mut self, config: FeedConfig) -> Self {
        self.config = config;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn dataset(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config.dataset.path = path.into();
        self
    }

    pub fn images_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.config.dataset.images_dir = dir.into();
        self
    }

    pub fn build(self) -> LocationServer {
        LocationServer::new(self.config)
    }
}

impl Default for LocationServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
