//! Server execution logic.

use std::{
    future::{Future, IntoFuture},
    path::PathBuf,
    sync::Arc,
};

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    domain::{MessageLog, RegistryError},
    usecase::{RegistryConfig, spawn_registry},
};

use super::{
    handler::{debug_connections, health_check, websocket_handler},
    origin::OriginPolicy,
    signal::shutdown_signal,
    state::AppState,
};

/// Path of the WebSocket endpoint
pub const WEBSOCKET_PATH: &str = "/websocket";

/// Server-level configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory served for every path that is not an API route
    pub public_dir: PathBuf,
    pub origin_policy: OriginPolicy,
    pub registry: RegistryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("./public"),
            origin_policy: OriginPolicy::default(),
            registry: RegistryConfig::default(),
        }
    }
}

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The registry halted, e.g. because a message could not be persisted
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Connection registry task failed: {0}")]
    RegistryTask(#[from] tokio::task::JoinError),
}

/// WebSocket chat relay server
///
/// # Example
///
/// ```ignore
/// let log = Arc::new(InMemoryMessageLog::new());
/// let server = Server::new(log, ServerConfig::default());
/// server.run("127.0.0.1", 8080).await?;
/// ```
pub struct Server {
    /// MessageLog（永続ログの抽象化）
    log: Arc<dyn MessageLog>,
    config: ServerConfig,
}

impl Server {
    pub fn new(log: Arc<dyn MessageLog>, config: ServerConfig) -> Self {
        Self { log, config }
    }

    /// Bind to `host:port` and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if binding fails, if serving fails, or if the
    /// connection registry halts.
    pub async fn run(self, host: &str, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "WebSocket chat relay listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}{}", bind_addr, WEBSOCKET_PATH);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// The registry is started here and shut down after the HTTP server
    /// stops. If the registry halts first, serving stops immediately and the
    /// registry error is returned.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (registry, mut worker) = spawn_registry(self.log, self.config.registry);
        let state = Arc::new(AppState {
            registry: registry.clone(),
            origin_policy: self.config.origin_policy,
        });
        let app = router(state, self.config.public_dir);

        let serving = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .into_future();

        tokio::select! {
            result = serving => result?,
            result = &mut worker => {
                let halted = result?;
                tracing::error!("Connection registry stopped, shutting down the server");
                return halted.map_err(ServerError::from);
            }
        }

        if registry.shutdown().await.is_err() {
            tracing::debug!("Connection registry already stopped");
        }
        worker.await??;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>, public_dir: PathBuf) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route(WEBSOCKET_PATH, get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/debug/connections", get(debug_connections))
        // 静的ファイル
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
