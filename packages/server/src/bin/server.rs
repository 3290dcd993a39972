//! WebSocket chat relay server with durable history.
//!
//! Receives messages from clients, appends them to a Redis list and
//! broadcasts them to every connected client. New clients receive the full
//! history first.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parlor-server
//! REDIS_URL=redis://127.0.0.1:6379 PORT=3000 cargo run --bin parlor-server
//! ```

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use clap::Parser;
use parlor_server::{
    domain::MessageLog,
    infrastructure::message_log::{InMemoryMessageLog, RedisMessageLog, redis::DEFAULT_LOG_KEY},
    ui::{OriginPolicy, Server, ServerConfig},
    usecase::RegistryConfig,
};
use parlor_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "parlor-server")]
#[command(about = "WebSocket chat relay with durable history", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Redis connection string for the message log (in-memory log when omitted)
    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// Redis list key holding the chat history
    #[arg(long, env = "LOG_KEY", default_value = DEFAULT_LOG_KEY)]
    log_key: String,

    /// Directory of static assets served at `/`
    #[arg(long, env = "PUBLIC_DIR", default_value = "./public")]
    public_dir: PathBuf,

    /// Origin allowed to open a WebSocket (repeatable; any origin when omitted)
    #[arg(long = "allowed-origin", env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<String>,

    /// Upper bound in milliseconds for one write to a client (unbounded when omitted)
    #[arg(long, env = "WRITE_TIMEOUT_MS")]
    write_timeout_ms: Option<u64>,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            public_dir: self.public_dir.clone(),
            origin_policy: OriginPolicy::from_allowed(self.allowed_origins.clone()),
            registry: RegistryConfig {
                write_timeout: self.write_timeout_ms.map(Duration::from_millis),
            },
        }
    }
}

/// Load variables from a `.env` file (`./.env` when `path` is `None`).
/// A missing file is ignored and variables already set take precedence.
fn load_env_file(path: Option<&Path>) {
    let result = match path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };

    if let Err(e) = result
        && !e.not_found()
    {
        tracing::warn!("Failed to load .env: {}", e);
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    load_env_file(None);

    let args = Args::parse();

    // 1. Create the message log
    let log: Arc<dyn MessageLog> = match &args.redis_url {
        Some(url) => match RedisMessageLog::connect(url, args.log_key.clone()).await {
            Ok(log) => {
                tracing::info!("Connected to Redis message log (key: '{}')", log.key());
                Arc::new(log)
            }
            Err(e) => {
                tracing::error!("Failed to connect to Redis: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("REDIS_URL is not set, chat history is kept in memory only");
            Arc::new(InMemoryMessageLog::new())
        }
    };

    // 2. Create and run the server
    let server = Server::new(log, args.server_config());
    if let Err(e) = server.run(&args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
