//! Server configuration (flags or env vars).

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "orgdir-server",
    version,
    about = "HTTP server for the orgdir organization directory"
)]
pub struct ServerConfig {
    /// Listen address
    #[arg(long, env = "ORGDIR_BIND_ADDR", default_value = "127.0.0.1:8004")]
    pub bind_addr: String,

    /// Postgres connection string (needs the `postgres` feature)
    #[arg(long, env = "ORGDIR_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum Postgres pool size
    #[arg(long, env = "ORGDIR_DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,

    /// In-memory mode: snapshot restored at startup and written on shutdown
    #[arg(long, env = "ORGDIR_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Seed file ingested at startup (JSON array, optionally .gz)
    #[arg(long, env = "ORGDIR_SEED")]
    pub seed: Option<PathBuf>,

    /// JSON file with directory settings
    #[arg(long, env = "ORGDIR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Per-request deadline in milliseconds
    #[arg(long, env = "ORGDIR_REQUEST_TIMEOUT_MS", default_value_t = 10_000)]
    pub request_timeout_ms: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
