//! orgdir-server — standalone REST server for the organization directory.
//!
//! Reads config from flags or env vars (see `config.rs`):
//!   ORGDIR_BIND_ADDR     — listen address (default: 127.0.0.1:8004)
//!   ORGDIR_DATABASE_URL  — Postgres connection string (`postgres` feature)
//!   ORGDIR_SNAPSHOT      — in-memory mode: snapshot restored/saved
//!   ORGDIR_SEED          — seed file ingested at startup

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use orgdir_core::{Directory, DirectoryConfig, DirectoryStore, MemoryStore};
use orgdir_server::config::ServerConfig;
use orgdir_server::router::build_router;
use orgdir_server::state::AppState;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,orgdir_server=debug".into()),
        )
        .init();

    let cfg = ServerConfig::parse();
    let directory_config = match &cfg.config {
        Some(path) => DirectoryConfig::load_from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => DirectoryConfig::default(),
    };

    // 1. Pick the store
    let (store, memory): (Arc<dyn DirectoryStore>, Option<MemoryStore>) =
        match cfg.database_url.as_deref() {
            Some(url) => (connect_postgres(url, cfg.db_max_connections).await?, None),
            None => {
                let store = open_memory_store(&cfg)?;
                (Arc::new(store.clone()), Some(store))
            }
        };
    let directory = Directory::with_config(store, directory_config);

    // 2. Optional seed
    if let Some(seed) = &cfg.seed {
        let report = orgdir_core::loader::load_seed_file(&directory, seed)
            .await
            .with_context(|| format!("seeding from {}", seed.display()))?;
        tracing::info!(
            ingested = report.ingested,
            skipped = report.skipped,
            "seed applied"
        );
    }

    // 3. Serve
    let app = build_router(AppState::new(directory, cfg.request_timeout()));
    let listener = TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", cfg.bind_addr))?;
    tracing::info!("orgdir-server listening on {}", cfg.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // 4. Persist committed state on the way out
    if let (Some(store), Some(path)) = (&memory, &cfg.snapshot) {
        store.save_snapshot(path).await?;
    }
    tracing::info!("orgdir-server stopped");
    Ok(())
}

fn open_memory_store(cfg: &ServerConfig) -> anyhow::Result<MemoryStore> {
    match &cfg.snapshot {
        Some(path) if path.exists() => MemoryStore::load_snapshot(path)
            .with_context(|| format!("loading snapshot {}", path.display())),
        _ => {
            tracing::info!("starting with an empty in-memory store");
            Ok(MemoryStore::new())
        }
    }
}

#[cfg(feature = "postgres")]
async fn connect_postgres(
    url: &str,
    max_connections: u32,
) -> anyhow::Result<Arc<dyn DirectoryStore>> {
    let store = orgdir_core::PgStore::connect(url, max_connections)
        .await
        .context("failed to connect to database")?;
    store.migrate().await?;
    tracing::info!("Connected to database");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(
    _url: &str,
    _max_connections: u32,
) -> anyhow::Result<Arc<dyn DirectoryStore>> {
    anyhow::bail!(
        "ORGDIR_DATABASE_URL is set but the server was built without the `postgres` feature"
    )
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
