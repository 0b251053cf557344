//! Chirpy API server binary.
//!
//! Reads configuration from the environment (and `.env`), prepares the store
//! and serves the HTTP API until interrupted.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chirpy_api::AppState;
use chirpy_api::config::ApiConfig;
use chirpy_core::store::{MemoryStore, PgStore, Store};

const DEFAULT_LOG_FILTER: &str = "info,chirpy_api=debug,chirpy_core=debug";

/// Where users, sessions and chirps are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StoreBackend {
    /// PostgreSQL at `DB_URL`, migrated on startup.
    Postgres,
    /// Process memory. Everything is lost on exit.
    Memory,
}

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "chirpy_server", about = "Chirpy API server")]
struct Args {
    /// Address to listen on. Overrides `BIND_ADDR`.
    #[arg(long)]
    bind: Option<String>,

    /// Storage backend.
    #[arg(long, value_enum, env = "CHIRPY_STORE", default_value_t = StoreBackend::Postgres)]
    store: StoreBackend,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

async fn open_store(
    args: &Args,
    config: &ApiConfig,
) -> Result<Arc<dyn Store>, Box<dyn std::error::Error>> {
    match args.store {
        StoreBackend::Memory => {
            warn!("using in-memory store; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("DB_URL must be set for the postgres store")?;

            info!(max_connections = args.max_connections, "configuring connection pool");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(database_url)
                .await?;

            info!("running database migrations");
            chirpy_core::migrate::migrate(&pool).await?;

            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    if let Some(bind) = args.bind.clone() {
        config.bind_addr = bind;
    }
    info!(?config, store = ?args.store, "starting chirpy_server");

    let store = open_store(&args, &config).await?;
    let state = AppState::new(store, config.clone());
    let app = chirpy_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
