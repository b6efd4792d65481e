//! Book-cataloging HTTP server.
//!
//! Wires configuration, the PostgreSQL pool, the in-memory catalog, and the
//! domain managers into an axum router, then serves until Ctrl-C.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Error};
use bookstack::{
    auth::{AuthManager, TokenCodec},
    catalog::BookCatalog,
    db::{Database, PgShelfStore, PgTaskStore, PgUserStore},
    shelf::ShelfManager,
    tasks::TaskManager,
};
use bs_server::{api, config::ServerConfig, logging, metrics};
use pico_args::Arguments;
use tracing::info;

const HELP: &str = "\
Run the bookstack API server

USAGE:
  bs_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/bookstack]
  --books-csv  PATH        Catalog CSV file            [default: env BOOKS_CSV or ./data/books.csv]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string
  ACCESS_TOKEN_SECRET      Access-token signing secret (required)
  REFRESH_TOKEN_SECRET     Refresh-token signing secret (required, distinct)
  BOOKS_CSV                Path to the catalog CSV
  METRICS_BIND             Optional Prometheus exporter address
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let db_url_override: Option<String> = pargs.opt_value_from_str("--db-url")?;
    let books_csv_override: Option<PathBuf> = pargs.opt_value_from_str("--books-csv")?;

    logging::init();

    let config = ServerConfig::from_env(bind_override, db_url_override, books_csv_override)?;
    config.validate()?;

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(Error::msg)?;
        info!("Metrics exporter listening on {addr}");
    }

    info!("Connecting to database: {}", config.database.database_url);
    let db = Database::new(&config.database)
        .await
        .context("Failed to connect to database")?;
    db.ensure_schema()
        .await
        .context("Failed to prepare database schema")?;
    db.health_check()
        .await
        .context("Database health check failed")?;
    info!("Database connected successfully");

    let catalog = BookCatalog::load(&config.books_csv)
        .with_context(|| format!("Failed to load catalog from {}", config.books_csv.display()))?;
    info!("Catalog loaded with {} books", catalog.len());

    let pool = db.pool().clone();
    let codec = TokenCodec::new(
        config.security.access_token_secret.as_bytes(),
        config.security.refresh_token_secret.as_bytes(),
    );

    let state = api::AppState {
        auth: Arc::new(AuthManager::new(
            Arc::new(PgUserStore::new(pool.clone())),
            codec,
        )),
        catalog: Arc::new(catalog),
        shelf: Arc::new(ShelfManager::new(Arc::new(PgShelfStore::new(pool.clone())))),
        tasks: Arc::new(TaskManager::new(Arc::new(PgTaskStore::new(pool)))),
    };

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
