//! PostgreSQL connection pooling and storage traits.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

pub mod config;
pub mod repository;

pub use config::DatabaseConfig;
pub use repository::{
    PgShelfStore, PgTaskStore, PgUserStore, ShelfStore, TaskStore, UserStore,
};

/// Statements run at startup. All are idempotent so restarting against an
/// existing database is safe.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        email         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role          TEXT NOT NULL DEFAULT 'user',
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS user_books (
        user_id            UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        book_id            TEXT NOT NULL,
        title              TEXT NOT NULL DEFAULT '',
        authors            TEXT NOT NULL DEFAULT '',
        average_rating     TEXT NOT NULL DEFAULT '',
        isbn               TEXT NOT NULL DEFAULT '',
        isbn13             TEXT NOT NULL DEFAULT '',
        language_code      TEXT NOT NULL DEFAULT '',
        num_pages          TEXT NOT NULL DEFAULT '',
        ratings_count      TEXT NOT NULL DEFAULT '',
        text_reviews_count TEXT NOT NULL DEFAULT '',
        publication_date   TEXT NOT NULL DEFAULT '',
        publisher          TEXT NOT NULL DEFAULT '',
        price              TEXT NOT NULL DEFAULT '',
        PRIMARY KEY (user_id, book_id)
    )",
    "CREATE TABLE IF NOT EXISTS user_tasks (
        task_id     UUID PRIMARY KEY,
        user_id     UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title       TEXT NOT NULL,
        description TEXT NOT NULL,
        due_date    TEXT NOT NULL,
        status      TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_user_tasks_user ON user_tasks (user_id)",
];

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new connection pool.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the schema if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Check that the database answers a trivial query.
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the connection pool.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
