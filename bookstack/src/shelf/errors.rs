//! Shelf error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type ShelfResult<T> = Result<T, ShelfError>;
