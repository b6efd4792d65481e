//! Task error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type TaskResult<T> = Result<T, TaskError>;
