//! Catalog error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The CSV file could not be opened or parsed.
    #[error("Failed to load catalog from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
