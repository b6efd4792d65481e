//! The shared book catalog.
//!
//! Loaded once from a CSV export at startup and held in memory; every
//! request searches and paginates over the same immutable snapshot.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{CatalogError, CatalogResult};
pub use manager::BookCatalog;
pub use models::Book;
