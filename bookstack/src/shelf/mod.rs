//! Per-user book collections.
//!
//! A shelf is the set of catalog records a user has saved for themselves.
//! Records are keyed by `(user, bookID)`, so re-adding a book updates the
//! stored copy instead of duplicating it.

pub mod errors;
pub mod manager;

pub use errors::{ShelfError, ShelfResult};
pub use manager::ShelfManager;
