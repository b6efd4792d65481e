//! # Bookstack
//!
//! Backend library for a book-cataloging application. Provides:
//!
//! - [`auth`]: credential verification and stateless JWT session tokens
//!   (short-lived access tokens, long-lived refresh tokens, dual web/app
//!   delivery channels)
//! - [`catalog`]: the shared book catalog, loaded from CSV at startup
//! - [`shelf`]: per-user book collections
//! - [`tasks`]: per-user reading task lists
//! - [`db`]: PostgreSQL pool management and the store traits backing the
//!   managers
//!
//! The HTTP surface lives in the `bs_server` crate; this crate is
//! transport-agnostic.

pub mod auth;
pub mod catalog;
pub mod db;
pub mod shelf;
pub mod tasks;
