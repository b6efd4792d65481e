//! HTTP server for the bookstack backend.
//!
//! Exposed as a library so integration tests can build the router directly;
//! the binary entry point lives in `main.rs`.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
