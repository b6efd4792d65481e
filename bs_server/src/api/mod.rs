//! HTTP API for the bookstack server.
//!
//! # Modules
//!
//! - [`auth`]: register, login, access-token renewal, sign-out
//! - [`books`]: catalog search plus the per-user shelf
//! - [`tasks`]: per-user reading tasks
//! - [`middleware`]: the auth gate protecting the books/tasks routes
//! - [`request_id`]: `x-request-id` propagation and per-request metrics
//!
//! # Endpoints Overview
//!
//! ## Authentication (no auth required)
//! - `POST /api/auth/register` - Create an account, returns tokens
//! - `POST /api/auth/login` - Login with credentials
//! - `GET  /api/auth/renewaccesstoken` - New access token from a refresh token
//! - `POST /api/auth/signout` - Clear the refresh cookie
//!
//! ## Books (auth required)
//! - `GET    /api/books/list` - Search the shared catalog
//! - `GET    /api/books/user/list` - The caller's shelf
//! - `POST   /api/books/user/add` - Add books to the shelf
//! - `DELETE /api/books/user/delete/{book_id}` - Remove a shelf book
//!
//! ## Tasks (auth required)
//! - `GET    /api/tasks/list` - The caller's tasks
//! - `POST   /api/tasks/add` - Create a task
//! - `PATCH  /api/tasks/edit` - Replace a task's fields
//! - `DELETE /api/tasks/delete/{task_id}` - Remove a task
//!
//! ## Health Check
//! - `GET /health` - Server health status
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod auth;
pub mod books;
pub mod middleware;
pub mod request_id;
pub mod tasks;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, patch, post},
};
use bookstack::{
    auth::AuthManager, catalog::BookCatalog, shelf::ShelfManager, tasks::TaskManager,
};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

/// Application state shared across all handlers. Cloned per request; cheap
/// because every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthManager>,
    pub catalog: Arc<BookCatalog>,
    pub shelf: Arc<ShelfManager>,
    pub tasks: Arc<TaskManager>,
}

/// Single-field JSON body used for every error and for message-only
/// successes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the complete API router with all endpoints and middleware.
///
/// Auth routes are public; everything under `/api/books` and `/api/tasks`
/// sits behind the auth gate. The renew endpoint accepts both GET and POST
/// so web clients can hit it from a plain fetch and app clients from a form
/// post.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route(
            "/api/auth/renewaccesstoken",
            get(auth::renew_access_token).post(auth::renew_access_token),
        )
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/signout", post(auth::signout));

    let protected_routes = Router::new()
        .route("/api/books/list", get(books::list_catalog))
        .route("/api/books/user/list", get(books::list_user_books))
        .route("/api/books/user/add", post(books::add_user_books))
        .route("/api/books/user/delete/{book_id}", delete(books::delete_user_book))
        .route("/api/tasks/list", get(tasks::list_tasks))
        .route("/api/tasks/add", post(tasks::add_task))
        .route("/api/tasks/edit", patch(tasks::edit_task))
        .route("/api/tasks/delete/{task_id}", delete(tasks::delete_task))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_gate,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Deliberately storage-free: it reports that the process is serving, not
/// that every dependency is reachable.
async fn health_check() -> impl IntoResponse {
    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
