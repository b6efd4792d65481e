//! Book API handlers: the shared catalog and the per-user shelf.
//!
//! All routes here sit behind the auth gate; the caller's identity comes
//! from the [`TokenPayload`] the gate put in request extensions.

use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookstack::auth::TokenPayload;
use bookstack::catalog::Book;
use bookstack::shelf::ShelfError;
use serde::{Deserialize, Serialize};

use super::{AppState, MessageResponse};

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Page size; kept as a string so a malformed value is a clean 400
    /// instead of a framework rejection.
    pub limit: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "searchQuery")]
    pub search_query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddBooksPayload {
    pub books: Vec<Book>,
}

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub message: String,
    pub books: Vec<Book>,
}

fn shelf_error(err: ShelfError) -> (StatusCode, Json<MessageResponse>) {
    tracing::error!(error = %err, "shelf request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse::new("Internal Server Error")),
    )
}

/// Search the shared catalog with pagination.
///
/// `limit` and `page` are required; `searchQuery` optionally filters on
/// title, authors and publisher (case-insensitive substring).
///
/// # Errors
///
/// - `400 Bad Request`: missing or non-numeric `limit`/`page`
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<BooksResponse>, (StatusCode, Json<MessageResponse>)> {
    let limit = query.limit.as_deref().and_then(|v| v.parse::<usize>().ok());
    let page = query.page.as_deref().and_then(|v| v.parse::<usize>().ok());

    let (Some(limit), Some(page)) = (limit, page) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::new("Invalid limit or page parameter")),
        ));
    };

    let books = state.catalog.query(query.search_query.as_deref(), limit, page);
    Ok(Json(BooksResponse {
        message: "Books fetched successfully".to_string(),
        books,
    }))
}

/// List the caller's shelf. An empty shelf is a 200 with an empty list,
/// not an error.
pub async fn list_user_books(
    State(state): State<AppState>,
    Extension(payload): Extension<TokenPayload>,
) -> Result<Json<BooksResponse>, (StatusCode, Json<MessageResponse>)> {
    let books = state
        .shelf
        .books(payload.user_id)
        .await
        .map_err(shelf_error)?;

    let message = if books.is_empty() {
        "No books found for user"
    } else {
        "Books fetched successfully for user"
    };

    Ok(Json(BooksResponse {
        message: message.to_string(),
        books,
    }))
}

/// Add a batch of catalog records to the caller's shelf. Re-adding an
/// already-shelved book refreshes the stored copy.
pub async fn add_user_books(
    State(state): State<AppState>,
    Extension(payload): Extension<TokenPayload>,
    Json(body): Json<AddBooksPayload>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, Json<MessageResponse>)> {
    state
        .shelf
        .add_books(payload.user_id, &body.books)
        .await
        .map_err(shelf_error)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Book(s) added successfully")),
    ))
}

/// Remove one book from the caller's shelf.
///
/// Returns `200` with a message when the book was present, `204` when there
/// was nothing to delete.
pub async fn delete_user_book(
    State(state): State<AppState>,
    Extension(payload): Extension<TokenPayload>,
    Path(book_id): Path<String>,
) -> Result<Response, (StatusCode, Json<MessageResponse>)> {
    let removed = state
        .shelf
        .remove_book(payload.user_id, &book_id)
        .await
        .map_err(shelf_error)?;

    if removed {
        Ok((
            StatusCode::OK,
            Json(MessageResponse::new("Book deleted successfully")),
        )
            .into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
