//! Authentication gate for protected endpoints.

use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use super::AppState;

/// Require a valid access token on every request passing through.
///
/// Expects `Authorization: Bearer <token>`. On success the decoded
/// [`TokenPayload`](bookstack::auth::TokenPayload) is inserted into request
/// extensions for handlers to extract. Missing header, expired token and
/// forged token all produce the same bare 401; the client learns nothing
/// about which check failed.
pub async fn auth_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    match state.auth.verify_access(token) {
        Ok(payload) => {
            request.extensions_mut().insert(payload);
            Ok(next.run(request).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}
