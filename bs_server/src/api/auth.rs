//! Authentication API handlers.
//!
//! Four endpoints: register, login, access-token renewal, and sign-out.
//! Register and login issue an access token plus a refresh token; how the
//! refresh token travels depends on the client kind in the request. Web
//! clients (the default) get an HTTP-only cookie, app clients
//! (`"client": "app"`) get it in the response body.
//!
//! # Examples
//!
//! Register a new user:
//! ```bash
//! curl -X POST http://localhost:8080/api/auth/register \
//!   -H "Content-Type: application/json" \
//!   -d '{"username": "alice", "email": "alice@example.com", "password": "Pass123!"}'
//! ```
//!
//! Renew an access token (app channel):
//! ```bash
//! curl "http://localhost:8080/api/auth/renewaccesstoken?client=app&refreshToken=eyJ..."
//! ```

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use bookstack::auth::{
    AuthError, ClientKind, IssuedSession, LoginRequest, RefreshDelivery, RegisterRequest, Role,
    User,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AppState, MessageResponse};
use crate::metrics;

/// Cookie carrying the web-channel refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub client: ClientKind,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub client: ClientKind,
}

#[derive(Debug, Deserialize)]
pub struct RenewParams {
    pub client: Option<String>,
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

/// Public view of a user, embedded in auth responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserDetails {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: String,
    pub access_token: String,
    /// Present only for app clients; web clients get the cookie instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user_details: UserDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewResponse {
    pub message: String,
    pub access_token: String,
    pub user_details: UserDetails,
}

/// Map a domain error to its HTTP response. Internal failures are logged
/// here with full detail and leave as a sanitized 500.
fn auth_error(err: AuthError) -> (StatusCode, Json<MessageResponse>) {
    let status = match &err {
        AuthError::InvalidCredentials => StatusCode::FORBIDDEN,
        AuthError::NotFound => StatusCode::NOT_FOUND,
        AuthError::Conflict => StatusCode::BAD_REQUEST,
        AuthError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        AuthError::Database(_) | AuthError::Hashing | AuthError::Signing(_) => {
            tracing::error!(error = %err, "auth request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(MessageResponse::new(err.client_message())))
}

/// Build the refresh cookie. Sign-out must clear with the same name and
/// path or browsers will keep the stale copy.
fn refresh_cookie(token: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .path("/")
        .http_only(true)
        .build()
}

/// Fold an issued session into the response triple, routing the refresh
/// token to cookie or body according to its delivery.
fn session_response(
    status: StatusCode,
    message: &str,
    session: IssuedSession,
    jar: CookieJar,
) -> (StatusCode, CookieJar, Json<AuthResponse>) {
    let (jar, refresh_token) = match session.delivery {
        RefreshDelivery::Body { refresh_token } => (jar, Some(refresh_token)),
        RefreshDelivery::Cookie { refresh_token } => (jar.add(refresh_cookie(refresh_token)), None),
    };

    (
        status,
        jar,
        Json(AuthResponse {
            message: message.to_string(),
            access_token: session.access_token,
            refresh_token,
            user_details: UserDetails::from(&session.user),
        }),
    )
}

/// Register a new account and immediately issue a session for it.
///
/// # Errors
///
/// - `400 Bad Request`: username or email already in use
/// - `500 Internal Server Error`: database or hashing failure
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), (StatusCode, Json<MessageResponse>)> {
    let client = payload.client;
    let request = RegisterRequest {
        username: payload.username,
        email: payload.email,
        password: payload.password,
    };

    match state.auth.register(request, client).await {
        Ok(session) => {
            metrics::registrations_total(true);
            Ok(session_response(
                StatusCode::CREATED,
                "User registered successfully",
                session,
                jar,
            ))
        }
        Err(err) => {
            metrics::registrations_total(false);
            Err(auth_error(err))
        }
    }
}

/// Authenticate a username/password pair and issue a session.
///
/// # Errors
///
/// - `404 Not Found`: no account with that username
/// - `403 Forbidden`: wrong password
/// - `500 Internal Server Error`: database or hashing failure
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), (StatusCode, Json<MessageResponse>)> {
    let client = payload.client;
    let request = LoginRequest {
        username: payload.username,
        password: payload.password,
    };

    match state.auth.login(request, client).await {
        Ok(session) => {
            metrics::login_attempts_total(true);
            Ok(session_response(
                StatusCode::OK,
                "Login successful",
                session,
                jar,
            ))
        }
        Err(err) => {
            metrics::login_attempts_total(false);
            Err(auth_error(err))
        }
    }
}

/// Exchange a refresh token for a new access token.
///
/// Web clients present the token via the `refresh_token` cookie; app
/// clients pass `?client=app&refreshToken=...`. The refresh token itself is
/// not rotated, so the client keeps using the one it has until it expires.
///
/// # Errors
///
/// - `401 Unauthorized`: missing, expired, or invalid refresh token
/// - `404 Not Found`: the token's user no longer exists
pub async fn renew_access_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<RenewParams>,
) -> Result<Json<RenewResponse>, (StatusCode, Json<MessageResponse>)> {
    let presented = match ClientKind::from_param(params.client.as_deref()) {
        ClientKind::App => params.refresh_token,
        ClientKind::Web => jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()),
    };

    let Some(token) = presented else {
        metrics::token_renewals_total(false);
        return Err(auth_error(AuthError::Unauthenticated(
            "No refresh token provided".to_string(),
        )));
    };

    match state.auth.renew(&token).await {
        Ok(renewed) => {
            metrics::token_renewals_total(true);
            Ok(Json(RenewResponse {
                message: "Access token renewed successfully".to_string(),
                access_token: renewed.access_token,
                user_details: UserDetails::from(&renewed.user),
            }))
        }
        Err(err) => {
            metrics::token_renewals_total(false);
            Err(auth_error(err))
        }
    }
}

/// Clear the refresh cookie.
///
/// Sessions are stateless, so this is the whole of sign-out: the cookie
/// copy goes away, but a refresh token a client kept in its own storage
/// stays valid until it expires. Idempotent; signing out twice is fine.
pub async fn signout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let mut removal = Cookie::new(REFRESH_COOKIE, "");
    removal.set_path("/");
    removal.set_http_only(true);

    (
        jar.remove(removal),
        Json(MessageResponse::new("Signed out successfully")),
    )
}
