//! Authentication data models.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. New registrations always start as [`Role::User`];
/// promotion happens out of band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl From<&str> for Role {
    /// Unknown values fall back to the least-privileged role.
    fn from(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// A registered account. The password hash is deliberately not part of this
/// type; it stays at the store layer and never travels with the user record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// Claims embedded in both access and refresh tokens.
///
/// `exp` drives expiry checks during verification; everything else is a
/// snapshot of the user at issuance time. Renewal re-resolves the user from
/// the store, so stale `role`/`email` snapshots are refreshed on the next
/// access token rather than trusted forever.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub username: String,
    pub role: Role,
    pub user_id: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl TokenPayload {
    pub fn new(user: &User, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            username: user.username.clone(),
            role: user.role,
            user_id: user.id,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Parameters for creating an account.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Parameters for logging in.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Which kind of client is talking to us, and therefore how the refresh
/// token must be delivered. The literal string `"app"` selects [`App`];
/// anything else, including absence, is [`Web`].
///
/// [`App`]: ClientKind::App
/// [`Web`]: ClientKind::Web
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ClientKind {
    #[default]
    Web,
    App,
}

impl ClientKind {
    /// Resolve from an optional query/body value.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("app") => ClientKind::App,
            _ => ClientKind::Web,
        }
    }
}

impl From<String> for ClientKind {
    fn from(value: String) -> Self {
        ClientKind::from_param(Some(value.as_str()))
    }
}

/// How the refresh token leaves the server. The two channels are mutually
/// exclusive: a session never produces both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshDelivery {
    /// App clients get the token in the response body and store it
    /// themselves.
    Body { refresh_token: String },
    /// Web clients get an HTTP-only cookie and never see the token from
    /// script.
    Cookie { refresh_token: String },
}

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub user: User,
    pub access_token: String,
    pub delivery: RefreshDelivery,
}

/// Result of a successful refresh renewal. Only the access token is new;
/// the refresh token the client presented stays as-is.
#[derive(Debug, Clone)]
pub struct RenewedAccess {
    pub user: User,
    pub access_token: String,
}
