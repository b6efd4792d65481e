//! Authentication and session tokens.
//!
//! Sessions are fully stateless: both the access token (15 minutes) and the
//! refresh token (7 days) are self-contained JWTs, signed with two
//! independent secrets so a token of one class can never pass verification
//! as the other. Nothing about a session is persisted server-side, which
//! means there is no revocation short of expiry.
//!
//! [`AuthManager`] is the entry point: it verifies credentials against a
//! [`UserStore`](crate::db::repository::UserStore), issues token pairs
//! through [`TokenCodec`], and renews access tokens from refresh tokens.

pub mod codec;
pub mod errors;
pub mod manager;
pub mod models;
pub mod password;

pub use codec::TokenCodec;
pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{
    ClientKind, IssuedSession, LoginRequest, RefreshDelivery, RegisterRequest, RenewedAccess, Role,
    TokenPayload, User,
};
