//! JWT signing and verification.
//!
//! Access and refresh tokens share a claim set but are signed with two
//! independent secrets. A refresh token presented where an access token is
//! expected (or vice versa) fails signature verification exactly like a
//! forgery would.

use chrono::Duration;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

use super::errors::{AuthError, AuthResult};
use super::models::TokenPayload;

/// Holds pre-built keys for both token classes.
pub struct TokenCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl TokenCodec {
    /// Build a codec from the two signing secrets. The secrets must differ;
    /// server configuration enforces that before this is ever called.
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret),
            access_decoding: DecodingKey::from_secret(access_secret),
            refresh_encoding: EncodingKey::from_secret(refresh_secret),
            refresh_decoding: DecodingKey::from_secret(refresh_secret),
        }
    }

    /// Lifetime of an access token.
    pub fn access_ttl() -> Duration {
        Duration::minutes(15)
    }

    /// Lifetime of a refresh token.
    pub fn refresh_ttl() -> Duration {
        Duration::days(7)
    }

    /// Sign an access token (HS256).
    pub fn sign_access(&self, payload: &TokenPayload) -> AuthResult<String> {
        jsonwebtoken::encode(&Header::default(), payload, &self.access_encoding)
            .map_err(AuthError::Signing)
    }

    /// Sign a refresh token (HS256).
    pub fn sign_refresh(&self, payload: &TokenPayload) -> AuthResult<String> {
        jsonwebtoken::encode(&Header::default(), payload, &self.refresh_encoding)
            .map_err(AuthError::Signing)
    }

    /// Verify an access token and return its claims.
    pub fn verify_access(&self, token: &str) -> AuthResult<TokenPayload> {
        Self::decode(token, &self.access_decoding, "Invalid token")
    }

    /// Verify a refresh token and return its claims.
    pub fn verify_refresh(&self, token: &str) -> AuthResult<TokenPayload> {
        Self::decode(token, &self.refresh_decoding, "Invalid refresh token")
    }

    fn decode(token: &str, key: &DecodingKey, message: &str) -> AuthResult<TokenPayload> {
        // Expired, forged and malformed all collapse into one outcome so the
        // caller cannot probe which check failed.
        jsonwebtoken::decode::<TokenPayload>(token, key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::Unauthenticated(message.to_string()))
    }
}
