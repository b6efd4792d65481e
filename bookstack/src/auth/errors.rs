//! Authentication error types.

use thiserror::Error;

/// Errors produced by credential verification and token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password did not match the stored hash.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No account exists for the presented username.
    #[error("User not found")]
    NotFound,

    /// Username or email is already taken.
    #[error("Username or email already in use")]
    Conflict,

    /// Token verification failed. Expired, forged and malformed tokens all
    /// land here; callers never learn which.
    #[error("{0}")]
    Unauthenticated(String),

    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Argon2 hashing or verification could not run.
    #[error("Password hashing failed")]
    Hashing,

    /// JWT signing failed.
    #[error("Token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

impl AuthError {
    /// Message safe to return to clients. Internal failures are collapsed so
    /// connection strings and key material never leak into responses.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Database(_) | AuthError::Hashing | AuthError::Signing(_) => {
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_message_hides_internal_detail() {
        let err = AuthError::Database(sqlx::Error::PoolClosed);
        assert_eq!(err.client_message(), "Internal Server Error");
        assert_ne!(err.to_string(), err.client_message());
    }

    #[test]
    fn client_message_passes_through_domain_errors() {
        assert_eq!(AuthError::NotFound.client_message(), "User not found");
        assert_eq!(
            AuthError::Conflict.client_message(),
            "Username or email already in use"
        );
        assert_eq!(
            AuthError::Unauthenticated("No refresh token provided".to_string()).client_message(),
            "No refresh token provided"
        );
    }
}
