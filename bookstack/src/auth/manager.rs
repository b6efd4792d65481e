//! Session issuance and renewal.

use std::sync::Arc;

use super::codec::TokenCodec;
use super::errors::{AuthError, AuthResult};
use super::models::{
    ClientKind, IssuedSession, LoginRequest, RefreshDelivery, RegisterRequest, RenewedAccess,
    TokenPayload, User,
};
use super::password;
use crate::db::repository::UserStore;

/// Verifies credentials and issues stateless token pairs.
///
/// Holds no session state of its own: everything a token needs is embedded
/// in the token, and the only persistent state is the user table behind the
/// [`UserStore`].
pub struct AuthManager {
    store: Arc<dyn UserStore>,
    codec: TokenCodec,
}

impl AuthManager {
    pub fn new(store: Arc<dyn UserStore>, codec: TokenCodec) -> Self {
        Self { store, codec }
    }

    /// Verify a username/password pair and issue a session.
    ///
    /// An unknown username and a wrong password are distinct errors
    /// ([`AuthError::NotFound`] vs [`AuthError::InvalidCredentials`]); the
    /// HTTP layer maps them to different status codes.
    pub async fn login(&self, request: LoginRequest, client: ClientKind) -> AuthResult<IssuedSession> {
        let (user, stored_hash) = self
            .store
            .find_by_username(&request.username)
            .await?
            .ok_or(AuthError::NotFound)?;

        // Argon2 verification is CPU-bound; keep it off the async workers.
        let password = request.password;
        let verified =
            tokio::task::spawn_blocking(move || password::verify(&password, &stored_hash))
                .await
                .map_err(|_| AuthError::Hashing)?;
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue(user, client)
    }

    /// Create an account and immediately issue a session for it.
    ///
    /// The pre-check gives a clean [`AuthError::Conflict`] in the common
    /// case; under a concurrent duplicate the store's uniqueness constraints
    /// are the final arbiter and its unique-violation maps to the same
    /// `Conflict`.
    pub async fn register(
        &self,
        request: RegisterRequest,
        client: ClientKind,
    ) -> AuthResult<IssuedSession> {
        let email = request.email.to_lowercase();
        if self.store.exists(&request.username, &email).await? {
            return Err(AuthError::Conflict);
        }

        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || password::hash(&password))
            .await
            .map_err(|_| AuthError::Hashing)?
            .map_err(|_| AuthError::Hashing)?;

        let user = self
            .store
            .create(&request.username, &email, &password_hash)
            .await?;

        self.issue(user, client)
    }

    /// Exchange a valid refresh token for a fresh access token.
    ///
    /// Only the username claim is trusted; the user is re-resolved from the
    /// store so role or email changes since issuance take effect on the new
    /// access token. The presented refresh token is not rotated and stays
    /// valid until its own expiry.
    pub async fn renew(&self, refresh_token: &str) -> AuthResult<RenewedAccess> {
        let claims = self.codec.verify_refresh(refresh_token)?;

        let (user, _) = self
            .store
            .find_by_username(&claims.username)
            .await?
            .ok_or(AuthError::NotFound)?;

        let access_token = self
            .codec
            .sign_access(&TokenPayload::new(&user, TokenCodec::access_ttl()))?;

        Ok(RenewedAccess { user, access_token })
    }

    /// Verify an access token for the request gate.
    pub fn verify_access(&self, token: &str) -> AuthResult<TokenPayload> {
        self.codec.verify_access(token)
    }

    fn issue(&self, user: User, client: ClientKind) -> AuthResult<IssuedSession> {
        let access_token = self
            .codec
            .sign_access(&TokenPayload::new(&user, TokenCodec::access_ttl()))?;
        let refresh_token = self
            .codec
            .sign_refresh(&TokenPayload::new(&user, TokenCodec::refresh_ttl()))?;

        let delivery = match client {
            ClientKind::App => RefreshDelivery::Body { refresh_token },
            ClientKind::Web => RefreshDelivery::Cookie { refresh_token },
        };

        Ok(IssuedSession {
            user,
            access_token,
            delivery,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::db::repository::mock::MemoryUserStore;

    fn manager() -> AuthManager {
        AuthManager::new(
            Arc::new(MemoryUserStore::new()),
            TokenCodec::new(
                b"access-secret-for-tests-0123456789ab",
                b"refresh-secret-for-tests-0123456789a",
            ),
        )
    }

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "S3cure-pass".to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let manager = manager();
        let session = manager
            .register(register_request("alice"), ClientKind::Web)
            .await
            .unwrap();
        assert_eq!(session.user.username, "alice");
        assert_eq!(session.user.role, Role::User);

        let login = manager
            .login(
                LoginRequest {
                    username: "alice".to_string(),
                    password: "S3cure-pass".to_string(),
                },
                ClientKind::Web,
            )
            .await
            .unwrap();
        assert_eq!(login.user.id, session.user.id);

        let claims = manager.verify_access(&login.access_token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.user_id, session.user.id);
    }

    #[tokio::test]
    async fn login_unknown_user_is_not_found() {
        let manager = manager();
        let err = manager
            .login(
                LoginRequest {
                    username: "ghost".to_string(),
                    password: "whatever".to_string(),
                },
                ClientKind::Web,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn login_wrong_password_is_invalid_credentials() {
        let manager = manager();
        manager
            .register(register_request("alice"), ClientKind::Web)
            .await
            .unwrap();
        let err = manager
            .login(
                LoginRequest {
                    username: "alice".to_string(),
                    password: "wrong".to_string(),
                },
                ClientKind::Web,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn duplicate_registration_is_conflict() {
        let manager = manager();
        manager
            .register(register_request("alice"), ClientKind::Web)
            .await
            .unwrap();

        let err = manager
            .register(register_request("alice"), ClientKind::Web)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict));

        // Same email under a different username collides too, and email
        // comparison is case-insensitive.
        let err = manager
            .register(
                RegisterRequest {
                    username: "alice2".to_string(),
                    email: "ALICE@example.com".to_string(),
                    password: "S3cure-pass".to_string(),
                },
                ClientKind::Web,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn delivery_channel_follows_client_kind() {
        let manager = manager();
        let session = manager
            .register(register_request("webber"), ClientKind::Web)
            .await
            .unwrap();
        assert!(matches!(session.delivery, RefreshDelivery::Cookie { .. }));

        let session = manager
            .register(register_request("apper"), ClientKind::App)
            .await
            .unwrap();
        assert!(matches!(session.delivery, RefreshDelivery::Body { .. }));
    }

    #[tokio::test]
    async fn renew_issues_access_for_the_same_user() {
        let manager = manager();
        let session = manager
            .register(register_request("alice"), ClientKind::App)
            .await
            .unwrap();
        let RefreshDelivery::Body { refresh_token } = session.delivery else {
            panic!("app client must get a body delivery");
        };

        let renewed = manager.renew(&refresh_token).await.unwrap();
        assert_eq!(renewed.user.id, session.user.id);
        let claims = manager.verify_access(&renewed.access_token).unwrap();
        assert_eq!(claims.user_id, session.user.id);

        // The refresh token was not rotated: it still renews.
        assert!(manager.renew(&refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn renew_picks_up_role_changes() {
        let store = Arc::new(MemoryUserStore::new());
        let manager = AuthManager::new(
            store.clone(),
            TokenCodec::new(
                b"access-secret-for-tests-0123456789ab",
                b"refresh-secret-for-tests-0123456789a",
            ),
        );
        let session = manager
            .register(register_request("alice"), ClientKind::App)
            .await
            .unwrap();
        let RefreshDelivery::Body { refresh_token } = session.delivery else {
            panic!("app client must get a body delivery");
        };

        store.set_role("alice", Role::Admin);

        let renewed = manager.renew(&refresh_token).await.unwrap();
        assert_eq!(renewed.user.role, Role::Admin);
        let claims = manager.verify_access(&renewed.access_token).unwrap();
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn renew_rejects_access_tokens_and_garbage() {
        let manager = manager();
        let session = manager
            .register(register_request("alice"), ClientKind::App)
            .await
            .unwrap();

        let err = manager.renew(&session.access_token).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));

        let err = manager.renew("junk").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
    }
}
