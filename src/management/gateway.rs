use std::future::Future;
use std::sync::Arc;

use crate::error::ApiError;
use crate::types::{TokenResponse, UserCredential};
use crate::warning;

use super::credentials::CredentialStore;
use super::sessions::SessionStore;

/// The token-exchange collaborator.
///
/// The production implementation posts the refresh grant to the identity
/// provider; tests inject counting or failing mocks to pin down the
/// gateway's serialization behavior.
pub trait TokenExchange: Send + Sync {
    fn refresh(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<TokenResponse, ApiError>> + Send;
}

/// Gates every protected operation on a valid access token.
///
/// Reads the stored credential, refreshes it through the collaborator when
/// expired, and tears down credential and sessions when the collaborator
/// rejects the refresh. Refreshes for one user are serialized through the
/// store's per-user lock; a request that waited on the lock re-checks
/// expiry and reuses the first refresher's result instead of exchanging
/// again.
pub struct AuthGateway<X> {
    credentials: Arc<CredentialStore>,
    sessions: Arc<SessionStore>,
    exchange: X,
}

impl<X: TokenExchange> AuthGateway<X> {
    pub fn new(credentials: Arc<CredentialStore>, sessions: Arc<SessionStore>, exchange: X) -> Self {
        AuthGateway {
            credentials,
            sessions,
            exchange,
        }
    }

    /// Returns a non-expired access token for the user.
    ///
    /// The returned token is always the one read *after* the refresh check;
    /// callers must not reuse tokens cached from before this call.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` when no credential is stored, `RefreshFailed` when
    /// the collaborator rejected the refresh (credential and sessions are
    /// destroyed before this returns).
    pub async fn authorize(&self, user_id: &str) -> Result<String, ApiError> {
        let credential = self.credential_or_teardown(user_id).await?;

        if !credential.is_expired() {
            return Ok(credential.access_token);
        }

        let lock = self.credentials.refresh_lock(user_id).await;
        let _guard = lock.lock().await;

        // another request may have finished the refresh while we waited
        let credential = self.credential_or_teardown(user_id).await?;
        if !credential.is_expired() {
            return Ok(credential.access_token);
        }

        self.do_refresh(user_id, credential).await
    }

    /// Refreshes unconditionally, serialized like the implicit path.
    ///
    /// Backs the explicit `/refresh-token` endpoint.
    pub async fn refresh(&self, user_id: &str) -> Result<String, ApiError> {
        let lock = self.credentials.refresh_lock(user_id).await;
        let _guard = lock.lock().await;

        let credential = self.credential_or_teardown(user_id).await?;

        self.do_refresh(user_id, credential).await
    }

    /// Reads the credential, sweeping any sessions that still point at a
    /// user whose credential is gone; gateway failures always leave the
    /// caller fully logged out.
    async fn credential_or_teardown(&self, user_id: &str) -> Result<UserCredential, ApiError> {
        match self.credentials.get(user_id).await {
            Some(credential) => Ok(credential),
            None => {
                self.sessions.remove_user(user_id).await;
                Err(ApiError::Unauthenticated)
            }
        }
    }

    /// Performs one exchange while the caller holds the per-user lock.
    async fn do_refresh(
        &self,
        user_id: &str,
        credential: UserCredential,
    ) -> Result<String, ApiError> {
        match self.exchange.refresh(&credential.refresh_token).await {
            Ok(response) => {
                let updated =
                    UserCredential::from_response(user_id, &response, &credential.refresh_token);
                let access_token = updated.access_token.clone();
                self.credentials.put(user_id, updated).await;
                Ok(access_token)
            }
            Err(e) => {
                warning!("Token refresh for user {} rejected: {}", user_id, e);
                self.credentials.remove(user_id).await;
                self.sessions.remove_user(user_id).await;
                Err(ApiError::RefreshFailed)
            }
        }
    }
}
