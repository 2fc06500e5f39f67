use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::types::UserCredential;

/// In-memory keyed store of per-user credentials.
///
/// The entry for a user id is shared, mutable state visited by every
/// protected request for that user; mutations are immediately visible to
/// all holders of the same id. Nothing is persisted, lifetime is the
/// lifetime of the process.
///
/// Alongside the entries the store keeps one async mutex per user id. The
/// gateway holds that mutex across a refresh so two requests that both see
/// an expired token never reach the token-exchange collaborator twice.
pub struct CredentialStore {
    entries: Mutex<HashMap<String, UserCredential>>,
    refresh_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        CredentialStore {
            entries: Mutex::new(HashMap::new()),
            refresh_locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn put(&self, user_id: &str, credential: UserCredential) {
        let mut entries = self.entries.lock().await;
        entries.insert(user_id.to_string(), credential);
    }

    /// Returns a clone of the stored credential, or `None` for an unknown
    /// user. Callers treat `None` as "not authenticated", not as retryable.
    pub async fn get(&self, user_id: &str) -> Option<UserCredential> {
        let entries = self.entries.lock().await;
        entries.get(user_id).cloned()
    }

    pub async fn remove(&self, user_id: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(user_id);
        let mut locks = self.refresh_locks.lock().await;
        locks.remove(user_id);
    }

    /// Hands out the per-user refresh lock, creating it on first use.
    ///
    /// The lock itself is returned by value so the store's own map lock is
    /// released before anyone waits on a refresh.
    pub async fn refresh_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.refresh_locks.lock().await;
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}
