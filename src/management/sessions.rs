use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::utils;

/// In-memory session registry.
///
/// A session is a weak reference: the cookie-held id maps to a user id and
/// nothing else, secrets stay in the credential store. Sessions die on
/// logout, on refresh failure, and with the process.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a new session for a user and returns its id.
    pub async fn create(&self, user_id: &str) -> String {
        let session_id = utils::generate_session_id();
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session_id.clone(), user_id.to_string());
        session_id
    }

    pub async fn lookup(&self, session_id: &str) -> Option<String> {
        let sessions = self.sessions.lock().await;
        sessions.get(session_id).cloned()
    }

    pub async fn remove(&self, session_id: &str) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(session_id);
    }

    /// Drops every session pointing at the given user. Called when a
    /// refresh fails, so the next request forces re-authentication.
    pub async fn remove_user(&self, user_id: &str) {
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, owner| owner != user_id);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
