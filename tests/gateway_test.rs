use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crossq::error::ApiError;
use crossq::management::{AuthGateway, CredentialStore, SessionStore, TokenExchange};
use crossq::types::{TokenResponse, UserCredential};

// Helper functions to create test credentials
fn expired_credential(user_id: &str) -> UserCredential {
    UserCredential {
        user_id: user_id.to_string(),
        access_token: "stale-access".to_string(),
        refresh_token: "refresh-token-1".to_string(),
        expires_at: chrono::Utc::now().timestamp() - 100,
    }
}

fn fresh_credential(user_id: &str) -> UserCredential {
    UserCredential {
        user_id: user_id.to_string(),
        access_token: "current-access".to_string(),
        refresh_token: "refresh-token-1".to_string(),
        expires_at: chrono::Utc::now().timestamp() + 3600,
    }
}

/// Counts exchange calls and dawdles a little so concurrent callers
/// actually overlap; rotation behavior is configurable per test.
struct CountingExchange {
    calls: Arc<AtomicUsize>,
    rotate_to: Option<String>,
}

impl TokenExchange for CountingExchange {
    async fn refresh(&self, _refresh_token: &str) -> Result<TokenResponse, ApiError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(TokenResponse {
            access_token: format!("fresh-access-{}", call),
            refresh_token: self.rotate_to.clone(),
            scope: None,
            expires_in: 3600,
        })
    }
}

struct FailingExchange;

impl TokenExchange for FailingExchange {
    async fn refresh(&self, _refresh_token: &str) -> Result<TokenResponse, ApiError> {
        Err(ApiError::Upstream("invalid_grant: revoked".to_string()))
    }
}

fn gateway_with<X: TokenExchange>(
    exchange: X,
) -> (Arc<CredentialStore>, Arc<SessionStore>, AuthGateway<X>) {
    let credentials = Arc::new(CredentialStore::new());
    let sessions = Arc::new(SessionStore::new());
    let gateway = AuthGateway::new(Arc::clone(&credentials), Arc::clone(&sessions), exchange);
    (credentials, sessions, gateway)
}

#[tokio::test]
async fn test_concurrent_requests_refresh_exactly_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (credentials, _sessions, gateway) = gateway_with(CountingExchange {
        calls: Arc::clone(&calls),
        rotate_to: None,
    });
    credentials.put("user-1", expired_credential("user-1")).await;

    let gateway = Arc::new(gateway);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let gateway = Arc::clone(&gateway);
        handles.push(tokio::spawn(
            async move { gateway.authorize("user-1").await },
        ));
    }

    let mut tokens = Vec::new();
    for handle in handles {
        tokens.push(handle.await.expect("task panicked").expect("authorize failed"));
    }

    // one exchange call total; every waiter reused the first result
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(tokens.iter().all(|t| t == "fresh-access-0"));
}

#[tokio::test]
async fn test_valid_credential_passes_through_without_refresh() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (credentials, _sessions, gateway) = gateway_with(CountingExchange {
        calls: Arc::clone(&calls),
        rotate_to: None,
    });
    credentials.put("user-1", fresh_credential("user-1")).await;

    let token = gateway.authorize("user-1").await.unwrap();
    assert_eq!(token, "current-access");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_user_is_unauthenticated() {
    let (_credentials, _sessions, gateway) = gateway_with(FailingExchange);

    let result = gateway.authorize("nobody").await;
    assert!(matches!(result, Err(ApiError::Unauthenticated)));
}

#[tokio::test]
async fn test_refresh_failure_destroys_credential_and_sessions() {
    let (credentials, sessions, gateway) = gateway_with(FailingExchange);
    credentials.put("user-1", expired_credential("user-1")).await;
    let session_id = sessions.create("user-1").await;

    let result = gateway.authorize("user-1").await;
    assert!(matches!(result, Err(ApiError::RefreshFailed)));

    // the teardown happened before the error surfaced
    assert!(credentials.get("user-1").await.is_none());
    assert!(sessions.lookup(&session_id).await.is_none());
}

#[tokio::test]
async fn test_forced_refresh_ignores_expiry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (credentials, _sessions, gateway) = gateway_with(CountingExchange {
        calls: Arc::clone(&calls),
        rotate_to: None,
    });
    credentials.put("user-1", fresh_credential("user-1")).await;

    let token = gateway.refresh("user-1").await.unwrap();
    assert_eq!(token, "fresh-access-0");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let stored = credentials.get("user-1").await.unwrap();
    assert_eq!(stored.access_token, "fresh-access-0");
}

#[tokio::test]
async fn test_refresh_preserves_refresh_token_when_response_omits_it() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (credentials, _sessions, gateway) = gateway_with(CountingExchange {
        calls: Arc::clone(&calls),
        rotate_to: None,
    });
    credentials.put("user-1", expired_credential("user-1")).await;

    gateway.authorize("user-1").await.unwrap();

    let stored = credentials.get("user-1").await.unwrap();
    assert_eq!(stored.refresh_token, "refresh-token-1");
    assert!(!stored.is_expired());
}

#[tokio::test]
async fn test_refresh_adopts_rotated_refresh_token() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (credentials, _sessions, gateway) = gateway_with(CountingExchange {
        calls: Arc::clone(&calls),
        rotate_to: Some("refresh-token-2".to_string()),
    });
    credentials.put("user-1", expired_credential("user-1")).await;

    gateway.authorize("user-1").await.unwrap();

    let stored = credentials.get("user-1").await.unwrap();
    assert_eq!(stored.refresh_token, "refresh-token-2");
}

#[tokio::test]
async fn test_store_mutation_visible_to_all_holders() {
    let credentials = Arc::new(CredentialStore::new());
    credentials.put("user-1", fresh_credential("user-1")).await;
    credentials.put("user-2", fresh_credential("user-2")).await;

    // overwriting one user never touches the other
    let mut updated = fresh_credential("user-1");
    updated.access_token = "replaced".to_string();
    credentials.put("user-1", updated).await;

    assert_eq!(
        credentials.get("user-1").await.unwrap().access_token,
        "replaced"
    );
    assert_eq!(
        credentials.get("user-2").await.unwrap().access_token,
        "current-access"
    );

    credentials.remove("user-1").await;
    assert!(credentials.get("user-1").await.is_none());
    assert!(credentials.get("user-2").await.is_some());
}

#[tokio::test]
async fn test_session_store_lifecycle() {
    let sessions = SessionStore::new();

    let first = sessions.create("user-1").await;
    let second = sessions.create("user-1").await;
    let other = sessions.create("user-2").await;
    assert_ne!(first, second);

    assert_eq!(sessions.lookup(&first).await.as_deref(), Some("user-1"));
    assert_eq!(sessions.lookup(&other).await.as_deref(), Some("user-2"));

    // bulk invalidation only hits the targeted user
    sessions.remove_user("user-1").await;
    assert!(sessions.lookup(&first).await.is_none());
    assert!(sessions.lookup(&second).await.is_none());
    assert_eq!(sessions.lookup(&other).await.as_deref(), Some("user-2"));

    sessions.remove(&other).await;
    assert!(sessions.lookup(&other).await.is_none());
}
