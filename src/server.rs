use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Extension, Router,
    response::Html,
    routing::{get, post},
};

use crate::engine::Recommender;
use crate::management::{AuthGateway, CredentialStore, SessionStore};
use crate::spotify::auth::SpotifyTokenExchange;
use crate::{api, fatal};

/// Composition root of the service: every handler reaches its
/// collaborators through this, nothing lives in ambient globals.
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub sessions: Arc<SessionStore>,
    pub gateway: AuthGateway<SpotifyTokenExchange>,
    pub recommender: Recommender,
    pub dataset: PathBuf,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/auth-status", get(api::auth_status))
        .route("/logout", get(api::logout))
        .route("/refresh-token", get(api::refresh_token))
        .route("/current-song", get(api::current_song))
        .route("/recommend-and-queue", get(api::recommend_and_queue))
        .route("/queue-random-song", post(api::queue_random_song))
        .layer(Extension(state))
}

// The real front end is served separately; this keeps redirects to "/"
// from dead-ending when the service runs on its own.
async fn index() -> Html<&'static str> {
    Html(
        "<h2>crossq</h2>\
         <p><a href=\"/login\">Log in with Spotify</a> · \
         <a href=\"/auth-status\">Auth status</a> · \
         <a href=\"/recommend-and-queue\">Recommend &amp; queue</a></p>",
    )
}

pub async fn serve(addr: &str, state: Arc<AppState>) {
    let app = build_router(state);

    let addr = match SocketAddr::from_str(addr) {
        Ok(addr) => addr,
        Err(e) => fatal!("Failed to parse server address: {}", e),
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => fatal!("Failed to bind {}: {}", addr, e),
    };

    if let Err(e) = axum::serve(listener, app).await {
        fatal!("Server terminated: {}", e);
    }
}
