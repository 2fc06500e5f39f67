use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;

use crate::{
    error::ApiError, server::AppState, spotify, success, types::UserCredential, utils, warning,
};

pub const SESSION_COOKIE: &str = "crossq_session";
const STATE_COOKIE: &str = "crossq_oauth_state";

/// Resolves the session cookie to a user id, if the session is alive.
pub(super) async fn session_user(state: &AppState, jar: &CookieJar) -> Option<String> {
    let session_id = jar.get(SESSION_COOKIE)?.value().to_string();
    state.sessions.lookup(&session_id).await
}

/// Starts the authorization-code flow: remembers a random `state` in a
/// short-lived cookie and redirects to the identity provider.
pub async fn login(jar: CookieJar) -> (CookieJar, Redirect) {
    let state = utils::generate_state_param();
    let url = spotify::auth::authorize_url(&state);

    let jar = jar.add(
        Cookie::build((STATE_COOKIE, state))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .build(),
    );

    (jar, Redirect::to(&url))
}

/// Completes the authorization-code flow.
///
/// Validates the echoed `state` against the cookie, exchanges the code,
/// fetches the profile whose id keys the credential store, registers a
/// session, and lands the browser back on the root page.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let Some(code) = params.get("code") else {
        return (StatusCode::BAD_REQUEST, "Missing authorization code.").into_response();
    };

    let expected_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    if expected_state.is_none() || params.get("state") != expected_state.as_ref() {
        return (StatusCode::BAD_REQUEST, "Authorization state mismatch.").into_response();
    }

    let token = match spotify::auth::exchange_code(code).await {
        Ok(token) => token,
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Token exchange failed.").into_response();
        }
    };

    let profile = match spotify::user::current_user(&token.access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            warning!("Profile fetch after token exchange failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Login failed.").into_response();
        }
    };

    if token.refresh_token.is_none() {
        warning!(
            "Token exchange for user {} returned no refresh token",
            profile.id
        );
    }

    let credential = UserCredential::from_response(&profile.id, &token, "");
    state.credentials.put(&profile.id, credential).await;
    let session_id = state.sessions.create(&profile.id).await;
    success!("User {} authenticated", profile.id);

    let jar = jar
        .remove(Cookie::build((STATE_COOKIE, "")).path("/").build())
        .add(
            Cookie::build((SESSION_COOKIE, session_id))
                .http_only(true)
                .same_site(SameSite::Lax)
                .path("/")
                .build(),
        );

    (jar, Redirect::to("/")).into_response()
}

pub async fn auth_status(Extension(state): Extension<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(user_id) = session_user(&state, &jar).await {
        if state.credentials.get(&user_id).await.is_some() {
            return (StatusCode::OK, "Authenticated").into_response();
        }
    }
    (StatusCode::UNAUTHORIZED, "Not Authenticated").into_response()
}

/// Destroys the session and the stored credential, then clears the cookie.
pub async fn logout(Extension(state): Extension<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let session_id = cookie.value().to_string();
        if let Some(user_id) = state.sessions.lookup(&session_id).await {
            state.credentials.remove(&user_id).await;
            state.sessions.remove_user(&user_id).await;
        }
        state.sessions.remove(&session_id).await;
    }

    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    (jar, Redirect::to("/")).into_response()
}

/// Explicit refresh, bypassing the expiry check.
///
/// Exchange failures answer 500 here (not the implicit path's 401); the
/// gateway has already torn down credential and session either way.
pub async fn refresh_token(Extension(state): Extension<Arc<AppState>>, jar: CookieJar) -> Response {
    let Some(user_id) = session_user(&state, &jar).await else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "No session" })),
        )
            .into_response();
    };

    match state.gateway.refresh(&user_id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "message": "Token refreshed" })),
        )
            .into_response(),
        Err(ApiError::Unauthenticated) => ApiError::Unauthenticated.into_response(),
        Err(e) => {
            warning!("Explicit refresh for user {} failed: {}", user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
