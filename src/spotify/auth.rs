use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;

use crate::error::ApiError;
use crate::management::TokenExchange;
use crate::types::TokenResponse;
use crate::config;

/// Builds the Spotify authorization URL the login endpoint redirects to.
///
/// The `state` parameter is echoed back by the identity provider and
/// checked against a short-lived cookie in the callback handler.
pub fn authorize_url(state: &str) -> String {
    format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}&state={state}",
        auth_url = &config::spotify_apiauth_url(),
        client_id = &config::spotify_client_id(),
        redirect_uri = &config::spotify_redirect_uri(),
        scope = &config::spotify_scope(),
        state = state
    )
}

/// Exchanges an authorization code for an access/refresh token pair.
///
/// Form-encoded POST with the client id/secret in a Basic authorization
/// header, as the confidential-client flow requires. The authorization code
/// is single-use and short-lived, so the exchange happens immediately in
/// the callback handler.
pub async fn exchange_code(code: &str) -> Result<TokenResponse, ApiError> {
    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .header("Authorization", basic_auth_header())
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &config::spotify_redirect_uri()),
        ])
        .send()
        .await?;

    if !res.status().is_success() {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        return Err(ApiError::Upstream(format!(
            "token exchange returned {}: {}",
            status, body
        )));
    }

    Ok(res.json::<TokenResponse>().await?)
}

/// Exchanges a refresh token for a fresh access token.
///
/// Spotify may omit the refresh token in the response; the gateway keeps
/// the stored one in that case.
pub async fn refresh_access_token(refresh_token: &str) -> Result<TokenResponse, ApiError> {
    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .header("Authorization", basic_auth_header())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    if !res.status().is_success() {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        return Err(ApiError::Upstream(format!(
            "token refresh returned {}: {}",
            status, body
        )));
    }

    Ok(res.json::<TokenResponse>().await?)
}

fn basic_auth_header() -> String {
    let pair = format!(
        "{}:{}",
        config::spotify_client_id(),
        config::spotify_client_secret()
    );
    format!("Basic {}", STANDARD.encode(pair))
}

/// Production token-exchange collaborator used by the auth gateway.
pub struct SpotifyTokenExchange;

impl TokenExchange for SpotifyTokenExchange {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        refresh_access_token(refresh_token).await
    }
}
