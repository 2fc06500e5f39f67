use reqwest::Client;

use crate::config;
use crate::error::ApiError;
use crate::types::UserProfile;

/// Fetches the authenticated user's profile.
///
/// Called once per login, right after the code exchange; the profile id
/// keys the credential store and the session registry.
pub async fn current_user(token: &str) -> Result<UserProfile, ApiError> {
    let api_url = format!("{url}/me", url = &config::spotify_apiurl());

    let client = Client::new();
    let response = client.get(&api_url).bearer_auth(token).send().await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Upstream(format!(
            "profile fetch returned {}: {}",
            status, body
        )));
    }

    Ok(response.json::<UserProfile>().await?)
}
