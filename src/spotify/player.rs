use reqwest::{Client, StatusCode};

use crate::config;
use crate::error::ApiError;
use crate::types::{CurrentlyPlayingResponse, TrackObject};

/// Fetches the user's currently playing track.
///
/// Spotify answers 204 with an empty body when nothing is playing; that and
/// a playing response without an item both come back as `None` rather than
/// as an error, since "no song" is an expected state.
pub async fn currently_playing(token: &str) -> Result<Option<TrackObject>, ApiError> {
    let api_url = format!(
        "{url}/me/player/currently-playing",
        url = &config::spotify_apiurl()
    );

    let client = Client::new();
    let response = client.get(&api_url).bearer_auth(token).send().await?;

    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Upstream(format!(
            "currently-playing returned {}: {}",
            status, body
        )));
    }

    let json = response.json::<CurrentlyPlayingResponse>().await?;
    Ok(json.item)
}

/// Submits a track URI to the user's playback queue.
///
/// One shot, no retry: a non-success status (no active device, account tier
/// without queueing, etc.) surfaces as `QueueRejected` with the
/// collaborator's own words, and the caller passes it on with candidate
/// context so the rejection is actionable.
pub async fn queue_track(token: &str, uri: &str) -> Result<(), ApiError> {
    let api_url = format!("{url}/me/player/queue", url = &config::spotify_apiurl());

    let client = Client::new();
    let response = client
        .post(&api_url)
        .query(&[("uri", uri)])
        .bearer_auth(token)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::QueueRejected { status, body });
    }

    Ok(())
}
