use reqwest::Client;

use crate::config;
use crate::error::ApiError;
use crate::types::{SearchResponse, TrackObject};

/// Searches the catalog for tracks matching a free-text query.
///
/// Returns the result items in the order the catalog ranked them; the
/// matcher depends on that order for its first-wins tie-break, so it is
/// never re-sorted here.
pub async fn search_tracks(
    token: &str,
    query: &str,
    limit: u32,
) -> Result<Vec<TrackObject>, ApiError> {
    let api_url = format!("{url}/search", url = &config::spotify_apiurl());
    let limit = limit.to_string();

    let client = Client::new();
    let response = client
        .get(&api_url)
        .query(&[("q", query), ("type", "track"), ("limit", &limit)])
        .bearer_auth(token)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Upstream(format!(
            "search returned {}: {}",
            status, body
        )));
    }

    let json = response.json::<SearchResponse>().await?;
    Ok(json.tracks.items)
}
