use serde::{Deserialize, Serialize};

/// Token refresh safety margin in seconds. A credential counts as expired
/// slightly before the provider's own deadline so a request never starts
/// with a token that dies mid-flight.
pub const EXPIRY_BUFFER_SECS: i64 = 60;

/// Access/refresh token pair for one authenticated user.
///
/// Owned exclusively by the credential store; mutated only by the auth
/// gateway's refresh path; destroyed on logout or refresh failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredential {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp after which the access token is no longer usable.
    pub expires_at: i64,
}

impl UserCredential {
    /// Builds a credential from a token-exchange response, stamping the
    /// absolute expiry from the relative `expires_in`.
    pub fn from_response(user_id: &str, response: &TokenResponse, fallback_refresh: &str) -> Self {
        UserCredential {
            user_id: user_id.to_string(),
            access_token: response.access_token.clone(),
            refresh_token: response
                .refresh_token
                .clone()
                .unwrap_or_else(|| fallback_refresh.to_string()),
            expires_at: chrono::Utc::now().timestamp() + response.expires_in as i64,
        }
    }

    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - EXPIRY_BUFFER_SECS
    }
}

/// Body of a successful token exchange (authorization code or refresh).
///
/// Spotify omits `refresh_token` on most refresh responses; the gateway
/// preserves the stored one in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlayingResponse {
    pub item: Option<TrackObject>,
    pub is_playing: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackObject {
    pub name: String,
    pub uri: String,
    pub artists: Vec<TrackArtist>,
    pub album: AlbumRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchTracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracks {
    pub items: Vec<TrackObject>,
}

/// One catalog entry eligible for matching, read-only once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub display_name: String,
    pub artist_names: Vec<String>,
    pub album_name: String,
    pub external_uri: String,
}

impl From<TrackObject> for Candidate {
    fn from(track: TrackObject) -> Self {
        Candidate {
            display_name: track.name,
            artist_names: track.artists.into_iter().map(|a| a.name).collect(),
            album_name: track.album.name,
            external_uri: track.uri,
        }
    }
}

/// Result of candidate selection: the winning candidate and its similarity
/// score in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct MatchDecision {
    pub candidate: Candidate,
    pub score: f64,
}

/// Compact track representation used in JSON replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSummary {
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
}

impl From<&TrackObject> for TrackSummary {
    fn from(track: &TrackObject) -> Self {
        TrackSummary {
            name: track.name.clone(),
            artists: track.artists.iter().map(|a| a.name.clone()).collect(),
            album: track.album.name.clone(),
        }
    }
}

impl From<&Candidate> for TrackSummary {
    fn from(candidate: &Candidate) -> Self {
        TrackSummary {
            name: candidate.display_name.clone(),
            artists: candidate.artist_names.clone(),
            album: candidate.album_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueReply {
    pub message: String,
    pub uri: String,
    pub best_match_name: String,
    pub track: TrackSummary,
}
