use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Request-level error taxonomy.
///
/// Every failure a protected operation can run into maps to exactly one
/// variant; handlers turn variants into HTTP responses either through
/// [`IntoResponse`] or, for the song endpoints, through a wrapper that adds
/// the best-known track title for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No session or no stored credential for the user.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The token-exchange collaborator rejected the refresh; credential and
    /// session are already destroyed when this surfaces.
    #[error("Token refresh was rejected, please log in again")]
    RefreshFailed,

    /// The playback endpoint reported no current track.
    #[error("Nothing is currently playing")]
    NothingPlaying,

    /// The engine process could not be launched at all.
    #[error("Recommendation engine could not be launched: {0}")]
    EngineUnavailable(String),

    /// The engine exceeded its wall-clock deadline and was terminated.
    #[error("Recommendation engine timed out")]
    EngineTimeout,

    /// The engine terminated with a non-success status.
    #[error("Recommendation engine failed (status {status}): {stderr}")]
    EngineFailure { status: i32, stderr: String },

    /// The engine terminated normally but wrote no usable text.
    #[error("Recommendation engine produced no output")]
    EmptyResult,

    /// The engine's own output reports the source title has no match.
    #[error("No recommendation found for \"{title}\"")]
    EngineNotFound { title: String },

    /// The catalog search returned an empty candidate list.
    #[error("Search returned no candidates")]
    NoCandidates,

    /// The queue-submission collaborator returned a non-success status,
    /// e.g. no active playback device. Surfaced verbatim, never retried.
    #[error("Queue submission rejected (status {status}): {body}")]
    QueueRejected { status: u16, body: String },

    /// Any unexpected non-2xx or transport failure from a collaborator.
    #[error("Upstream API error: {0}")]
    Upstream(String),

    /// The audio-feature dataset could not be read (random-song path only).
    #[error("Dataset unavailable: {0}")]
    Dataset(String),
}

impl ApiError {
    /// HTTP status for this error.
    ///
    /// The engine timeout deliberately maps to 500 alongside the other
    /// engine failures; auth failures map to 401 after the gateway has torn
    /// the session down, forcing re-authentication.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated | ApiError::RefreshFailed => StatusCode::UNAUTHORIZED,
            ApiError::NothingPlaying | ApiError::EngineNotFound { .. } | ApiError::NoCandidates => {
                StatusCode::NOT_FOUND
            }
            ApiError::EngineUnavailable(_)
            | ApiError::EngineTimeout
            | ApiError::EngineFailure { .. }
            | ApiError::EmptyResult
            | ApiError::QueueRejected { .. }
            | ApiError::Upstream(_)
            | ApiError::Dataset(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
