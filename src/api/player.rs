use std::sync::Arc;

use axum::{
    Extension, Json,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use rand::Rng;
use serde_json::json;

use crate::{
    error::ApiError,
    info, matcher,
    server::AppState,
    spotify, success,
    types::{Candidate, QueueReply, TrackSummary},
    utils, warning,
};

use super::auth::session_user;

const SEARCH_LIMIT: u32 = 10;

/// Failure response for the song endpoints: logs stage and cause, and
/// names the best-known track title so the message stays actionable even
/// when the pipeline died halfway.
fn failure(user_id: &str, stage: &str, best_known: Option<&str>, err: ApiError) -> Response {
    warning!("User {}: {} failed: {}", user_id, stage, err);
    let body = match best_known {
        Some(title) => json!({ "error": err.to_string(), "track": title }),
        None => json!({ "error": err.to_string() }),
    };
    (err.status_code(), Json(body)).into_response()
}

/// Summary of what the user is listening to right now.
///
/// "Nothing playing" is a 200 sentinel here, unlike on the queueing
/// endpoint where it aborts the pipeline.
pub async fn current_song(Extension(state): Extension<Arc<AppState>>, jar: CookieJar) -> Response {
    let Some(user_id) = session_user(&state, &jar).await else {
        return ApiError::Unauthenticated.into_response();
    };
    let token = match state.gateway.authorize(&user_id).await {
        Ok(token) => token,
        Err(e) => return e.into_response(),
    };

    match spotify::player::currently_playing(&token).await {
        Ok(Some(track)) => Json(json!({ "track": TrackSummary::from(&track) })).into_response(),
        Ok(None) => Json(json!({ "message": "No song is currently playing" })).into_response(),
        Err(e) => failure(&user_id, "currently-playing", None, e),
    }
}

/// The full pipeline: currently playing → engine recommendation → catalog
/// search → candidate selection → queue submission.
pub async fn recommend_and_queue(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let Some(user_id) = session_user(&state, &jar).await else {
        return ApiError::Unauthenticated.into_response();
    };
    let token = match state.gateway.authorize(&user_id).await {
        Ok(token) => token,
        Err(e) => return e.into_response(),
    };

    let playing = match spotify::player::currently_playing(&token).await {
        Ok(Some(track)) => track,
        Ok(None) => return failure(&user_id, "currently-playing", None, ApiError::NothingPlaying),
        Err(e) => return failure(&user_id, "currently-playing", None, e),
    };
    let source_title = playing.name.clone();
    info!(
        "User {}: finding a follow-up for \"{}\"",
        user_id, source_title
    );

    let recommended = match state
        .recommender
        .recommend(&source_title, &state.dataset)
        .await
    {
        Ok(title) => title,
        Err(e) => return failure(&user_id, "recommendation engine", Some(&source_title), e),
    };
    info!("User {}: engine suggests \"{}\"", user_id, recommended);

    queue_best_match(&state, &user_id, &recommended).await
}

/// Queues a uniformly random dataset entry, skipping the engine.
pub async fn queue_random_song(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let Some(user_id) = session_user(&state, &jar).await else {
        return ApiError::Unauthenticated.into_response();
    };
    if let Err(e) = state.gateway.authorize(&user_id).await {
        return e.into_response();
    }

    let contents = match async_fs::read_to_string(&state.dataset).await {
        Ok(contents) => contents,
        Err(e) => {
            return failure(
                &user_id,
                "dataset read",
                None,
                ApiError::Dataset(e.to_string()),
            );
        }
    };
    let entries = utils::csv_first_column(&contents);
    if entries.is_empty() {
        return failure(
            &user_id,
            "dataset read",
            None,
            ApiError::Dataset("dataset has no entries".to_string()),
        );
    }

    let pick = rand::rng().random_range(0..entries.len());
    let title = utils::strip_audio_extension(&entries[pick]);
    info!("User {}: random pick \"{}\"", user_id, title);

    queue_best_match(&state, &user_id, &title).await
}

/// Shared tail of both queueing endpoints: search the catalog for the
/// title, select the best candidate, and submit it.
async fn queue_best_match(state: &AppState, user_id: &str, title: &str) -> Response {
    // the engine may have run for a while, so the token is re-read through
    // the gateway here; search and queueing never reuse one cached earlier
    let token = match state.gateway.authorize(user_id).await {
        Ok(token) => token,
        Err(e) => return e.into_response(),
    };

    let candidates: Vec<Candidate> =
        match spotify::search::search_tracks(&token, title, SEARCH_LIMIT).await {
            Ok(tracks) => tracks.into_iter().map(Candidate::from).collect(),
            Err(e) => return failure(user_id, "search", Some(title), e),
        };

    let decision = match matcher::select(title, &candidates) {
        Ok(decision) => decision,
        Err(e) => return failure(user_id, "matching", Some(title), e),
    };

    let token = match state.gateway.authorize(user_id).await {
        Ok(token) => token,
        Err(e) => return e.into_response(),
    };

    if let Err(e) = spotify::player::queue_track(&token, &decision.candidate.external_uri).await {
        return failure(
            user_id,
            "queue submission",
            Some(&decision.candidate.display_name),
            e,
        );
    }

    success!(
        "User {}: queued \"{}\" by {} (score {:.2})",
        user_id,
        decision.candidate.display_name,
        decision.candidate.artist_names.join(", "),
        decision.score
    );

    let reply = QueueReply {
        message: format!(
            "Queued \"{}\" by {}",
            decision.candidate.display_name,
            decision.candidate.artist_names.join(", ")
        ),
        uri: decision.candidate.external_uri.clone(),
        best_match_name: decision.candidate.display_name.clone(),
        track: TrackSummary::from(&decision.candidate),
    };
    Json(reply).into_response()
}
