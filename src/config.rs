//! Configuration management for the crossfade queue service.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage Spotify API credentials, server settings, and the recommendation
//! engine's invocation parameters.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Looks for the file in the platform-specific local data directory under
/// `crossq/.env`:
/// - Linux: `~/.local/share/crossq/.env`
/// - macOS: `~/Library/Application Support/crossq/.env`
/// - Windows: `%LOCALAPPDATA%/crossq/.env`
///
/// If no file exists there, a `.env` in the working directory is tried as a
/// fallback; a deployment that configures the process environment directly
/// needs neither.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("crossq/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(path).map_err(|e| e.to_string())?;
    } else {
        // no file in the data dir: pick up a local .env if one is around
        let _ = dotenv::dotenv();
    }
    Ok(())
}

/// Returns the address and port the HTTP server binds to.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the Spotify API client ID.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// Returns the Spotify API client secret.
///
/// The secret is only ever sent inside the Basic authorization header of the
/// token exchange; it must never appear in logs or responses.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_SECRET` environment variable is not set.
pub fn spotify_client_secret() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_SECRET").expect("SPOTIFY_API_AUTH_CLIENT_SECRET must be set")
}

/// Returns the OAuth redirect URI registered for this deployment.
///
/// Must match the redirect URI configured in the Spotify application
/// settings, e.g. `http://localhost:8080/callback`.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_REDIRECT_URI` environment variable is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").expect("SPOTIFY_API_REDIRECT_URI must be set")
}

/// Returns the OAuth scope requested during authorization.
///
/// The service needs at least `user-read-currently-playing` and
/// `user-modify-playback-state`.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_SCOPE` environment variable is not set.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").expect("SPOTIFY_API_AUTH_SCOPE must be set")
}

/// Returns the Spotify OAuth authorization URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_URL` environment variable is not set.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").expect("SPOTIFY_API_AUTH_URL must be set")
}

/// Returns the Spotify Web API base URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_URL` environment variable is not set.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").expect("SPOTIFY_API_URL must be set")
}

/// Returns the Spotify OAuth token exchange URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_TOKEN_URL` environment variable is not set.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").expect("SPOTIFY_API_TOKEN_URL must be set")
}

/// Returns the interpreter used to launch the recommendation engine.
///
/// Defaults to `python3` when `ENGINE_COMMAND` is not set.
pub fn engine_command() -> String {
    env::var("ENGINE_COMMAND").unwrap_or_else(|_| "python3".to_string())
}

/// Returns the path of the recommendation engine script.
///
/// # Panics
///
/// Panics if the `ENGINE_SCRIPT` environment variable is not set.
pub fn engine_script() -> PathBuf {
    PathBuf::from(env::var("ENGINE_SCRIPT").expect("ENGINE_SCRIPT must be set"))
}

/// Returns the path of the audio-feature dataset handed to the engine.
///
/// # Panics
///
/// Panics if the `DATASET_PATH` environment variable is not set.
pub fn dataset_path() -> PathBuf {
    PathBuf::from(env::var("DATASET_PATH").expect("DATASET_PATH must be set"))
}

/// Returns the hard wall-clock deadline for one engine invocation.
///
/// Defaults to 30 seconds when `ENGINE_TIMEOUT_SECS` is not set or not a
/// number.
pub fn engine_timeout() -> Duration {
    let secs = env::var("ENGINE_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(30);
    Duration::from_secs(secs)
}

/// Returns the maximum number of concurrently running engine invocations.
///
/// Defaults to 2 when `ENGINE_MAX_RUNS` is not set; a value of 0 is treated
/// as 1.
pub fn engine_max_runs() -> usize {
    env::var("ENGINE_MAX_RUNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(2)
        .max(1)
}

/// Returns the raw comma-separated list of "not found" markers the engine
/// may emit on standard output.
///
/// Defaults to `not found`. Parsed by [`crate::utils::parse_marker_list`].
pub fn engine_not_found_markers() -> String {
    env::var("ENGINE_NOT_FOUND_MARKERS").unwrap_or_else(|_| "not found".to_string())
}
