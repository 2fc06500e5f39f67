use std::path::Path;

use crate::config;
use crate::error::ApiError;
use crate::utils;

use super::runner::{EngineRunner, RunOutcome};

/// Turns a source title into a single recommended title by delegating to
/// the external engine and classifying its informal text output.
///
/// The engine's protocol: exactly one line of useful text on standard
/// output on success; diagnostics on standard error; "not found" and error
/// markers on standard output when the source title has no match. That
/// protocol is untrusted, so classification is explicit and the marker set
/// is configurable rather than assumed.
pub struct Recommender {
    runner: EngineRunner,
    not_found_markers: Vec<String>,
}

impl Recommender {
    pub fn new(runner: EngineRunner, not_found_markers: Vec<String>) -> Self {
        Recommender {
            runner,
            not_found_markers,
        }
    }

    pub fn from_config() -> Self {
        let runner = EngineRunner::new(
            config::engine_command(),
            config::engine_script(),
            config::engine_timeout(),
            config::engine_max_runs(),
        );
        let markers = utils::parse_marker_list(&config::engine_not_found_markers());
        Recommender::new(runner, markers)
    }

    /// Recommends a follow-up title for the given source title.
    ///
    /// The source title is sanitized (trailing parenthetical stripped,
    /// whitespace trimmed) before the engine sees it; the recommendation
    /// comes back with any trailing audio file extension stripped.
    pub async fn recommend(&self, source_title: &str, dataset: &Path) -> Result<String, ApiError> {
        let cleaned = utils::strip_trailing_parenthetical(source_title);

        match self.runner.run(&cleaned, dataset).await {
            RunOutcome::LaunchError(e) => Err(ApiError::EngineUnavailable(e.to_string())),
            RunOutcome::TimedOut => Err(ApiError::EngineTimeout),
            RunOutcome::Completed {
                status,
                stdout,
                stderr,
            } => {
                if !status.success() {
                    return Err(ApiError::EngineFailure {
                        status: status.code().unwrap_or(-1),
                        stderr: stderr.trim().to_string(),
                    });
                }

                let text = stdout.trim();
                if text.is_empty() {
                    return Err(ApiError::EmptyResult);
                }

                let lowered = text.to_lowercase();
                if lowered.starts_with("error")
                    || self.not_found_markers.iter().any(|m| lowered.contains(m))
                {
                    return Err(ApiError::EngineNotFound { title: cleaned });
                }

                Ok(utils::strip_audio_extension(text))
            }
        }
    }
}
