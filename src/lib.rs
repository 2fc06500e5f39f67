//! Crossfade Queue Service Library
//!
//! This library implements a small web service that mediates between a
//! Spotify listening session and an external audio-similarity engine. It
//! looks up the currently playing track, asks the engine for the best
//! crossfade follow-up, resolves the engine's informal answer against the
//! Spotify catalog, and queues the winner on the user's active device.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints (auth flow, player operations, health)
//! - `config` - Configuration management and environment variables
//! - `engine` - Supervised invocation of the external recommendation engine
//! - `error` - Request-level error taxonomy and HTTP mapping
//! - `management` - Credential store, session store, and the auth gateway
//! - `matcher` - Deterministic candidate scoring and selection
//! - `server` - Axum router and server startup
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod management;
pub mod matcher;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern for internal plumbing using a
/// boxed dynamic error trait object with Send + Sync bounds for async
/// contexts. Request handlers use [`error::ApiError`] instead, which carries
/// the HTTP mapping.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark.
///
/// Used for request-scoped failures; the process keeps serving. Fatal
/// startup errors use [`fatal!`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// # Behavior
///
/// This macro terminates the process with exit code 1 immediately after
/// printing. It is reserved for unrecoverable startup errors (missing
/// configuration, failure to bind the listener); request handling never
/// calls it.
#[macro_export]
macro_rules! fatal {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues or important information that should be
/// visible in the server log without failing the request.
///
/// # Example
///
/// ```
/// warning!("Token exchange failed: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
