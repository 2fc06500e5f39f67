//! # API Module
//!
//! HTTP endpoints of the crossfade queue service.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - starts the Spotify authorization-code flow
//! - [`callback`] - completes it: state check, code exchange, session setup
//! - [`auth_status`] - plain-text probe used by the front end
//! - [`logout`] - destroys session and credential
//! - [`refresh_token`] - explicit, unconditional token refresh
//!
//! ### Player
//!
//! - [`current_song`] - summary of the currently playing track
//! - [`recommend_and_queue`] - the full recommend-and-queue pipeline
//! - [`queue_random_song`] - queues a random dataset entry
//!
//! ### Monitoring
//!
//! - [`health`] - status and version for monitoring systems
//!
//! All handlers take shared state via `Extension` and the session via the
//! cookie jar; failures map through [`crate::error::ApiError`], with the
//! song endpoints additionally naming the best-known track title in their
//! error bodies.

mod auth;
mod health;
mod player;

pub use auth::{SESSION_COOKIE, auth_status, callback, login, logout, refresh_token};
pub use health::health;
pub use player::{current_song, queue_random_song, recommend_and_queue};
