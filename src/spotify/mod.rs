//! # Spotify Integration Module
//!
//! This module is the service's only integration layer with the Spotify Web
//! API. Each submodule covers one domain of the API surface the service
//! consumes; everything speaks JSON over reqwest and authenticates with a
//! Bearer token obtained from the auth gateway.
//!
//! ## Core Modules
//!
//! - [`auth`] - OAuth 2.0 authorization-code flow for a confidential
//!   client: authorize-URL construction, code exchange, and refresh-token
//!   exchange, both form-encoded POSTs carrying the client id/secret in a
//!   Basic authorization header. Also home of the production
//!   [`auth::SpotifyTokenExchange`] collaborator the gateway refreshes
//!   through.
//! - [`player`] - playback state and queue submission
//!   (`GET /me/player/currently-playing`, `POST /me/player/queue`).
//! - [`search`] - track search (`GET /search`), feeding the candidate
//!   matcher in catalog ranking order.
//! - [`user`] - profile fetch (`GET /me`), which supplies the user id that
//!   keys credentials and sessions.
//!
//! ## Error Handling
//!
//! Unexpected non-2xx statuses become [`crate::error::ApiError::Upstream`]
//! with the raw status and body for postmortems; the one deliberate
//! exception is queue submission, whose rejection is a first-class outcome
//! (`QueueRejected`) surfaced verbatim to the end user. Nothing here
//! retries; recovery policy belongs to the callers.

pub mod auth;
pub mod player;
pub mod search;
pub mod user;
