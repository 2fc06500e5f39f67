//! Credential and session lifecycle.
//!
//! This module owns the mutable per-user state of the service: the keyed
//! credential store, the session registry, and the auth gateway that checks
//! and refreshes credentials before any downstream work. Refresh
//! serialization lives here too; the gateway holds a per-user lock across
//! the exchange so concurrent requests on an expired credential produce
//! exactly one refresh call.

mod credentials;
mod gateway;
mod sessions;

pub use credentials::CredentialStore;
pub use gateway::{AuthGateway, TokenExchange};
pub use sessions::SessionStore;
