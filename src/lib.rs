//! Client for the unofficially-documented Tesla owner API.
//!
//! A [`Resource`] names one URL within the API; `child`/`at` walk the
//! path without touching the network, and invoking the resource runs a
//! single request and unwraps the `{"response": ...}` envelope.
//!
//! # Example
//!
//! ```rust,no_run
//! use teslactl::{login, Params, TeslaApiError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), TeslaApiError> {
//!     let server = login("elon@example.com", "hunter2").await?;
//!
//!     // GET /api/1/vehicles
//!     let vehicles = server.child("vehicles").get().await?;
//!
//!     // POST /api/1/vehicles/<id>/wake_up
//!     let id = vehicles[0]["id"].as_u64().unwrap();
//!     server
//!         .child("vehicles")
//!         .at(id)
//!         .child("wake_up")
//!         .post(Params::new())
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod api;
mod auth;

pub use api::{Params, Resource, TeslaApiError};
pub use auth::{
    login, login_with_config, stored_token_login, stored_token_login_with_config, StoredToken,
    API_HOST, DEFAULT_ACCESS_TOKEN_FILE, DEFAULT_TIMEOUT,
};
