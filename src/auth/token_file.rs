use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{api_root, API_HOST, DEFAULT_TIMEOUT};
use crate::api::{Resource, TeslaApiError};

/// The on-disk token record.
///
/// Only `access_token` matters here; the tooling that issues these
/// records writes further fields (refresh token, expiry metadata) which
/// the client ignores.
#[derive(Debug, Deserialize, Serialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl StoredToken {
    /// Reads a token record from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TeslaApiError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Builds the root [`Resource`] from a token record on disk.
///
/// Performs no network I/O and no expiry check; an expired token shows
/// up as an authentication failure on the first request made with it.
pub fn stored_token_login(path: impl AsRef<Path>) -> Result<Resource, TeslaApiError> {
    stored_token_login_with_config(path, API_HOST, DEFAULT_TIMEOUT)
}

/// Stored-token login against an explicit host with an explicit timeout.
pub fn stored_token_login_with_config(
    path: impl AsRef<Path>,
    host: &str,
    timeout: Duration,
) -> Result<Resource, TeslaApiError> {
    let token = StoredToken::load(path)?;
    Ok(Resource::new(api_root(host), token.access_token, timeout))
}
