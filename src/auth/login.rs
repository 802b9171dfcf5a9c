use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{api_root, API_HOST, DEFAULT_TIMEOUT};
use crate::api::{Resource, TeslaApiError};

/// The fixed client identifier shared by the official mobile apps.
const CLIENT_ID: &str = "81527cff06843c8634fdc09e8ac0abefb46ac849f38fe1e431c2ef2106796384";

/// Its companion secret.
const CLIENT_SECRET: &str = "c7257eb71a564034f9419ee651c7d0e5f7aa6bfbd18bafb5c5c033b093bb2fa3";

/// The part of the token endpoint answer we care about.
/// Extra fields (expiry metadata and the like) are ignored.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges an email/password pair for a bearer token and returns the
/// root [`Resource`] of the versioned API.
///
/// Nothing is persisted; every process run authenticates again.
pub async fn login(email: &str, password: &str) -> Result<Resource, TeslaApiError> {
    login_with_config(API_HOST, email, password, DEFAULT_TIMEOUT).await
}

/// Password login against an explicit host with an explicit timeout.
pub async fn login_with_config(
    host: &str,
    email: &str,
    password: &str,
    timeout: Duration,
) -> Result<Resource, TeslaApiError> {
    let token_url = format!("{host}/oauth/token");
    let form = [
        ("email", email),
        ("password", password),
        ("client_id", CLIENT_ID),
        ("client_secret", CLIENT_SECRET),
        ("grant_type", "password"),
    ];

    debug!("POST {}", token_url);

    let response = Client::new()
        .post(&token_url)
        .form(&form)
        .timeout(timeout)
        .send()
        .await
        .map_err(|err| TeslaApiError::transport(&token_url, err))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(TeslaApiError::Authentication {
            status: status.as_u16(),
        });
    }

    let text = response
        .text()
        .await
        .map_err(|err| TeslaApiError::transport(&token_url, err))?;
    let token: TokenResponse = serde_json::from_str(&text)?;

    Ok(Resource::new(api_root(host), token.access_token, timeout))
}
