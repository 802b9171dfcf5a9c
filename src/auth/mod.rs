mod login;
mod token_file;

pub use login::{login, login_with_config};
pub use token_file::{stored_token_login, stored_token_login_with_config, StoredToken};

use std::time::Duration;

/// The production owner API host.
pub const API_HOST: &str = "https://owner-api.teslamotors.com";

/// Default timeout for every request.
/// The car can take a long time to wake up and respond.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default name of the file holding a long-lived access token record.
pub const DEFAULT_ACCESS_TOKEN_FILE: &str = "tesla_access_token.json";

/// The versioned API root under `host`.
pub(crate) fn api_root(host: &str) -> String {
    format!("{host}/api/1")
}
