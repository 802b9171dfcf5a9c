use thiserror::Error;

/// Possible error types while working with the owner API.
#[derive(Error, Debug)]
pub enum TeslaApiError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// A network failure reaching the host.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    /// The token endpoint rejected the login.
    #[error("received status code {status} when attempting login")]
    Authentication { status: u16 },

    /// A resource endpoint answered with a non-success status.
    #[error("received response {status} from {url}")]
    ApiStatus { status: u16, url: String },

    /// A 200 response whose body was a list of per-item error descriptors.
    #[error("{0}")]
    ApiSemantic(String),

    /// A 200 response without the expected `response` key.
    #[error("no \"response\" key in body returned from {url}")]
    MalformedResponse { url: String },

    /// The body (or a token record) was not decodable JSON.
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The token file could not be read.
    #[error("failed to read token file: {0}")]
    Io(#[from] std::io::Error),
}

impl TeslaApiError {
    /// Classify a transport-layer failure, keeping timeouts distinct.
    pub(crate) fn transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TeslaApiError::Timeout {
                url: url.to_string(),
            }
        } else {
            TeslaApiError::Transport(err)
        }
    }
}
