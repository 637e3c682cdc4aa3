//! Admin client error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, AdminError>;

/// Admin client errors
#[derive(Error, Debug)]
pub enum AdminError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error reported by the admin API
    #[error("admin API error ({code}): HTTP {status}")]
    Api { code: String, status: u16 },

    /// Invalid request URL
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl AdminError {
    /// Parse an admin API error from a non-2xx response body.
    ///
    /// The admin API reports errors as JSON objects with a `Code` field,
    /// e.g. `{"Code": "NoSuchUser"}`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let code = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("Code")
                    .and_then(|code| code.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP{}", status));

        Self::Api { code, status }
    }

    /// Check if this error means the requested entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Api { code, status }
                if *status == 404
                    || code == "NoSuchUser"
                    || code == "NoSuchBucket"
                    || code == "NoSuchKey"
        )
    }
}
