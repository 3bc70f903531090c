use reqwest::StatusCode;
use std::fmt;

/// Non-success HTTP response from the dashboard API.
#[derive(Debug, Clone)]
pub struct ApiStatusError {
    pub status: StatusCode,
    pub body: String,
}

impl ApiStatusError {
    /// Server-side failures may clear up on their own; client errors will not.
    pub fn is_retryable(&self) -> bool {
        self.status.is_server_error() || self.status == StatusCode::TOO_MANY_REQUESTS
    }
}

impl fmt::Display for ApiStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dashboard api HTTP {}: {}", self.status, self.body)
    }
}

impl std::error::Error for ApiStatusError {}

/// Status of the response behind `err`, if it came from one.
pub fn status_of(err: &anyhow::Error) -> Option<StatusCode> {
    err.downcast_ref::<ApiStatusError>().map(|e| e.status)
}
