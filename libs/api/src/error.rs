use thiserror::Error;

/// Failure surfaced by the Smite API client.
///
/// The variants keep "the backend could not be reached", "the backend answered
/// with something unreadable" and "the thing you asked for does not exist"
/// apart, so callers can decide what to tell their users.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Transport(String),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response envelope: {0}")]
    Envelope(String),

    #[error("failed to decode payload: {0}")]
    Decode(String),

    #[error("god not found: {0}")]
    GodNotFound(String),

    #[error("session rejected: {0}")]
    SessionRejected(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ApiError {
    /// True when the backend could not be reached or refused the HTTP request.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Status { .. })
    }

    /// True when a symbolic lookup did not resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::GodNotFound(_))
    }

    /// True when the backend answered but the body could not be read.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ApiError::Envelope(_) | ApiError::Decode(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Transport(error.to_string())
    }
}
