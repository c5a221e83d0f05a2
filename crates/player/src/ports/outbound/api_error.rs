use thiserror::Error;

/// Transport-level failure of a single backend call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout...
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16, body: String },

    /// A 2xx body carrying an `error` field.
    #[error("{0}")]
    Application(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Failed to serialize request: {0}")]
    SerializeError(String),
}

impl ApiError {
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }
}
