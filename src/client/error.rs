use thiserror::Error;

/// Errors returned by the ETS client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Invalid or incomplete client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection, timeout, or other transport failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status without a parseable API error body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The platform answered with `success: false`.
    #[error("API error{}: {message}", status_suffix(.status))]
    Api {
        /// HTTP status, when the failure came with a non-2xx status.
        status: Option<u16>,
        /// Top-level message.
        message: String,
        /// Individual error entries reported by the platform.
        errors: Vec<String>,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// The document was rejected client-side before sending.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ClientError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Http { status, .. } => is_retryable_status(*status),
            Self::Api {
                status: Some(status),
                ..
            } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// HTTP status of the failure, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Api { status, .. } => *status,
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Transient HTTP statuses: request timeout, rate limiting and server errors
/// other than 501 Not Implemented.
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429) || (status >= 500 && status != 501 && status < 600)
}

impl From<crate::core::EtsError> for ClientError {
    fn from(e: crate::core::EtsError) -> Self {
        Self::Validation(e.to_string())
    }
}
