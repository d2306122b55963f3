use thiserror::Error;

/// Errors from webhook verification and parsing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WebhookError {
    /// The shared secret is empty.
    #[error("webhook secret must not be empty")]
    EmptySecret,

    /// Signature header is missing, not hex, or has an unknown scheme.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// Signature does not match the body.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// Timestamp lies outside the accepted window.
    #[error("timestamp {timestamp} is outside the {tolerance_secs}s tolerance")]
    StaleTimestamp { timestamp: i64, tolerance_secs: u64 },

    /// Body is not a valid event.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
