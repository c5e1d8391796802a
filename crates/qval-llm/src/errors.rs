//! Error taxonomy for the completion boundary.

use thiserror::Error;

/// Failures surfaced by a valuation completion call. None of these are
/// retried internally; the orchestration layer folds them into its ERROR
/// state and logs the detail.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Bad local setup (missing API key, malformed header value).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport failure reaching the endpoint.
    #[error("network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-success status.
    #[error("provider error (status {status}): {message}")]
    Provider { status: u16, message: String },

    /// Endpoint answered but carried no payload text.
    #[error("provider returned no payload text")]
    EmptyResponse,

    /// Payload present but does not parse into the expected shape, or
    /// parses while violating a field-level invariant.
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// Request exceeded the configured deadline.
    #[error("valuation request timed out")]
    Timeout,
}

impl ClientError {
    pub fn schema(message: impl Into<String>) -> Self {
        ClientError::SchemaViolation(message.into())
    }
}
