//! Error types for the batch validator.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while configuring or querying the batch validation microservice.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The request timeout is below the minimum allowed value.
    #[error("invalid request time {0:?}, must be at least 1ms")]
    InvalidRequestTime(std::time::Duration),

    /// The configured URL cannot be parsed.
    #[error("invalid request url {url:?}: {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,

        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("could not build http client: {0}")]
    Client(reqwest::Error),

    /// The batch could not be serialized.
    #[error("during marshal: {0}")]
    Marshal(serde_json::Error),

    /// The request failed or timed out.
    #[error("executing request: {0}")]
    Request(#[from] reqwest::Error),

    /// The microservice answered with a non-success status code.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// The status code returned.
        status: StatusCode,

        /// The body returned, lossily decoded.
        body: String,
    },

    /// The microservice answered with an empty body.
    #[error("empty response")]
    EmptyResponse,

    /// The answer could not be deserialized.
    #[error("during unmarshal: {0}")]
    Unmarshal(serde_json::Error),
}

/// Result alias for batch validation.
pub type ValidatorResult<T> = Result<T, ValidatorError>;
