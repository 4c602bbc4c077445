//! Errors reported by chain clients.

use thiserror::Error;

/// Errors returned by [`crate::clients::ElrondClient`] and [`crate::clients::EthereumClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The node could not be reached or answered with an error.
    #[error("rpc: {0}")]
    Rpc(String),

    /// The contract rejected the call or returned data that could not be decoded.
    #[error("contract: {0}")]
    Contract(String),
}

/// Result alias for chain client calls.
pub type ClientResult<T> = Result<T, ClientError>;
