//! Error types for the primitives.

use thiserror::Error;

/// Errors that can occur while interpreting chain identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The provided string does not name a supported chain.
    #[error("invalid chain: {0:?}")]
    InvalidChain(String),

    /// The provided code is not a known deposit status.
    #[error("invalid deposit status: {0}")]
    InvalidDepositStatus(u8),
}
