//! Errors reported by executor capabilities.

use bridge_relayer_batch_validator::ValidatorError;
use bridge_relayer_primitives::chain::Chain;
use thiserror::Error;

/// Errors returned by executor calls.
///
/// Steps never propagate these: they log them and route to their recovery step.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The operation needs a batch but none is stored.
    #[error("no batch stored")]
    NoStoredBatch,

    /// The operation needs an action id but the stored one is the invalid sentinel.
    #[error("invalid action id")]
    InvalidActionId,

    /// The operation needs a message hash but none was generated for the stored batch.
    #[error("no message hash stored")]
    NoMessageHash,

    /// A deposit in the batch does not follow the last executed deposit nonce.
    #[error("invalid deposit nonce {nonce}, last deposit nonce {last}")]
    InvalidDepositNonce {
        /// The nonce of the offending deposit.
        nonce: u64,

        /// The last nonce known to be executed before it.
        last: u64,
    },

    /// A call to one of the chains failed.
    #[error("{chain} client error: {reason}")]
    Chain {
        /// The chain whose client failed.
        chain: Chain,

        /// The reported reason.
        reason: String,
    },

    /// The batch validator could not produce a verdict.
    #[error("batch validation failed: {0}")]
    Validation(#[from] ValidatorError),
}

impl ExecutorError {
    /// Convenience constructor for [`ExecutorError::Chain`].
    pub fn chain(chain: Chain, reason: impl ToString) -> Self {
        Self::Chain {
            chain,
            reason: reason.to_string(),
        }
    }
}

/// Result alias for executor calls.
pub type ExecutorResult<T> = Result<T, ExecutorError>;
