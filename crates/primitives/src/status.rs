//! Per-deposit outcome reported back to the source chain once a batch has been relayed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ChainError;

/// The status of a single deposit as tracked by the contracts.
///
/// The numeric values are the ones stored on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum DepositStatus {
    /// No status recorded yet.
    None = 0,

    /// Recorded on the source chain, not yet picked up.
    Pending = 1,

    /// Part of a batch that is being relayed.
    InProgress = 2,

    /// Transferred on the destination chain.
    Executed = 3,

    /// Refused by the destination chain.
    Rejected = 4,
}

impl DepositStatus {
    /// Whether the status can no longer change.
    pub const fn is_final(&self) -> bool {
        matches!(self, DepositStatus::Executed | DepositStatus::Rejected)
    }
}

impl TryFrom<u8> for DepositStatus {
    type Error = ChainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DepositStatus::None),
            1 => Ok(DepositStatus::Pending),
            2 => Ok(DepositStatus::InProgress),
            3 => Ok(DepositStatus::Executed),
            4 => Ok(DepositStatus::Rejected),
            _ => Err(ChainError::InvalidDepositStatus(value)),
        }
    }
}

impl From<DepositStatus> for u8 {
    fn from(value: DepositStatus) -> Self {
        value as u8
    }
}

impl fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
