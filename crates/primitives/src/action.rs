//! Handles of actions proposed on the multisig contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric handle of a proposed multisig action (a transfer or a status update) on the
/// destination chain.
///
/// The value `0` is reserved by the multisig contract and never designates a real action, see
/// [`ActionId::INVALID`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ActionId(u64);

impl ActionId {
    /// The sentinel returned by the multisig contract when no matching action exists.
    pub const INVALID: ActionId = ActionId(0);

    /// Creates a new [`ActionId`] from its raw value.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this action id.
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Whether this id can be used to sign, query or perform an action.
    pub const fn is_valid(&self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl From<u64> for ActionId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
