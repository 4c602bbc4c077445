//! Chain-agnostic representation of the batches of deposits that are relayed between chains.

use std::fmt;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// A batch of deposits recorded on a source chain that awaits relaying to the destination chain.
///
/// The [`TransferBatch::id`] is monotonic per source chain and stays the same for the whole relay
/// cycle of the batch. [`Clone`] produces a fully independent copy: neither the byte buffers nor
/// the amounts share storage with the original.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBatch {
    /// The id of the batch on the source chain.
    #[serde(rename = "batchId")]
    pub id: u64,

    /// The deposits in the order in which they were recorded on the source chain.
    pub deposits: Vec<DepositTransfer>,
}

impl TransferBatch {
    /// Creates a new batch from its id and deposits.
    pub const fn new(id: u64, deposits: Vec<DepositTransfer>) -> Self {
        Self { id, deposits }
    }

    /// Returns the nonce of the last deposit in this batch, if any.
    pub fn last_deposit_nonce(&self) -> Option<u64> {
        self.deposits.last().map(|deposit| deposit.nonce)
    }

    /// Whether the batch carries no deposits.
    pub fn is_empty(&self) -> bool {
        self.deposits.is_empty()
    }
}

impl fmt::Display for TransferBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch id {}:", self.id)?;
        for deposit in &self.deposits {
            write!(f, "\n  {deposit}")?;
        }

        Ok(())
    }
}

/// A single deposit inside a [`TransferBatch`].
///
/// Addresses are kept both as the raw bytes understood by the contracts and as the human readable
/// form used in logs, since the encodings differ between the two chains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositTransfer {
    /// The nonce of the deposit on the source chain.
    pub nonce: u64,

    /// The recipient on the destination chain.
    #[serde(rename = "to", with = "hex")]
    pub to_bytes: Vec<u8>,

    /// Display form of [`DepositTransfer::to_bytes`].
    pub displayable_to: String,

    /// The depositor on the source chain.
    #[serde(rename = "from", with = "hex")]
    pub from_bytes: Vec<u8>,

    /// Display form of [`DepositTransfer::from_bytes`].
    pub displayable_from: String,

    /// The token identifier on the source chain.
    #[serde(rename = "token", with = "hex")]
    pub token_bytes: Vec<u8>,

    /// Display form of [`DepositTransfer::token_bytes`].
    pub displayable_token: String,

    /// The deposited amount, in the smallest denomination of the token.
    #[serde(with = "decimal_amount")]
    pub amount: BigUint,
}

impl fmt::Display for DepositTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "to: {}, from: {}, token address: {}, amount: {}, deposit nonce: {}",
            self.displayable_to,
            self.displayable_from,
            self.displayable_token,
            self.amount,
            self.nonce
        )
    }
}

/// Serializes amounts as base-10 strings so that no precision is lost in JSON consumers.
mod decimal_amount {
    use num_bigint::BigUint;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(amount: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&amount.to_str_radix(10))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        BigUint::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| D::Error::custom(format!("invalid decimal amount: {s}")))
    }
}
