//! Identifiers of the chains the relayer bridges.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ChainError;

/// The chains between which the relayer moves batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// The EVM chain that holds the safe contract.
    Ethereum,

    /// The chain that holds the multisig contract.
    Elrond,
}

impl Chain {
    /// Returns the lowercase name used in URLs and configuration files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Elrond => "elrond",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ethereum" => Ok(Chain::Ethereum),
            "elrond" => Ok(Chain::Elrond),
            _ => Err(ChainError::InvalidChain(s.to_string())),
        }
    }
}
