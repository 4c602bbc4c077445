//! Concrete executors for both relay directions.
//!
//! The executors implement the capabilities consumed by the protocol steps on top of narrow chain
//! client traits (see [`clients`]) and keep the per-batch state of one relay cycle in memory.
//! Nothing is persisted: after a restart every fact is read from the chains again.

pub mod clients;
pub mod config;
pub mod elrond_to_eth;
pub mod errors;
pub mod eth_to_elrond;
mod shared;

#[cfg(test)]
mod test_utils;

pub use clients::{BridgeClients, ElrondClient, EthereumClient, MessageHash, TopologyProvider};
pub use config::ExecutorConfig;
pub use elrond_to_eth::ElrondToEthBridge;
pub use errors::{ClientError, ClientResult};
pub use eth_to_elrond::EthToElrondBridge;
