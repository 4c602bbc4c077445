//! Capabilities of the chain clients used by the executors.
//!
//! Transaction building, contract bindings and signature transport live behind these traits.
//! Implementations are long-lived, shared by both directions and must be safe for concurrent use.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use bridge_relayer_batch_validator::BatchValidator;
use bridge_relayer_primitives::{action::ActionId, batch::TransferBatch, status::DepositStatus};

use crate::errors::ClientResult;

/// Hash of a batch as signed by the relayers and verified by the Ethereum safe contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHash(pub [u8; 32]);

impl fmt::Display for MessageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Access to the Elrond multisig contract.
#[async_trait]
pub trait ElrondClient: fmt::Debug + Send + Sync {
    /// The batch currently waiting to be relayed to Ethereum, if any.
    async fn get_pending_batch(&self) -> ClientResult<Option<TransferBatch>>;

    /// The id of the last Ethereum batch executed on Elrond.
    async fn get_last_executed_eth_batch_id(&self) -> ClientResult<u64>;

    /// The nonce of the last Ethereum deposit executed on Elrond.
    async fn get_last_executed_eth_tx_id(&self) -> ClientResult<u64>;

    /// Whether a transfer was proposed for `batch`.
    async fn was_transfer_proposed(&self, batch: &TransferBatch) -> ClientResult<bool>;

    /// The action id of the transfer proposed for `batch`, [`ActionId::INVALID`] if none.
    async fn get_action_id_for_propose_transfer(
        &self,
        batch: &TransferBatch,
    ) -> ClientResult<ActionId>;

    /// Whether a set-status with `statuses` was proposed for `batch`.
    async fn was_set_status_proposed(
        &self,
        batch: &TransferBatch,
        statuses: &[DepositStatus],
    ) -> ClientResult<bool>;

    /// The action id of the set-status proposed for `batch`, [`ActionId::INVALID`] if none.
    async fn get_action_id_for_set_status(
        &self,
        batch: &TransferBatch,
        statuses: &[DepositStatus],
    ) -> ClientResult<ActionId>;

    /// Whether enough relayers signed `action_id`.
    async fn quorum_reached(&self, action_id: ActionId) -> ClientResult<bool>;

    /// Whether this relayer signed `action_id`.
    async fn was_signed(&self, action_id: ActionId) -> ClientResult<bool>;

    /// Whether `action_id` was performed.
    async fn was_executed(&self, action_id: ActionId) -> ClientResult<bool>;

    /// Proposes the transfer of `batch` and returns the transaction hash.
    async fn propose_transfer(&self, batch: &TransferBatch) -> ClientResult<String>;

    /// Proposes the set-status of `batch` and returns the transaction hash.
    async fn propose_set_status(
        &self,
        batch: &TransferBatch,
        statuses: &[DepositStatus],
    ) -> ClientResult<String>;

    /// Signs `action_id` and returns the transaction hash.
    async fn sign(&self, action_id: ActionId) -> ClientResult<String>;

    /// Performs `action_id` and returns the transaction hash.
    async fn perform_action(
        &self,
        action_id: ActionId,
        batch: &TransferBatch,
    ) -> ClientResult<String>;
}

/// Access to the Ethereum safe and bridge contracts.
#[async_trait]
pub trait EthereumClient: fmt::Debug + Send + Sync {
    /// The batch with `batch_id`, if it exists.
    async fn get_batch(&self, batch_id: u64) -> ClientResult<Option<TransferBatch>>;

    /// Whether the batch with `batch_id` was executed.
    async fn was_executed(&self, batch_id: u64) -> ClientResult<bool>;

    /// The hash the relayers sign to approve the execution of `batch`.
    async fn generate_message_hash(&self, batch: &TransferBatch) -> ClientResult<MessageHash>;

    /// Signs `hash` and broadcasts the signature to the other relayers.
    async fn broadcast_signature_for_message_hash(&self, hash: MessageHash) -> ClientResult<()>;

    /// The number of signatures the bridge contract requires.
    async fn get_quorum_size(&self) -> ClientResult<usize>;

    /// The number of distinct relayer signatures collected for `hash`.
    async fn signatures_count(&self, hash: MessageHash) -> ClientResult<usize>;

    /// Executes `batch` with the collected signatures and returns the transaction hash.
    async fn execute_transfer(
        &self,
        hash: MessageHash,
        batch: &TransferBatch,
        quorum: usize,
    ) -> ClientResult<String>;

    /// The statuses of the deposits of the batch with `batch_id`.
    async fn get_transactions_statuses(&self, batch_id: u64) -> ClientResult<Vec<DepositStatus>>;
}

/// Knowledge of the relayer set.
pub trait TopologyProvider: fmt::Debug + Send + Sync {
    /// Whether this relayer may perform execute-class actions in the current round.
    fn my_turn_as_leader(&self) -> bool;
}

/// The collaborators an executor works with, shared between both directions.
#[derive(Debug, Clone)]
pub struct BridgeClients {
    /// Client of the Elrond multisig contract.
    pub elrond: Arc<dyn ElrondClient>,

    /// Client of the Ethereum contracts.
    pub ethereum: Arc<dyn EthereumClient>,

    /// Source of the leader turn.
    pub topology: Arc<dyn TopologyProvider>,

    /// Gate consulted before relaying a batch.
    pub validator: Arc<dyn BatchValidator>,
}
