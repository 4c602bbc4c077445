//! State and calls shared by both executors.

use bridge_relayer_primitives::{
    action::ActionId, batch::TransferBatch, chain::Chain, status::DepositStatus,
};
use bridge_relayer_protocol::errors::{ExecutorError, ExecutorResult};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
    clients::{BridgeClients, MessageHash},
    config::ExecutorConfig,
};

/// What an executor knows about the relay cycle in progress.
#[derive(Debug, Default)]
struct RelayState {
    batch: Option<TransferBatch>,
    action_id: ActionId,
    message_hash: Option<MessageHash>,
    statuses: Vec<DepositStatus>,
    quorum_retries_on_elrond: u64,
    quorum_retries_on_ethereum: u64,
}

/// The quorum check budgets kept by an executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryCounter {
    Elrond,
    Ethereum,
}

/// Clients, configuration and cycle state behind a direction-specific executor.
#[derive(Debug)]
pub(crate) struct BridgeCore {
    pub(crate) clients: BridgeClients,
    pub(crate) config: ExecutorConfig,
    state: RwLock<RelayState>,
}

impl BridgeCore {
    pub(crate) fn new(clients: BridgeClients, config: ExecutorConfig) -> Self {
        Self {
            clients,
            config,
            state: RwLock::new(RelayState::default()),
        }
    }

    pub(crate) async fn stored_batch(&self) -> Option<TransferBatch> {
        self.state.read().await.batch.clone()
    }

    pub(crate) async fn stored_action_id(&self) -> ActionId {
        self.state.read().await.action_id
    }

    /// Replaces the stored batch and forgets everything derived from the previous one.
    ///
    /// Batches without deposits are not worth relaying and are stored as `None`.
    pub(crate) async fn store_batch(&self, batch: Option<TransferBatch>) {
        let batch = batch.filter(|batch| !batch.is_empty());
        let mut state = self.state.write().await;

        state.batch = batch;
        state.action_id = ActionId::INVALID;
        state.message_hash = None;
        state.statuses.clear();
    }

    pub(crate) async fn store_action_id(&self, action_id: ActionId) {
        self.state.write().await.action_id = action_id;
    }

    pub(crate) async fn store_message_hash(&self, hash: MessageHash) {
        self.state.write().await.message_hash = Some(hash);
    }

    pub(crate) async fn store_statuses(&self, statuses: Vec<DepositStatus>) {
        self.state.write().await.statuses = statuses;
    }

    pub(crate) async fn stored_statuses(&self) -> Vec<DepositStatus> {
        self.state.read().await.statuses.clone()
    }

    pub(crate) async fn require_batch(&self) -> ExecutorResult<TransferBatch> {
        self.stored_batch().await.ok_or(ExecutorError::NoStoredBatch)
    }

    pub(crate) async fn require_action_id(&self) -> ExecutorResult<ActionId> {
        let action_id = self.stored_action_id().await;
        if !action_id.is_valid() {
            return Err(ExecutorError::InvalidActionId);
        }

        Ok(action_id)
    }

    pub(crate) async fn require_message_hash(&self) -> ExecutorResult<MessageHash> {
        self.state
            .read()
            .await
            .message_hash
            .ok_or(ExecutorError::NoMessageHash)
    }

    pub(crate) fn my_turn_as_leader(&self) -> bool {
        self.clients.topology.my_turn_as_leader()
    }

    pub(crate) async fn validate_batch(&self, batch: &TransferBatch) -> ExecutorResult<bool> {
        Ok(self.clients.validator.validate_batch(batch).await?)
    }

    /// Counts one quorum check against `counter` and returns `true` once the budget is spent.
    pub(crate) async fn process_max_quorum_retries(&self, counter: RetryCounter) -> bool {
        let max_retries = match counter {
            RetryCounter::Elrond => self.config.max_quorum_retries_on_elrond,
            RetryCounter::Ethereum => self.config.max_quorum_retries_on_ethereum,
        };

        let mut state = self.state.write().await;
        let retries = match counter {
            RetryCounter::Elrond => &mut state.quorum_retries_on_elrond,
            RetryCounter::Ethereum => &mut state.quorum_retries_on_ethereum,
        };

        if *retries < max_retries {
            *retries += 1;
            return false;
        }

        true
    }

    pub(crate) async fn reset_retries(&self, counter: RetryCounter) {
        let mut state = self.state.write().await;
        match counter {
            RetryCounter::Elrond => state.quorum_retries_on_elrond = 0,
            RetryCounter::Ethereum => state.quorum_retries_on_ethereum = 0,
        }
    }

    pub(crate) async fn was_action_signed_on_elrond(&self) -> ExecutorResult<bool> {
        let action_id = self.require_action_id().await?;

        self.clients
            .elrond
            .was_signed(action_id)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))
    }

    pub(crate) async fn sign_action_on_elrond(&self) -> ExecutorResult<()> {
        let action_id = self.require_action_id().await?;

        let tx_hash = self
            .clients
            .elrond
            .sign(action_id)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))?;
        info!(%action_id, %tx_hash, "signed action on elrond");

        Ok(())
    }

    pub(crate) async fn process_quorum_reached_on_elrond(&self) -> ExecutorResult<bool> {
        let action_id = self.require_action_id().await?;

        let reached = self
            .clients
            .elrond
            .quorum_reached(action_id)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))?;
        debug!(%action_id, %reached, "checked quorum on elrond");

        Ok(reached)
    }

    pub(crate) async fn was_action_performed_on_elrond(&self) -> ExecutorResult<bool> {
        let action_id = self.require_action_id().await?;

        self.clients
            .elrond
            .was_executed(action_id)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))
    }

    pub(crate) async fn perform_action_on_elrond(&self) -> ExecutorResult<()> {
        let batch = self.require_batch().await?;
        let action_id = self.require_action_id().await?;

        let tx_hash = self
            .clients
            .elrond
            .perform_action(action_id, &batch)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))?;
        info!(batch_id = %batch.id, %action_id, %tx_hash, "performed action on elrond");

        Ok(())
    }
}
