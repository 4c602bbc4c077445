//! Executor of the `ElrondToEth` direction.

use std::time::Duration;

use async_trait::async_trait;
use bridge_relayer_primitives::{
    action::ActionId, batch::TransferBatch, chain::Chain, status::DepositStatus,
};
use bridge_relayer_protocol::{
    errors::{ExecutorError, ExecutorResult},
    executor::{BaseExecutor, ElrondToEthExecutor, MultisigActionExecutor},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    clients::BridgeClients,
    config::ExecutorConfig,
    shared::{BridgeCore, RetryCounter},
};

/// Number of checks made while waiting for a transfer confirmation.
const CONFIRMATION_TICKS: u32 = 10;

/// Relays Elrond batches to Ethereum and reports the outcome back through set-status actions of
/// the multisig contract.
#[derive(Debug)]
pub struct ElrondToEthBridge {
    core: BridgeCore,
}

impl ElrondToEthBridge {
    /// Creates an executor with an empty relay cycle.
    pub fn new(clients: BridgeClients, config: ExecutorConfig) -> Self {
        Self {
            core: BridgeCore::new(clients, config),
        }
    }

    async fn require_statuses(&self) -> ExecutorResult<Vec<DepositStatus>> {
        let statuses = self.core.stored_statuses().await;
        if statuses.is_empty() {
            return Err(ExecutorError::chain(
                Chain::Ethereum,
                "deposit statuses not resolved",
            ));
        }

        Ok(statuses)
    }
}

#[async_trait]
impl BaseExecutor for ElrondToEthBridge {
    async fn stored_batch(&self) -> Option<TransferBatch> {
        self.core.stored_batch().await
    }

    async fn stored_action_id(&self) -> ActionId {
        self.core.stored_action_id().await
    }

    fn my_turn_as_leader(&self) -> bool {
        self.core.my_turn_as_leader()
    }

    async fn validate_batch(&self, batch: &TransferBatch) -> ExecutorResult<bool> {
        self.core.validate_batch(batch).await
    }
}

#[async_trait]
impl MultisigActionExecutor for ElrondToEthBridge {
    async fn get_and_store_action_id_on_elrond(&self) -> ExecutorResult<ActionId> {
        let batch = self.core.require_batch().await?;
        let statuses = self.require_statuses().await?;

        let action_id = self
            .core
            .clients
            .elrond
            .get_action_id_for_set_status(&batch, &statuses)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))?;
        self.core.store_action_id(action_id).await;

        Ok(action_id)
    }

    async fn was_action_signed_on_elrond(&self) -> ExecutorResult<bool> {
        self.core.was_action_signed_on_elrond().await
    }

    async fn sign_action_on_elrond(&self) -> ExecutorResult<()> {
        self.core.sign_action_on_elrond().await
    }

    async fn process_quorum_reached_on_elrond(&self) -> ExecutorResult<bool> {
        self.core.process_quorum_reached_on_elrond().await
    }

    async fn process_max_quorum_retries_on_elrond(&self) -> bool {
        self.core
            .process_max_quorum_retries(RetryCounter::Elrond)
            .await
    }

    async fn reset_retries_count_on_elrond(&self) {
        self.core.reset_retries(RetryCounter::Elrond).await;
    }

    async fn was_action_performed_on_elrond(&self) -> ExecutorResult<bool> {
        self.core.was_action_performed_on_elrond().await
    }

    async fn perform_action_on_elrond(&self) -> ExecutorResult<()> {
        self.core.perform_action_on_elrond().await
    }
}

#[async_trait]
impl ElrondToEthExecutor for ElrondToEthBridge {
    async fn get_and_store_batch_from_elrond(&self) -> ExecutorResult<()> {
        let batch = self.get_batch_from_elrond().await?;
        self.core.store_batch(batch).await;

        Ok(())
    }

    async fn get_batch_from_elrond(&self) -> ExecutorResult<Option<TransferBatch>> {
        self.core
            .clients
            .elrond
            .get_pending_batch()
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))
    }

    async fn was_transfer_performed_on_ethereum(&self) -> ExecutorResult<bool> {
        let batch = self.core.require_batch().await?;

        self.core
            .clients
            .ethereum
            .was_executed(batch.id)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Ethereum, err))
    }

    async fn sign_transfer_on_ethereum(&self) -> ExecutorResult<()> {
        let batch = self.core.require_batch().await?;
        let ethereum = &self.core.clients.ethereum;

        let hash = ethereum
            .generate_message_hash(&batch)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Ethereum, err))?;
        self.core.store_message_hash(hash).await;

        ethereum
            .broadcast_signature_for_message_hash(hash)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Ethereum, err))?;
        info!(batch_id = %batch.id, %hash, "signed and broadcast message hash");

        Ok(())
    }

    async fn process_quorum_reached_on_ethereum(&self) -> ExecutorResult<bool> {
        let hash = self.core.require_message_hash().await?;
        let ethereum = &self.core.clients.ethereum;

        let quorum = ethereum
            .get_quorum_size()
            .await
            .map_err(|err| ExecutorError::chain(Chain::Ethereum, err))?;
        let signatures = ethereum
            .signatures_count(hash)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Ethereum, err))?;
        debug!(%hash, %signatures, %quorum, "checked quorum on ethereum");

        Ok(signatures >= quorum)
    }

    async fn process_max_quorum_retries_on_ethereum(&self) -> bool {
        self.core
            .process_max_quorum_retries(RetryCounter::Ethereum)
            .await
    }

    async fn reset_retries_count_on_ethereum(&self) {
        self.core.reset_retries(RetryCounter::Ethereum).await;
    }

    async fn perform_transfer_on_ethereum(&self) -> ExecutorResult<()> {
        let batch = self.core.require_batch().await?;
        let hash = self.core.require_message_hash().await?;
        let ethereum = &self.core.clients.ethereum;

        let quorum = ethereum
            .get_quorum_size()
            .await
            .map_err(|err| ExecutorError::chain(Chain::Ethereum, err))?;
        let tx_hash = ethereum
            .execute_transfer(hash, &batch, quorum)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Ethereum, err))?;
        info!(batch_id = %batch.id, %tx_hash, "executed transfer on ethereum");

        Ok(())
    }

    async fn wait_for_transfer_confirmation(&self, cancel: &CancellationToken) {
        let tick = self.core.config.transfer_confirmation_wait() / CONFIRMATION_TICKS;

        for _ in 0..CONFIRMATION_TICKS {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(tick.max(Duration::from_millis(1))) => {}
            }

            match self.was_transfer_performed_on_ethereum().await {
                Ok(true) => return,
                Ok(false) => {}
                Err(err) => debug!(?err, "could not check transfer while waiting for confirmation"),
            }
        }
    }

    async fn resolve_new_deposits_statuses(&self) -> ExecutorResult<()> {
        let batch = self.core.require_batch().await?;

        let mut statuses = self
            .core
            .clients
            .ethereum
            .get_transactions_statuses(batch.id)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Ethereum, err))?;

        let num_deposits = batch.deposits.len();
        if statuses.len() > num_deposits {
            return Err(ExecutorError::chain(
                Chain::Ethereum,
                format!(
                    "got {} statuses for {num_deposits} deposits",
                    statuses.len()
                ),
            ));
        }
        if statuses.len() < num_deposits {
            warn!(
                batch_id = %batch.id,
                missing = num_deposits - statuses.len(),
                "missing deposit statuses, marking them as rejected"
            );
            statuses.resize(num_deposits, DepositStatus::Rejected);
        }
        if let Some(status) = statuses.iter().find(|status| !status.is_final()) {
            return Err(ExecutorError::chain(
                Chain::Ethereum,
                format!("deposit status {status} is not final"),
            ));
        }

        self.core.store_statuses(statuses).await;

        Ok(())
    }

    async fn was_set_status_proposed_on_elrond(&self) -> ExecutorResult<bool> {
        let batch = self.core.require_batch().await?;
        let statuses = self.require_statuses().await?;

        self.core
            .clients
            .elrond
            .was_set_status_proposed(&batch, &statuses)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))
    }

    async fn propose_set_status_on_elrond(&self) -> ExecutorResult<()> {
        let batch = self.core.require_batch().await?;
        let statuses = self.require_statuses().await?;

        let tx_hash = self
            .core
            .clients
            .elrond
            .propose_set_status(&batch, &statuses)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))?;
        info!(batch_id = %batch.id, %tx_hash, "proposed set status on elrond");

        Ok(())
    }
}
