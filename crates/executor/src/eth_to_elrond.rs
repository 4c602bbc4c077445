//! Executor of the `EthToElrond` direction.

use async_trait::async_trait;
use bridge_relayer_primitives::{action::ActionId, batch::TransferBatch, chain::Chain};
use bridge_relayer_protocol::{
    errors::{ExecutorError, ExecutorResult},
    executor::{BaseExecutor, EthToElrondExecutor, MultisigActionExecutor},
};
use tracing::{debug, info};

use crate::{
    clients::BridgeClients,
    config::ExecutorConfig,
    shared::{BridgeCore, RetryCounter},
};

/// Relays Ethereum batches to Elrond through transfer actions of the multisig contract.
#[derive(Debug)]
pub struct EthToElrondBridge {
    core: BridgeCore,
}

impl EthToElrondBridge {
    /// Creates an executor with an empty relay cycle.
    pub fn new(clients: BridgeClients, config: ExecutorConfig) -> Self {
        Self {
            core: BridgeCore::new(clients, config),
        }
    }
}

#[async_trait]
impl BaseExecutor for EthToElrondBridge {
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
impl MultisigActionExecutor for EthToElrondBridge {
    async fn get_and_store_action_id_on_elrond(&self) -> ExecutorResult<ActionId> {
        let batch = self.core.require_batch().await?;

        let action_id = self
            .core
            .clients
            .elrond
            .get_action_id_for_propose_transfer(&batch)
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
impl EthToElrondExecutor for EthToElrondBridge {
    async fn get_last_executed_eth_batch_id_from_elrond(&self) -> ExecutorResult<u64> {
        self.core
            .clients
            .elrond
            .get_last_executed_eth_batch_id()
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))
    }

    async fn get_and_store_batch_from_ethereum(&self, batch_id: u64) -> ExecutorResult<()> {
        let batch = self
            .core
            .clients
            .ethereum
            .get_batch(batch_id)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Ethereum, err))?;

        if let Some(batch) = &batch {
            if batch.id != batch_id {
                return Err(ExecutorError::chain(
                    Chain::Ethereum,
                    format!("requested batch {batch_id}, got batch {}", batch.id),
                ));
            }
        }

        self.core.store_batch(batch).await;

        Ok(())
    }

    async fn verify_last_deposit_nonce_executed_on_ethereum_batch(&self) -> ExecutorResult<()> {
        let batch = self.core.require_batch().await?;

        let mut last = self
            .core
            .clients
            .elrond
            .get_last_executed_eth_tx_id()
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))?;

        for deposit in &batch.deposits {
            if deposit.nonce != last.saturating_add(1) {
                return Err(ExecutorError::InvalidDepositNonce {
                    nonce: deposit.nonce,
                    last,
                });
            }
            last = deposit.nonce;
        }
        debug!(
            batch_id = %batch.id,
            last_nonce = ?batch.last_deposit_nonce(),
            "deposit nonces verified"
        );

        Ok(())
    }

    async fn was_transfer_proposed_on_elrond(&self) -> ExecutorResult<bool> {
        let batch = self.core.require_batch().await?;

        self.core
            .clients
            .elrond
            .was_transfer_proposed(&batch)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))
    }

    async fn propose_transfer_on_elrond(&self) -> ExecutorResult<()> {
        let batch = self.core.require_batch().await?;

        let tx_hash = self
            .core
            .clients
            .elrond
            .propose_transfer(&batch)
            .await
            .map_err(|err| ExecutorError::chain(Chain::Elrond, err))?;
        info!(batch_id = %batch.id, %tx_hash, "proposed transfer on elrond");

        Ok(())
    }
}
