use std::sync::Arc;

use async_trait::async_trait;
use bridge_relayer_state_machine::Step;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::EthToElrondStep;
use crate::executor::EthToElrondExecutor;

/// Fetches the Ethereum batch that follows the last one executed on Elrond and checks it before
/// anything is proposed.
///
/// Every failure keeps the machine on this step: there is nothing to recover yet.
#[derive(Debug)]
pub struct GetPendingBatchStep<E> {
    bridge: Arc<E>,
}

impl<E> GetPendingBatchStep<E> {
    /// Creates the step.
    pub const fn new(bridge: Arc<E>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl<E> Step<EthToElrondStep> for GetPendingBatchStep<E>
where
    E: EthToElrondExecutor + 'static,
{
    fn identifier(&self) -> EthToElrondStep {
        EthToElrondStep::GettingPendingBatchFromEthereum
    }

    fn transitions(&self) -> Vec<EthToElrondStep> {
        vec![
            self.identifier(),
            EthToElrondStep::ProposingTransferOnElrond,
        ]
    }

    async fn execute(&self, _cancel: &CancellationToken) -> EthToElrondStep {
        self.bridge.reset_retries_count_on_elrond().await;

        let last_batch_id = match self
            .bridge
            .get_last_executed_eth_batch_id_from_elrond()
            .await
        {
            Ok(id) => id,
            Err(err) => {
                error!(?err, "could not fetch last executed ethereum batch id");
                return self.identifier();
            }
        };

        let batch_id = last_batch_id.saturating_add(1);
        if let Err(err) = self.bridge.get_and_store_batch_from_ethereum(batch_id).await {
            debug!(%batch_id, ?err, "could not fetch ethereum batch");
            return self.identifier();
        }

        let Some(batch) = self.bridge.stored_batch().await else {
            debug!(%batch_id, "no new batch found on ethereum");
            return self.identifier();
        };

        info!(
            batch_id = %batch.id,
            num_deposits = batch.deposits.len(),
            "fetched new batch from ethereum"
        );

        if let Err(err) = self
            .bridge
            .verify_last_deposit_nonce_executed_on_ethereum_batch()
            .await
        {
            error!(batch_id = %batch.id, ?err, "deposit nonces do not follow the executed ones");
            return self.identifier();
        }

        match self.bridge.validate_batch(&batch).await {
            Ok(true) => EthToElrondStep::ProposingTransferOnElrond,
            Ok(false) => {
                warn!(batch_id = %batch.id, "batch rejected by the validator");
                self.identifier()
            }
            Err(err) => {
                error!(batch_id = %batch.id, ?err, "could not validate batch");
                self.identifier()
            }
        }
    }
}

/// Proposes the transfer of the stored batch on Elrond, unless someone already did.
#[derive(Debug)]
pub struct ProposeTransferStep<E> {
    bridge: Arc<E>,
}

impl<E> ProposeTransferStep<E> {
    /// Creates the step.
    pub const fn new(bridge: Arc<E>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl<E> Step<EthToElrondStep> for ProposeTransferStep<E>
where
    E: EthToElrondExecutor + 'static,
{
    fn identifier(&self) -> EthToElrondStep {
        EthToElrondStep::ProposingTransferOnElrond
    }

    fn transitions(&self) -> Vec<EthToElrondStep> {
        vec![
            self.identifier(),
            EthToElrondStep::INITIAL,
            EthToElrondStep::SigningProposedTransferOnElrond,
        ]
    }

    async fn execute(&self, _cancel: &CancellationToken) -> EthToElrondStep {
        let Some(batch) = self.bridge.stored_batch().await else {
            debug!("no batch stored");
            return EthToElrondStep::INITIAL;
        };
        let batch_id = batch.id;

        match self.bridge.was_transfer_proposed_on_elrond().await {
            Ok(true) => {
                info!(%batch_id, "transfer already proposed");
                return EthToElrondStep::SigningProposedTransferOnElrond;
            }
            Ok(false) => {}
            Err(err) => {
                error!(%batch_id, ?err, "could not check whether the transfer was proposed");
                return EthToElrondStep::INITIAL;
            }
        }

        if !self.bridge.my_turn_as_leader() {
            debug!(%batch_id, "not my turn as leader in this round");
            return self.identifier();
        }

        info!(%batch_id, "proposing transfer");
        if let Err(err) = self.bridge.propose_transfer_on_elrond().await {
            error!(%batch_id, ?err, "could not propose transfer");
            return EthToElrondStep::INITIAL;
        }

        EthToElrondStep::SigningProposedTransferOnElrond
    }
}
