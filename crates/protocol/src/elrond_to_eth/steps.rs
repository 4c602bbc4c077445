use std::sync::Arc;

use async_trait::async_trait;
use bridge_relayer_state_machine::Step;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::ElrondToEthStep;
use crate::executor::ElrondToEthExecutor;

macro_rules! step_struct {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<E> {
            bridge: Arc<E>,
        }

        impl<E> $name<E> {
            /// Creates the step.
            pub const fn new(bridge: Arc<E>) -> Self {
                Self { bridge }
            }
        }
    };
}

step_struct!(
    /// Fetches the pending Elrond batch and decides where its relay cycle resumes.
    ///
    /// Every failure keeps the machine on this step.
    GetPendingBatchStep
);

step_struct!(
    /// Signs the Ethereum message hash of the stored batch.
    SignTransferStep
);

step_struct!(
    /// Waits for enough relayer signatures on the message hash.
    WaitForTransferQuorumStep
);

step_struct!(
    /// Executes the transfer on Ethereum when it is this relayer's turn as leader.
    PerformTransferStep
);

step_struct!(
    /// Gives an executed transfer time to become visible on Ethereum.
    WaitTransferConfirmationStep
);

step_struct!(
    /// Reads the final statuses of the deposits of the stored batch from Ethereum.
    ResolveSetStatusStep
);

step_struct!(
    /// Proposes the set-status of the stored batch on Elrond, unless someone already did.
    ProposeSetStatusStep
);

#[async_trait]
impl<E> Step<ElrondToEthStep> for GetPendingBatchStep<E>
where
    E: ElrondToEthExecutor + 'static,
{
    fn identifier(&self) -> ElrondToEthStep {
        ElrondToEthStep::GettingPendingBatchFromElrond
    }

    fn transitions(&self) -> Vec<ElrondToEthStep> {
        vec![
            self.identifier(),
            ElrondToEthStep::SigningProposedTransferOnEthereum,
            ElrondToEthStep::ResolvingSetStatusOnElrond,
        ]
    }

    async fn execute(&self, _cancel: &CancellationToken) -> ElrondToEthStep {
        self.bridge.reset_retries_count_on_elrond().await;
        self.bridge.reset_retries_count_on_ethereum().await;

        if let Err(err) = self.bridge.get_and_store_batch_from_elrond().await {
            debug!(?err, "could not fetch pending batch from elrond");
            return self.identifier();
        }

        let Some(batch) = self.bridge.stored_batch().await else {
            debug!("no pending batch on elrond");
            return self.identifier();
        };
        let batch_id = batch.id;

        info!(%batch_id, num_deposits = batch.deposits.len(), "fetched pending batch from elrond");

        match self.bridge.validate_batch(&batch).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(%batch_id, "batch rejected by the validator");
                return self.identifier();
            }
            Err(err) => {
                error!(%batch_id, ?err, "could not validate batch");
                return self.identifier();
            }
        }

        match self.bridge.was_transfer_performed_on_ethereum().await {
            Ok(true) => {
                info!(%batch_id, "transfer already performed on ethereum");
                ElrondToEthStep::ResolvingSetStatusOnElrond
            }
            Ok(false) => ElrondToEthStep::SigningProposedTransferOnEthereum,
            Err(err) => {
                error!(%batch_id, ?err, "could not check whether the transfer was performed");
                self.identifier()
            }
        }
    }
}

#[async_trait]
impl<E> Step<ElrondToEthStep> for SignTransferStep<E>
where
    E: ElrondToEthExecutor + 'static,
{
    fn identifier(&self) -> ElrondToEthStep {
        ElrondToEthStep::SigningProposedTransferOnEthereum
    }

    fn transitions(&self) -> Vec<ElrondToEthStep> {
        vec![
            ElrondToEthStep::INITIAL,
            ElrondToEthStep::WaitingForQuorumOnTransfer,
        ]
    }

    async fn execute(&self, _cancel: &CancellationToken) -> ElrondToEthStep {
        let Some(batch) = self.bridge.stored_batch().await else {
            debug!("no batch stored");
            return ElrondToEthStep::INITIAL;
        };

        if let Err(err) = self.bridge.sign_transfer_on_ethereum().await {
            error!(batch_id = %batch.id, ?err, "could not sign transfer");
            return ElrondToEthStep::INITIAL;
        }

        ElrondToEthStep::WaitingForQuorumOnTransfer
    }
}

#[async_trait]
impl<E> Step<ElrondToEthStep> for WaitForTransferQuorumStep<E>
where
    E: ElrondToEthExecutor + 'static,
{
    fn identifier(&self) -> ElrondToEthStep {
        ElrondToEthStep::WaitingForQuorumOnTransfer
    }

    fn transitions(&self) -> Vec<ElrondToEthStep> {
        vec![
            self.identifier(),
            ElrondToEthStep::INITIAL,
            ElrondToEthStep::PerformingTransfer,
        ]
    }

    async fn execute(&self, _cancel: &CancellationToken) -> ElrondToEthStep {
        if self.bridge.process_max_quorum_retries_on_ethereum().await {
            warn!("max number of retries reached while waiting for quorum on transfer");
            return ElrondToEthStep::INITIAL;
        }

        match self.bridge.process_quorum_reached_on_ethereum().await {
            Ok(true) => {
                info!("quorum reached on transfer");
                ElrondToEthStep::PerformingTransfer
            }
            Ok(false) => self.identifier(),
            Err(err) => {
                error!(?err, "could not check quorum on transfer");
                ElrondToEthStep::INITIAL
            }
        }
    }
}

#[async_trait]
impl<E> Step<ElrondToEthStep> for PerformTransferStep<E>
where
    E: ElrondToEthExecutor + 'static,
{
    fn identifier(&self) -> ElrondToEthStep {
        ElrondToEthStep::PerformingTransfer
    }

    fn transitions(&self) -> Vec<ElrondToEthStep> {
        vec![
            self.identifier(),
            ElrondToEthStep::INITIAL,
            ElrondToEthStep::WaitingTransferConfirmation,
            ElrondToEthStep::ResolvingSetStatusOnElrond,
        ]
    }

    async fn execute(&self, _cancel: &CancellationToken) -> ElrondToEthStep {
        match self.bridge.was_transfer_performed_on_ethereum().await {
            Ok(true) => {
                info!("transfer performed on ethereum");
                return ElrondToEthStep::ResolvingSetStatusOnElrond;
            }
            Ok(false) => {}
            Err(err) => {
                error!(?err, "could not check whether the transfer was performed");
                return ElrondToEthStep::INITIAL;
            }
        }

        if !self.bridge.my_turn_as_leader() {
            debug!("not my turn as leader in this round");
            return self.identifier();
        }

        if let Err(err) = self.bridge.perform_transfer_on_ethereum().await {
            error!(?err, "could not perform transfer");
            return ElrondToEthStep::INITIAL;
        }

        ElrondToEthStep::WaitingTransferConfirmation
    }
}

#[async_trait]
impl<E> Step<ElrondToEthStep> for WaitTransferConfirmationStep<E>
where
    E: ElrondToEthExecutor + 'static,
{
    fn identifier(&self) -> ElrondToEthStep {
        ElrondToEthStep::WaitingTransferConfirmation
    }

    fn transitions(&self) -> Vec<ElrondToEthStep> {
        vec![ElrondToEthStep::PerformingTransfer]
    }

    async fn execute(&self, cancel: &CancellationToken) -> ElrondToEthStep {
        self.bridge.wait_for_transfer_confirmation(cancel).await;

        ElrondToEthStep::PerformingTransfer
    }
}

#[async_trait]
impl<E> Step<ElrondToEthStep> for ResolveSetStatusStep<E>
where
    E: ElrondToEthExecutor + 'static,
{
    fn identifier(&self) -> ElrondToEthStep {
        ElrondToEthStep::ResolvingSetStatusOnElrond
    }

    fn transitions(&self) -> Vec<ElrondToEthStep> {
        vec![
            ElrondToEthStep::INITIAL,
            ElrondToEthStep::ProposingSetStatusOnElrond,
        ]
    }

    async fn execute(&self, _cancel: &CancellationToken) -> ElrondToEthStep {
        let Some(stored) = self.bridge.stored_batch().await else {
            debug!("no batch stored");
            return ElrondToEthStep::INITIAL;
        };

        match self.bridge.get_batch_from_elrond().await {
            Ok(Some(pending)) if pending.id != stored.id => {
                info!(
                    batch_id = %stored.id,
                    pending_batch_id = %pending.id,
                    "pending batch on elrond changed"
                );
                return ElrondToEthStep::INITIAL;
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!(batch_id = %stored.id, "batch no longer pending on elrond");
                return ElrondToEthStep::INITIAL;
            }
            Err(err) => {
                error!(batch_id = %stored.id, ?err, "could not fetch pending batch from elrond");
                return ElrondToEthStep::INITIAL;
            }
        }

        if let Err(err) = self.bridge.resolve_new_deposits_statuses().await {
            error!(batch_id = %stored.id, ?err, "could not resolve deposit statuses");
            return ElrondToEthStep::INITIAL;
        }

        ElrondToEthStep::ProposingSetStatusOnElrond
    }
}

#[async_trait]
impl<E> Step<ElrondToEthStep> for ProposeSetStatusStep<E>
where
    E: ElrondToEthExecutor + 'static,
{
    fn identifier(&self) -> ElrondToEthStep {
        ElrondToEthStep::ProposingSetStatusOnElrond
    }

    fn transitions(&self) -> Vec<ElrondToEthStep> {
        vec![
            self.identifier(),
            ElrondToEthStep::INITIAL,
            ElrondToEthStep::SigningProposedSetStatusOnElrond,
        ]
    }

    async fn execute(&self, _cancel: &CancellationToken) -> ElrondToEthStep {
        let Some(batch) = self.bridge.stored_batch().await else {
            debug!("no batch stored");
            return ElrondToEthStep::INITIAL;
        };
        let batch_id = batch.id;

        match self.bridge.was_set_status_proposed_on_elrond().await {
            Ok(true) => {
                info!(%batch_id, "set status already proposed");
                return ElrondToEthStep::SigningProposedSetStatusOnElrond;
            }
            Ok(false) => {}
            Err(err) => {
                error!(%batch_id, ?err, "could not check whether the set status was proposed");
                return ElrondToEthStep::INITIAL;
            }
        }

        if !self.bridge.my_turn_as_leader() {
            debug!(%batch_id, "not my turn as leader in this round");
            return self.identifier();
        }

        info!(%batch_id, "proposing set status");
        if let Err(err) = self.bridge.propose_set_status_on_elrond().await {
            error!(%batch_id, ?err, "could not propose set status");
            return ElrondToEthStep::INITIAL;
        }

        ElrondToEthStep::SigningProposedSetStatusOnElrond
    }
}
