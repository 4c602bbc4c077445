//! Steps around a single action of the Elrond multisig contract.
//!
//! Both directions end with the same sequence on Elrond: sign the proposed action, wait until
//! enough relayers signed it and let the leader perform it. Only the action differs (a transfer
//! for `EthToElrond`, a set-status for `ElrondToEth`), which the executor resolves through
//! [`MultisigActionExecutor::get_and_store_action_id_on_elrond`].

use std::sync::Arc;

use async_trait::async_trait;
use bridge_relayer_state_machine::{Step, StepIdentifier};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::executor::MultisigActionExecutor;

/// Signs the action proposed for the stored batch unless this relayer already did.
///
/// Routes to `next` whether the signature was just sent or was already there.
#[derive(Debug)]
pub struct SignProposedActionStep<I, E> {
    bridge: Arc<E>,
    identifier: I,
    recovery: I,
    next: I,
}

impl<I, E> SignProposedActionStep<I, E> {
    /// Creates the step registered under `identifier`.
    pub const fn new(bridge: Arc<E>, identifier: I, recovery: I, next: I) -> Self {
        Self {
            bridge,
            identifier,
            recovery,
            next,
        }
    }
}

#[async_trait]
impl<I, E> Step<I> for SignProposedActionStep<I, E>
where
    I: StepIdentifier,
    E: MultisigActionExecutor + 'static,
{
    fn identifier(&self) -> I {
        self.identifier
    }

    fn transitions(&self) -> Vec<I> {
        vec![self.recovery, self.next]
    }

    async fn execute(&self, _cancel: &CancellationToken) -> I {
        let Some(batch) = self.bridge.stored_batch().await else {
            debug!(step = %self.identifier, "no batch stored");
            return self.recovery;
        };
        let batch_id = batch.id;

        let action_id = match self.bridge.get_and_store_action_id_on_elrond().await {
            Ok(action_id) if action_id.is_valid() => action_id,
            Ok(_) => {
                warn!(%batch_id, "contract returned an invalid action id");
                return self.recovery;
            }
            Err(err) => {
                error!(%batch_id, ?err, "could not fetch action id");
                return self.recovery;
            }
        };

        let was_signed = match self.bridge.was_action_signed_on_elrond().await {
            Ok(was_signed) => was_signed,
            Err(err) => {
                error!(
                    %batch_id,
                    %action_id,
                    ?err,
                    "could not check whether the action was signed"
                );
                return self.recovery;
            }
        };

        if was_signed {
            debug!(%batch_id, %action_id, "action already signed");
            return self.next;
        }

        info!(%batch_id, %action_id, "signing action");
        if let Err(err) = self.bridge.sign_action_on_elrond().await {
            error!(%batch_id, %action_id, ?err, "could not sign action");
            return self.recovery;
        }

        self.next
    }
}

/// Polls the quorum of the stored action until it is reached or the retry budget runs out.
#[derive(Debug)]
pub struct WaitForQuorumStep<I, E> {
    bridge: Arc<E>,
    identifier: I,
    recovery: I,
    next: I,
}

impl<I, E> WaitForQuorumStep<I, E> {
    /// Creates the step registered under `identifier`.
    pub const fn new(bridge: Arc<E>, identifier: I, recovery: I, next: I) -> Self {
        Self {
            bridge,
            identifier,
            recovery,
            next,
        }
    }
}

#[async_trait]
impl<I, E> Step<I> for WaitForQuorumStep<I, E>
where
    I: StepIdentifier,
    E: MultisigActionExecutor + 'static,
{
    fn identifier(&self) -> I {
        self.identifier
    }

    fn transitions(&self) -> Vec<I> {
        vec![self.identifier, self.recovery, self.next]
    }

    async fn execute(&self, _cancel: &CancellationToken) -> I {
        let action_id = self.bridge.stored_action_id().await;

        if self.bridge.process_max_quorum_retries_on_elrond().await {
            warn!(%action_id, "max number of retries reached while waiting for quorum");
            return self.recovery;
        }

        match self.bridge.process_quorum_reached_on_elrond().await {
            Ok(true) => {
                info!(%action_id, "quorum reached");
                self.next
            }
            Ok(false) => self.identifier,
            Err(err) => {
                error!(%action_id, ?err, "could not check quorum");
                self.recovery
            }
        }
    }
}

/// Performs the stored action when it is this relayer's turn as leader.
///
/// After performing, the step stays put: the next poll observes the action as performed and
/// moves on, which also covers an action performed by another relayer.
#[derive(Debug)]
pub struct PerformActionStep<I, E> {
    bridge: Arc<E>,
    identifier: I,
    recovery: I,
    next: I,
}

impl<I, E> PerformActionStep<I, E> {
    /// Creates the step registered under `identifier`.
    pub const fn new(bridge: Arc<E>, identifier: I, recovery: I, next: I) -> Self {
        Self {
            bridge,
            identifier,
            recovery,
            next,
        }
    }
}

#[async_trait]
impl<I, E> Step<I> for PerformActionStep<I, E>
where
    I: StepIdentifier,
    E: MultisigActionExecutor + 'static,
{
    fn identifier(&self) -> I {
        self.identifier
    }

    fn transitions(&self) -> Vec<I> {
        vec![self.identifier, self.recovery, self.next]
    }

    async fn execute(&self, _cancel: &CancellationToken) -> I {
        let action_id = self.bridge.stored_action_id().await;

        match self.bridge.was_action_performed_on_elrond().await {
            Ok(true) => {
                info!(%action_id, "action performed");
                return self.next;
            }
            Ok(false) => {}
            Err(err) => {
                error!(%action_id, ?err, "could not check whether the action was performed");
                return self.recovery;
            }
        }

        if !self.bridge.my_turn_as_leader() {
            debug!(%action_id, "not my turn as leader in this round");
            return self.identifier;
        }

        if let Err(err) = self.bridge.perform_action_on_elrond().await {
            error!(%action_id, ?err, "could not perform action");
            return self.recovery;
        }

        self.identifier
    }
}
