//! The `ElrondToEth` direction: relays batches of deposits made on the Elrond multisig contract
//! by executing them on the Ethereum safe contract, then reports the final deposit statuses back
//! to Elrond through a set-status action.

mod steps;

use std::{fmt, sync::Arc};

use bridge_relayer_state_machine::{errors::StateMachineResult, MachineStates, Step};

pub use self::steps::{
    GetPendingBatchStep, PerformTransferStep, ProposeSetStatusStep, ResolveSetStatusStep,
    SignTransferStep, WaitForTransferQuorumStep, WaitTransferConfirmationStep,
};
use crate::{
    elrond_actions::{PerformActionStep, SignProposedActionStep, WaitForQuorumStep},
    executor::ElrondToEthExecutor,
};

/// Name under which the `ElrondToEth` state machine runs.
pub const MACHINE_NAME: &str = "ElrondToEth";

/// The steps of the `ElrondToEth` direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElrondToEthStep {
    /// Looks for a pending batch on Elrond.
    GettingPendingBatchFromElrond,

    /// Signs the message hash of the batch and broadcasts the signature.
    SigningProposedTransferOnEthereum,

    /// Waits for enough signatures on the message hash.
    WaitingForQuorumOnTransfer,

    /// Executes the transfer on Ethereum.
    PerformingTransfer,

    /// Waits for the executed transfer to show up on Ethereum.
    WaitingTransferConfirmation,

    /// Reads the final deposit statuses from Ethereum.
    ResolvingSetStatusOnElrond,

    /// Proposes the set-status action on Elrond.
    ProposingSetStatusOnElrond,

    /// Signs the proposed set-status action.
    SigningProposedSetStatusOnElrond,

    /// Waits for enough signatures on the set-status action.
    WaitingForQuorumOnSetStatus,

    /// Performs the set-status action once quorum is reached.
    PerformingSetStatus,
}

impl ElrondToEthStep {
    /// The step every machine of this direction starts from and recovers to.
    pub const INITIAL: Self = Self::GettingPendingBatchFromElrond;
}

impl fmt::Display for ElrondToEthStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GettingPendingBatchFromElrond => "GettingPendingBatchFromElrond",
            Self::SigningProposedTransferOnEthereum => "SigningProposedTransferOnEthereum",
            Self::WaitingForQuorumOnTransfer => "WaitingForQuorumOnTransfer",
            Self::PerformingTransfer => "PerformingTransfer",
            Self::WaitingTransferConfirmation => "WaitingTransferConfirmation",
            Self::ResolvingSetStatusOnElrond => "ResolvingSetStatusOnElrond",
            Self::ProposingSetStatusOnElrond => "ProposingSetStatusOnElrond",
            Self::SigningProposedSetStatusOnElrond => "SigningProposedSetStatusOnElrond",
            Self::WaitingForQuorumOnSetStatus => "WaitingForQuorumOnSetStatus",
            Self::PerformingSetStatus => "PerformingSetStatus",
        };

        f.write_str(name)
    }
}

/// Builds the step graph of the `ElrondToEth` direction around `executor`.
pub fn create_steps<E>(executor: Arc<E>) -> StateMachineResult<MachineStates<ElrondToEthStep>>
where
    E: ElrondToEthExecutor + 'static,
{
    use ElrondToEthStep::*;
    let initial = ElrondToEthStep::INITIAL;

    let steps: Vec<Box<dyn Step<ElrondToEthStep>>> = vec![
        Box::new(GetPendingBatchStep::new(executor.clone())),
        Box::new(SignTransferStep::new(executor.clone())),
        Box::new(WaitForTransferQuorumStep::new(executor.clone())),
        Box::new(PerformTransferStep::new(executor.clone())),
        Box::new(WaitTransferConfirmationStep::new(executor.clone())),
        Box::new(ResolveSetStatusStep::new(executor.clone())),
        Box::new(ProposeSetStatusStep::new(executor.clone())),
        Box::new(SignProposedActionStep::new(
            executor.clone(),
            SigningProposedSetStatusOnElrond,
            initial,
            WaitingForQuorumOnSetStatus,
        )),
        Box::new(WaitForQuorumStep::new(
            executor.clone(),
            WaitingForQuorumOnSetStatus,
            initial,
            PerformingSetStatus,
        )),
        Box::new(PerformActionStep::new(
            executor,
            PerformingSetStatus,
            initial,
            initial,
        )),
    ];

    MachineStates::new(steps)
}
