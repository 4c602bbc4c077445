//! The `EthToElrond` direction: relays batches of deposits made on the Ethereum safe contract by
//! proposing, signing and performing a transfer action on the Elrond multisig contract.

mod steps;

use std::{fmt, sync::Arc};

use bridge_relayer_state_machine::{errors::StateMachineResult, MachineStates, Step};

pub use self::steps::{GetPendingBatchStep, ProposeTransferStep};
use crate::{
    elrond_actions::{PerformActionStep, SignProposedActionStep, WaitForQuorumStep},
    executor::EthToElrondExecutor,
};

/// Name under which the `EthToElrond` state machine runs.
pub const MACHINE_NAME: &str = "EthToElrond";

/// The steps of the `EthToElrond` direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EthToElrondStep {
    /// Looks for the next Ethereum batch not yet executed on Elrond.
    GettingPendingBatchFromEthereum,

    /// Proposes the transfer of the batch on Elrond.
    ProposingTransferOnElrond,

    /// Signs the proposed transfer.
    SigningProposedTransferOnElrond,

    /// Waits for enough signatures on the proposed transfer.
    WaitingForQuorum,

    /// Performs the transfer action once quorum is reached.
    PerformingActionID,
}

impl EthToElrondStep {
    /// The step every machine of this direction starts from and recovers to.
    pub const INITIAL: Self = Self::GettingPendingBatchFromEthereum;
}

impl fmt::Display for EthToElrondStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GettingPendingBatchFromEthereum => "GettingPendingBatchFromEthereum",
            Self::ProposingTransferOnElrond => "ProposingTransferOnElrond",
            Self::SigningProposedTransferOnElrond => "SigningProposedTransferOnElrond",
            Self::WaitingForQuorum => "WaitingForQuorum",
            Self::PerformingActionID => "PerformingActionID",
        };

        f.write_str(name)
    }
}

/// Builds the step graph of the `EthToElrond` direction around `executor`.
pub fn create_steps<E>(executor: Arc<E>) -> StateMachineResult<MachineStates<EthToElrondStep>>
where
    E: EthToElrondExecutor + 'static,
{
    use EthToElrondStep::*;
    let initial = EthToElrondStep::INITIAL;

    let steps: Vec<Box<dyn Step<EthToElrondStep>>> = vec![
        Box::new(GetPendingBatchStep::new(executor.clone())),
        Box::new(ProposeTransferStep::new(executor.clone())),
        Box::new(SignProposedActionStep::new(
            executor.clone(),
            SigningProposedTransferOnElrond,
            initial,
            WaitingForQuorum,
        )),
        Box::new(WaitForQuorumStep::new(
            executor.clone(),
            WaitingForQuorum,
            initial,
            PerformingActionID,
        )),
        Box::new(PerformActionStep::new(
            executor,
            PerformingActionID,
            initial,
            initial,
        )),
    ];

    MachineStates::new(steps)
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::test_utils::ExecutorStub;

    #[test]
    fn graph_is_closed_and_complete() {
        let graph = create_steps(Arc::new(ExecutorStub::default())).unwrap();

        assert_eq!(
            graph.identifiers().collect::<Vec<_>>(),
            vec![
                EthToElrondStep::GettingPendingBatchFromEthereum,
                EthToElrondStep::ProposingTransferOnElrond,
                EthToElrondStep::SigningProposedTransferOnElrond,
                EthToElrondStep::WaitingForQuorum,
                EthToElrondStep::PerformingActionID,
            ]
        );
    }

    #[test]
    fn display_uses_step_names() {
        assert_eq!(
            EthToElrondStep::INITIAL.to_string(),
            "GettingPendingBatchFromEthereum"
        );
        assert_eq!(
            EthToElrondStep::PerformingActionID.to_string(),
            "PerformingActionID"
        );
    }

    #[tokio::test]
    async fn happy_path_runs_a_full_cycle() {
        let executor = Arc::new(ExecutorStub::default());
        let graph = create_steps(executor.clone()).unwrap();
        let cancel = CancellationToken::new();

        let mut current = EthToElrondStep::INITIAL;
        let mut visited = vec![current];
        for _ in 0..4 {
            current = graph.get(current).unwrap().execute(&cancel).await;
            visited.push(current);
        }

        assert_eq!(
            visited,
            vec![
                EthToElrondStep::GettingPendingBatchFromEthereum,
                EthToElrondStep::ProposingTransferOnElrond,
                EthToElrondStep::SigningProposedTransferOnElrond,
                EthToElrondStep::WaitingForQuorum,
                EthToElrondStep::PerformingActionID,
            ]
        );
        assert_eq!(executor.requested_batch_id(), Some(7));
        assert_eq!(executor.count("propose_transfer_on_elrond"), 1);
        assert_eq!(executor.count("sign_action_on_elrond"), 1);
    }
}
