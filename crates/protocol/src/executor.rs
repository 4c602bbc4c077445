//! Chain-agnostic capabilities consumed by the steps.
//!
//! An executor caches the batch being relayed and the action id obtained for it, so that steps
//! stay stateless between polls. One executor instance serves exactly one direction; the chain
//! clients behind it may be shared between directions.

use std::fmt;

use async_trait::async_trait;
use bridge_relayer_primitives::{action::ActionId, batch::TransferBatch};
use tokio_util::sync::CancellationToken;

use crate::errors::ExecutorResult;

/// Capabilities needed by the steps of both directions.
#[async_trait]
pub trait BaseExecutor: fmt::Debug + Send + Sync {
    /// Returns a copy of the batch currently being relayed, if any.
    async fn stored_batch(&self) -> Option<TransferBatch>;

    /// Returns the action id cached for the stored batch, [`ActionId::INVALID`] if none.
    async fn stored_action_id(&self) -> ActionId;

    /// Whether this relayer is allowed to perform execute-class actions in the current round.
    fn my_turn_as_leader(&self) -> bool;

    /// Asks the batch validator whether the stored batch may be relayed.
    async fn validate_batch(&self, batch: &TransferBatch) -> ExecutorResult<bool>;
}

/// Capabilities around a single action of the Elrond multisig contract.
///
/// Each direction works on one kind of action: `EthToElrond` on the transfer proposal and
/// `ElrondToEth` on the set-status proposal. All calls operate on the stored action id.
#[async_trait]
pub trait MultisigActionExecutor: BaseExecutor {
    /// Looks up the action id of this direction's proposal for the stored batch and caches it.
    async fn get_and_store_action_id_on_elrond(&self) -> ExecutorResult<ActionId>;

    /// Whether this relayer already signed the stored action.
    async fn was_action_signed_on_elrond(&self) -> ExecutorResult<bool>;

    /// Signs the stored action.
    async fn sign_action_on_elrond(&self) -> ExecutorResult<()>;

    /// Whether enough relayers signed the stored action.
    async fn process_quorum_reached_on_elrond(&self) -> ExecutorResult<bool>;

    /// Counts one more quorum check and returns `true` once the retry budget is exhausted.
    async fn process_max_quorum_retries_on_elrond(&self) -> bool;

    /// Resets the quorum check budget.
    async fn reset_retries_count_on_elrond(&self);

    /// Whether the stored action was already performed.
    async fn was_action_performed_on_elrond(&self) -> ExecutorResult<bool>;

    /// Performs the stored action.
    async fn perform_action_on_elrond(&self) -> ExecutorResult<()>;
}

/// Capabilities used by the `EthToElrond` direction.
#[async_trait]
pub trait EthToElrondExecutor: MultisigActionExecutor {
    /// Returns the id of the last Ethereum batch executed on Elrond.
    async fn get_last_executed_eth_batch_id_from_elrond(&self) -> ExecutorResult<u64>;

    /// Fetches the Ethereum batch with the given id and stores it, or clears the stored batch if
    /// there is none.
    async fn get_and_store_batch_from_ethereum(&self, batch_id: u64) -> ExecutorResult<()>;

    /// Checks that the deposits of the stored batch continue the last deposit nonce executed on
    /// Elrond without gaps.
    async fn verify_last_deposit_nonce_executed_on_ethereum_batch(&self) -> ExecutorResult<()>;

    /// Whether the transfer of the stored batch was already proposed on Elrond.
    async fn was_transfer_proposed_on_elrond(&self) -> ExecutorResult<bool>;

    /// Proposes the transfer of the stored batch on Elrond.
    async fn propose_transfer_on_elrond(&self) -> ExecutorResult<()>;
}

/// Capabilities used by the `ElrondToEth` direction.
#[async_trait]
pub trait ElrondToEthExecutor: MultisigActionExecutor {
    /// Fetches the pending Elrond batch and stores it, or clears the stored batch if there is
    /// none.
    async fn get_and_store_batch_from_elrond(&self) -> ExecutorResult<()>;

    /// Fetches the pending Elrond batch without touching the stored one.
    async fn get_batch_from_elrond(&self) -> ExecutorResult<Option<TransferBatch>>;

    /// Whether the transfer of the stored batch was already executed on Ethereum.
    async fn was_transfer_performed_on_ethereum(&self) -> ExecutorResult<bool>;

    /// Signs the message hash of the stored batch and broadcasts the signature to the other
    /// relayers.
    async fn sign_transfer_on_ethereum(&self) -> ExecutorResult<()>;

    /// Whether enough signatures were collected for the stored batch.
    async fn process_quorum_reached_on_ethereum(&self) -> ExecutorResult<bool>;

    /// Counts one more quorum check and returns `true` once the retry budget is exhausted.
    async fn process_max_quorum_retries_on_ethereum(&self) -> bool;

    /// Resets the quorum check budget.
    async fn reset_retries_count_on_ethereum(&self);

    /// Executes the transfer of the stored batch on Ethereum.
    async fn perform_transfer_on_ethereum(&self) -> ExecutorResult<()>;

    /// Waits until the transfer is observed on Ethereum, the wait budget is spent or `cancel`
    /// fires, whichever comes first.
    async fn wait_for_transfer_confirmation(&self, cancel: &CancellationToken);

    /// Reads the final deposit statuses of the stored batch from Ethereum and stores them.
    async fn resolve_new_deposits_statuses(&self) -> ExecutorResult<()>;

    /// Whether the set-status of the stored batch was already proposed on Elrond.
    async fn was_set_status_proposed_on_elrond(&self) -> ExecutorResult<bool>;

    /// Proposes the set-status of the stored batch on Elrond.
    async fn propose_set_status_on_elrond(&self) -> ExecutorResult<()>;
}
