//! A configurable executor used by the step tests.

use std::sync::Mutex;

use async_trait::async_trait;
use bridge_relayer_primitives::{
    action::ActionId,
    batch::{DepositTransfer, TransferBatch},
    chain::Chain,
};
use num_bigint::BigUint;
use tokio_util::sync::CancellationToken;

use crate::{
    errors::{ExecutorError, ExecutorResult},
    executor::{BaseExecutor, ElrondToEthExecutor, EthToElrondExecutor, MultisigActionExecutor},
};

/// Batch 7 with a single deposit of 100 units.
pub(crate) fn sample_batch() -> TransferBatch {
    TransferBatch::new(
        7,
        vec![DepositTransfer {
            nonce: 1,
            to_bytes: b"receiver".to_vec(),
            displayable_to: "erd1receiver".to_string(),
            from_bytes: b"sender".to_vec(),
            displayable_from: "0xsender".to_string(),
            token_bytes: b"token".to_vec(),
            displayable_token: "0xtoken".to_string(),
            amount: BigUint::from(100u32),
        }],
    )
}

/// Executor whose answers are plain fields and which records every call it receives.
///
/// The defaults describe the happy path: batch 7 is pending and nothing happened on chain yet.
#[derive(Debug)]
pub(crate) struct ExecutorStub {
    pub(crate) leader: bool,
    pub(crate) validation: Result<bool, &'static str>,

    pub(crate) action_id: Result<ActionId, &'static str>,
    pub(crate) action_signed: Result<bool, &'static str>,
    pub(crate) sign_action: Result<(), &'static str>,
    pub(crate) quorum_reached: Result<bool, &'static str>,
    pub(crate) max_quorum_retries_reached: bool,
    pub(crate) action_performed: Result<bool, &'static str>,
    pub(crate) perform_action: Result<(), &'static str>,

    pub(crate) last_executed_eth_batch_id: Result<u64, &'static str>,
    pub(crate) ethereum_batch: Result<Option<TransferBatch>, &'static str>,
    pub(crate) verify_deposit_nonce: Result<(), &'static str>,
    pub(crate) transfer_proposed: Result<bool, &'static str>,
    pub(crate) propose_transfer: Result<(), &'static str>,

    pub(crate) elrond_batch: Result<Option<TransferBatch>, &'static str>,
    pub(crate) transfer_performed: Result<bool, &'static str>,
    pub(crate) sign_transfer: Result<(), &'static str>,
    pub(crate) eth_quorum_reached: Result<bool, &'static str>,
    pub(crate) max_eth_quorum_retries_reached: bool,
    pub(crate) perform_transfer: Result<(), &'static str>,
    pub(crate) resolve_statuses: Result<(), &'static str>,
    pub(crate) set_status_proposed: Result<bool, &'static str>,
    pub(crate) propose_set_status: Result<(), &'static str>,

    pub(crate) stored_batch: Mutex<Option<TransferBatch>>,
    pub(crate) stored_action_id: Mutex<ActionId>,
    pub(crate) requested_batch_id: Mutex<Option<u64>>,
    pub(crate) calls: Mutex<Vec<&'static str>>,
}

impl Default for ExecutorStub {
    fn default() -> Self {
        Self {
            leader: true,
            validation: Ok(true),

            action_id: Ok(ActionId::new(2)),
            action_signed: Ok(false),
            sign_action: Ok(()),
            quorum_reached: Ok(true),
            max_quorum_retries_reached: false,
            action_performed: Ok(false),
            perform_action: Ok(()),

            last_executed_eth_batch_id: Ok(6),
            ethereum_batch: Ok(Some(sample_batch())),
            verify_deposit_nonce: Ok(()),
            transfer_proposed: Ok(false),
            propose_transfer: Ok(()),

            elrond_batch: Ok(Some(sample_batch())),
            transfer_performed: Ok(false),
            sign_transfer: Ok(()),
            eth_quorum_reached: Ok(true),
            max_eth_quorum_retries_reached: false,
            perform_transfer: Ok(()),
            resolve_statuses: Ok(()),
            set_status_proposed: Ok(false),
            propose_set_status: Ok(()),

            stored_batch: Mutex::new(None),
            stored_action_id: Mutex::new(ActionId::INVALID),
            requested_batch_id: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ExecutorStub {
    pub(crate) fn store_batch(&self, batch: Option<TransferBatch>) {
        *self.stored_batch.lock().unwrap() = batch;
    }

    /// How many times the executor call `name` was made.
    pub(crate) fn count(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == name)
            .count()
    }

    pub(crate) fn requested_batch_id(&self) -> Option<u64> {
        *self.requested_batch_id.lock().unwrap()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    fn reply<T: Clone>(
        &self,
        name: &'static str,
        chain: Chain,
        response: &Result<T, &'static str>,
    ) -> ExecutorResult<T> {
        self.record(name);
        response
            .clone()
            .map_err(|reason| ExecutorError::chain(chain, reason))
    }
}

#[async_trait]
impl BaseExecutor for ExecutorStub {
    async fn stored_batch(&self) -> Option<TransferBatch> {
        self.stored_batch.lock().unwrap().clone()
    }

    async fn stored_action_id(&self) -> ActionId {
        *self.stored_action_id.lock().unwrap()
    }

    fn my_turn_as_leader(&self) -> bool {
        self.leader
    }

    async fn validate_batch(&self, _batch: &TransferBatch) -> ExecutorResult<bool> {
        self.record("validate_batch");
        self.validation.clone().map_err(|reason| {
            ExecutorError::chain(Chain::Ethereum, format!("validator: {reason}"))
        })
    }
}

#[async_trait]
impl MultisigActionExecutor for ExecutorStub {
    async fn get_and_store_action_id_on_elrond(&self) -> ExecutorResult<ActionId> {
        let action_id = self.reply(
            "get_and_store_action_id_on_elrond",
            Chain::Elrond,
            &self.action_id,
        )?;
        *self.stored_action_id.lock().unwrap() = action_id;

        Ok(action_id)
    }

    async fn was_action_signed_on_elrond(&self) -> ExecutorResult<bool> {
        self.reply(
            "was_action_signed_on_elrond",
            Chain::Elrond,
            &self.action_signed,
        )
    }

    async fn sign_action_on_elrond(&self) -> ExecutorResult<()> {
        self.reply("sign_action_on_elrond", Chain::Elrond, &self.sign_action)
    }

    async fn process_quorum_reached_on_elrond(&self) -> ExecutorResult<bool> {
        self.reply(
            "process_quorum_reached_on_elrond",
            Chain::Elrond,
            &self.quorum_reached,
        )
    }

    async fn process_max_quorum_retries_on_elrond(&self) -> bool {
        self.record("process_max_quorum_retries_on_elrond");
        self.max_quorum_retries_reached
    }

    async fn reset_retries_count_on_elrond(&self) {
        self.record("reset_retries_count_on_elrond");
    }

    async fn was_action_performed_on_elrond(&self) -> ExecutorResult<bool> {
        self.reply(
            "was_action_performed_on_elrond",
            Chain::Elrond,
            &self.action_performed,
        )
    }

    async fn perform_action_on_elrond(&self) -> ExecutorResult<()> {
        self.reply(
            "perform_action_on_elrond",
            Chain::Elrond,
            &self.perform_action,
        )
    }
}

#[async_trait]
impl EthToElrondExecutor for ExecutorStub {
    async fn get_last_executed_eth_batch_id_from_elrond(&self) -> ExecutorResult<u64> {
        self.reply(
            "get_last_executed_eth_batch_id_from_elrond",
            Chain::Elrond,
            &self.last_executed_eth_batch_id,
        )
    }

    async fn get_and_store_batch_from_ethereum(&self, batch_id: u64) -> ExecutorResult<()> {
        *self.requested_batch_id.lock().unwrap() = Some(batch_id);
        let batch = self.reply(
            "get_and_store_batch_from_ethereum",
            Chain::Ethereum,
            &self.ethereum_batch,
        )?;
        self.store_batch(batch);

        Ok(())
    }

    async fn verify_last_deposit_nonce_executed_on_ethereum_batch(&self) -> ExecutorResult<()> {
        self.reply(
            "verify_last_deposit_nonce_executed_on_ethereum_batch",
            Chain::Elrond,
            &self.verify_deposit_nonce,
        )
    }

    async fn was_transfer_proposed_on_elrond(&self) -> ExecutorResult<bool> {
        self.reply(
            "was_transfer_proposed_on_elrond",
            Chain::Elrond,
            &self.transfer_proposed,
        )
    }

    async fn propose_transfer_on_elrond(&self) -> ExecutorResult<()> {
        self.reply(
            "propose_transfer_on_elrond",
            Chain::Elrond,
            &self.propose_transfer,
        )
    }
}

#[async_trait]
impl ElrondToEthExecutor for ExecutorStub {
    async fn get_and_store_batch_from_elrond(&self) -> ExecutorResult<()> {
        let batch = self.reply(
            "get_and_store_batch_from_elrond",
            Chain::Elrond,
            &self.elrond_batch,
        )?;
        self.store_batch(batch);

        Ok(())
    }

    async fn get_batch_from_elrond(&self) -> ExecutorResult<Option<TransferBatch>> {
        self.reply("get_batch_from_elrond", Chain::Elrond, &self.elrond_batch)
    }

    async fn was_transfer_performed_on_ethereum(&self) -> ExecutorResult<bool> {
        self.reply(
            "was_transfer_performed_on_ethereum",
            Chain::Ethereum,
            &self.transfer_performed,
        )
    }

    async fn sign_transfer_on_ethereum(&self) -> ExecutorResult<()> {
        self.reply(
            "sign_transfer_on_ethereum",
            Chain::Ethereum,
            &self.sign_transfer,
        )
    }

    async fn process_quorum_reached_on_ethereum(&self) -> ExecutorResult<bool> {
        self.reply(
            "process_quorum_reached_on_ethereum",
            Chain::Ethereum,
            &self.eth_quorum_reached,
        )
    }

    async fn process_max_quorum_retries_on_ethereum(&self) -> bool {
        self.record("process_max_quorum_retries_on_ethereum");
        self.max_eth_quorum_retries_reached
    }

    async fn reset_retries_count_on_ethereum(&self) {
        self.record("reset_retries_count_on_ethereum");
    }

    async fn perform_transfer_on_ethereum(&self) -> ExecutorResult<()> {
        self.reply(
            "perform_transfer_on_ethereum",
            Chain::Ethereum,
            &self.perform_transfer,
        )
    }

    async fn wait_for_transfer_confirmation(&self, _cancel: &CancellationToken) {
        self.record("wait_for_transfer_confirmation");
    }

    async fn resolve_new_deposits_statuses(&self) -> ExecutorResult<()> {
        self.reply(
            "resolve_new_deposits_statuses",
            Chain::Ethereum,
            &self.resolve_statuses,
        )
    }

    async fn was_set_status_proposed_on_elrond(&self) -> ExecutorResult<bool> {
        self.reply(
            "was_set_status_proposed_on_elrond",
            Chain::Elrond,
            &self.set_status_proposed,
        )
    }

    async fn propose_set_status_on_elrond(&self) -> ExecutorResult<()> {
        self.reply(
            "propose_set_status_on_elrond",
            Chain::Elrond,
            &self.propose_set_status,
        )
    }
}
