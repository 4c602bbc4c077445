//! Chain client mocks for the executor tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_relayer_batch_validator::DisabledBatchValidator;
use bridge_relayer_primitives::{
    action::ActionId,
    batch::{DepositTransfer, TransferBatch},
    status::DepositStatus,
};
use num_bigint::BigUint;

use crate::{
    clients::{BridgeClients, ElrondClient, EthereumClient, MessageHash, TopologyProvider},
    errors::{ClientError, ClientResult},
};

pub(crate) fn batch_with_nonces(id: u64, nonces: &[u64]) -> TransferBatch {
    let deposits = nonces
        .iter()
        .map(|nonce| DepositTransfer {
            nonce: *nonce,
            to_bytes: vec![0xaa; 20],
            displayable_to: "0xreceiver".to_string(),
            from_bytes: vec![0xbb; 32],
            displayable_from: "erd1sender".to_string(),
            token_bytes: b"WETH-abcdef".to_vec(),
            displayable_token: "WETH-abcdef".to_string(),
            amount: BigUint::from(1_000u32) * BigUint::from(*nonce),
        })
        .collect();

    TransferBatch::new(id, deposits)
}

pub(crate) fn clients(
    elrond: Arc<MockElrond>,
    ethereum: Arc<MockEthereum>,
    leader: bool,
) -> BridgeClients {
    BridgeClients {
        elrond,
        ethereum,
        topology: Arc::new(FixedTopology(leader)),
        validator: Arc::new(DisabledBatchValidator),
    }
}

#[derive(Debug)]
pub(crate) struct FixedTopology(pub(crate) bool);

impl TopologyProvider for FixedTopology {
    fn my_turn_as_leader(&self) -> bool {
        self.0
    }
}

fn check(fail: bool) -> ClientResult<()> {
    if fail {
        return Err(ClientError::Rpc("connection refused".to_string()));
    }

    Ok(())
}

#[derive(Debug)]
pub(crate) struct MockElrond {
    pub(crate) fail: bool,
    pub(crate) pending_batch: Option<TransferBatch>,
    pub(crate) last_executed_eth_batch_id: u64,
    pub(crate) last_executed_eth_tx_id: u64,
    pub(crate) action_id: ActionId,
    pub(crate) set_status_proposed: bool,
    pub(crate) proposed_statuses: Mutex<Vec<DepositStatus>>,
}

impl Default for MockElrond {
    fn default() -> Self {
        Self {
            fail: false,
            pending_batch: None,
            last_executed_eth_batch_id: 0,
            last_executed_eth_tx_id: 0,
            action_id: ActionId::new(42),
            set_status_proposed: false,
            proposed_statuses: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ElrondClient for MockElrond {
    async fn get_pending_batch(&self) -> ClientResult<Option<TransferBatch>> {
        check(self.fail)?;
        Ok(self.pending_batch.clone())
    }

    async fn get_last_executed_eth_batch_id(&self) -> ClientResult<u64> {
        check(self.fail)?;
        Ok(self.last_executed_eth_batch_id)
    }

    async fn get_last_executed_eth_tx_id(&self) -> ClientResult<u64> {
        check(self.fail)?;
        Ok(self.last_executed_eth_tx_id)
    }

    async fn was_transfer_proposed(&self, _batch: &TransferBatch) -> ClientResult<bool> {
        check(self.fail)?;
        Ok(false)
    }

    async fn get_action_id_for_propose_transfer(
        &self,
        _batch: &TransferBatch,
    ) -> ClientResult<ActionId> {
        check(self.fail)?;
        Ok(self.action_id)
    }

    async fn was_set_status_proposed(
        &self,
        _batch: &TransferBatch,
        _statuses: &[DepositStatus],
    ) -> ClientResult<bool> {
        check(self.fail)?;
        Ok(self.set_status_proposed)
    }

    async fn get_action_id_for_set_status(
        &self,
        _batch: &TransferBatch,
        _statuses: &[DepositStatus],
    ) -> ClientResult<ActionId> {
        check(self.fail)?;
        Ok(ActionId::new(self.action_id.get() + 1))
    }

    async fn quorum_reached(&self, _action_id: ActionId) -> ClientResult<bool> {
        check(self.fail)?;
        Ok(true)
    }

    async fn was_signed(&self, _action_id: ActionId) -> ClientResult<bool> {
        check(self.fail)?;
        Ok(false)
    }

    async fn was_executed(&self, _action_id: ActionId) -> ClientResult<bool> {
        check(self.fail)?;
        Ok(false)
    }

    async fn propose_transfer(&self, _batch: &TransferBatch) -> ClientResult<String> {
        check(self.fail)?;
        Ok("elrond-propose-transfer".to_string())
    }

    async fn propose_set_status(
        &self,
        _batch: &TransferBatch,
        statuses: &[DepositStatus],
    ) -> ClientResult<String> {
        check(self.fail)?;
        *self.proposed_statuses.lock().unwrap() = statuses.to_vec();
        Ok("elrond-propose-set-status".to_string())
    }

    async fn sign(&self, _action_id: ActionId) -> ClientResult<String> {
        check(self.fail)?;
        Ok("elrond-sign".to_string())
    }

    async fn perform_action(
        &self,
        _action_id: ActionId,
        _batch: &TransferBatch,
    ) -> ClientResult<String> {
        check(self.fail)?;
        Ok("elrond-perform".to_string())
    }
}

#[derive(Debug)]
pub(crate) struct MockEthereum {
    pub(crate) fail: bool,
    pub(crate) batch: Option<TransferBatch>,
    pub(crate) executed: bool,
    pub(crate) quorum_size: usize,
    pub(crate) signatures: usize,
    pub(crate) statuses: Vec<DepositStatus>,
    pub(crate) broadcasts: Mutex<Vec<MessageHash>>,
    pub(crate) executed_with_quorum: Mutex<Option<usize>>,
}

impl Default for MockEthereum {
    fn default() -> Self {
        Self {
            fail: false,
            batch: None,
            executed: false,
            quorum_size: 3,
            signatures: 3,
            statuses: Vec::new(),
            broadcasts: Mutex::new(Vec::new()),
            executed_with_quorum: Mutex::new(None),
        }
    }
}

#[async_trait]
impl EthereumClient for MockEthereum {
    async fn get_batch(&self, _batch_id: u64) -> ClientResult<Option<TransferBatch>> {
        check(self.fail)?;
        Ok(self.batch.clone())
    }

    async fn was_executed(&self, _batch_id: u64) -> ClientResult<bool> {
        check(self.fail)?;
        Ok(self.executed)
    }

    async fn generate_message_hash(&self, batch: &TransferBatch) -> ClientResult<MessageHash> {
        check(self.fail)?;
        Ok(MessageHash([batch.id as u8; 32]))
    }

    async fn broadcast_signature_for_message_hash(&self, hash: MessageHash) -> ClientResult<()> {
        check(self.fail)?;
        self.broadcasts.lock().unwrap().push(hash);
        Ok(())
    }

    async fn get_quorum_size(&self) -> ClientResult<usize> {
        check(self.fail)?;
        Ok(self.quorum_size)
    }

    async fn signatures_count(&self, _hash: MessageHash) -> ClientResult<usize> {
        check(self.fail)?;
        Ok(self.signatures)
    }

    async fn execute_transfer(
        &self,
        _hash: MessageHash,
        _batch: &TransferBatch,
        quorum: usize,
    ) -> ClientResult<String> {
        check(self.fail)?;
        *self.executed_with_quorum.lock().unwrap() = Some(quorum);
        Ok("ethereum-execute".to_string())
    }

    async fn get_transactions_statuses(&self, _batch_id: u64) -> ClientResult<Vec<DepositStatus>> {
        check(self.fail)?;
        Ok(self.statuses.clone())
    }
}
