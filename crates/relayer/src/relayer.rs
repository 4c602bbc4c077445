use std::sync::Arc;

use bridge_relayer_batch_validator::{BatchValidator, DisabledBatchValidator, HttpBatchValidator};
use bridge_relayer_common::logging;
use bridge_relayer_executor::{
    BridgeClients, ElrondClient, ElrondToEthBridge, EthToElrondBridge, EthereumClient,
    TopologyProvider,
};
use bridge_relayer_primitives::chain::Chain;
use bridge_relayer_protocol::{
    elrond_to_eth::{self, ElrondToEthStep},
    eth_to_elrond::{self, EthToElrondStep},
    executor::{ElrondToEthExecutor, EthToElrondExecutor},
};
use bridge_relayer_state_machine::StateMachine;
use futures::future::join;
use tracing::info;

use crate::{config::Config, errors::RelayerError};

/// A running relayer: one state machine per bridge direction.
///
/// Dropping the relayer stops both machines.
#[derive(Debug)]
pub struct Relayer {
    eth_to_elrond: StateMachine,
    elrond_to_eth: StateMachine,
}

impl Relayer {
    /// Installs the global logger described by `config`.
    pub fn init_logging(config: &Config) -> Result<(), RelayerError> {
        Ok(logging::init(config.logger_config())?)
    }

    /// Starts both directions with the given executors.
    ///
    /// Both configurations are looked up and both step graphs are built and checked for their
    /// initial step before any machine is spawned, so a failure leaves nothing running.
    pub fn start<A, B>(
        config: &Config,
        eth_to_elrond: Arc<A>,
        elrond_to_eth: Arc<B>,
    ) -> Result<Self, RelayerError>
    where
        A: EthToElrondExecutor + 'static,
        B: ElrondToEthExecutor + 'static,
    {
        let eth_to_elrond_config = config.state_machine(eth_to_elrond::MACHINE_NAME)?;
        let elrond_to_eth_config = config.state_machine(elrond_to_eth::MACHINE_NAME)?;

        let eth_to_elrond_steps = eth_to_elrond::create_steps(eth_to_elrond)?;
        let elrond_to_eth_steps = elrond_to_eth::create_steps(elrond_to_eth)?;
        eth_to_elrond_steps.get(EthToElrondStep::INITIAL)?;
        elrond_to_eth_steps.get(ElrondToEthStep::INITIAL)?;

        let eth_to_elrond = StateMachine::new(
            eth_to_elrond::MACHINE_NAME,
            eth_to_elrond_steps,
            EthToElrondStep::INITIAL,
            eth_to_elrond_config.step_duration(),
        )?;
        let elrond_to_eth = StateMachine::new(
            elrond_to_eth::MACHINE_NAME,
            elrond_to_eth_steps,
            ElrondToEthStep::INITIAL,
            elrond_to_eth_config.step_duration(),
        )?;

        info!("relayer started");

        Ok(Self {
            eth_to_elrond,
            elrond_to_eth,
        })
    }

    /// Builds the executors of both directions on top of shared chain clients and starts them.
    ///
    /// Each direction gets its own batch validator, scoped by its source and destination chains.
    pub fn start_with_clients(
        config: &Config,
        elrond: Arc<dyn ElrondClient>,
        ethereum: Arc<dyn EthereumClient>,
        topology: Arc<dyn TopologyProvider>,
    ) -> Result<Self, RelayerError> {
        let executor_config = config.executor_config();
        let clients = |validator: Arc<dyn BatchValidator>| BridgeClients {
            elrond: elrond.clone(),
            ethereum: ethereum.clone(),
            topology: topology.clone(),
            validator,
        };

        let eth_to_elrond = EthToElrondBridge::new(
            clients(batch_validator(config, Chain::Ethereum, Chain::Elrond)?),
            executor_config,
        );
        let elrond_to_eth = ElrondToEthBridge::new(
            clients(batch_validator(config, Chain::Elrond, Chain::Ethereum)?),
            executor_config,
        );

        Self::start(config, Arc::new(eth_to_elrond), Arc::new(elrond_to_eth))
    }

    /// Whether the `EthToElrond` machine is still polling.
    pub fn is_eth_to_elrond_running(&self) -> bool {
        self.eth_to_elrond.is_running()
    }

    /// Whether the `ElrondToEth` machine is still polling.
    pub fn is_elrond_to_eth_running(&self) -> bool {
        self.elrond_to_eth.is_running()
    }

    /// Requests both machines to stop without waiting for them.
    pub fn close(&self) {
        self.eth_to_elrond.close();
        self.elrond_to_eth.close();
    }

    /// Stops both machines and waits for their tasks to exit.
    pub async fn shutdown(self) {
        join(self.eth_to_elrond.shutdown(), self.elrond_to_eth.shutdown()).await;

        info!("relayer stopped");
    }
}

fn batch_validator(
    config: &Config,
    source: Chain,
    destination: Chain,
) -> Result<Arc<dyn BatchValidator>, RelayerError> {
    if !config.batch_validator.enabled {
        return Ok(Arc::new(DisabledBatchValidator));
    }

    let validator =
        HttpBatchValidator::new(&config.batch_validator.client_config(source, destination))?;
    info!(endpoint = %validator.endpoint(), %source, %destination, "batch validator enabled");

    Ok(Arc::new(validator))
}
