//! TOML configuration of the relayer.

use std::{collections::BTreeMap, fs, path::Path, time::Duration};

use bridge_relayer_batch_validator::BatchValidatorConfig as ValidatorClientConfig;
use bridge_relayer_common::logging::{LoggerConfig, DEFAULT_LOG_DIRECTIVE};
use bridge_relayer_executor::ExecutorConfig;
use bridge_relayer_primitives::chain::Chain;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// The configuration values that dictate the behavior of a relayer.
///
/// None of these values are consensus-critical, but relayers with very different poll intervals
/// or retry budgets will spend more rounds waiting for each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Per-direction settings keyed by state machine name (`EthToElrond`, `ElrondToEth`).
    pub state_machines: BTreeMap<String, StateMachineConfig>,

    /// The batch validation microservice.
    pub batch_validator: BatchValidatorConfig,

    /// Ethereum-side tunables.
    pub ethereum: EthereumConfig,

    /// Elrond-side tunables.
    pub elrond: ElrondConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings of one state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMachineConfig {
    /// Time between two polls of the current step, in milliseconds.
    pub step_duration_ms: u64,
}

impl StateMachineConfig {
    /// Time between two polls of the current step.
    pub const fn step_duration(&self) -> Duration {
        Duration::from_millis(self.step_duration_ms)
    }
}

/// Settings of the batch validation microservice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchValidatorConfig {
    /// Whether batches are checked at all. When `false` every batch is accepted.
    pub enabled: bool,

    /// Base URL of the service.
    pub url: String,

    /// Timeout of a single request, in milliseconds.
    pub request_time_ms: u64,
}

impl BatchValidatorConfig {
    /// The client configuration for batches relayed from `source` to `destination`.
    pub fn client_config(&self, source: Chain, destination: Chain) -> ValidatorClientConfig {
        ValidatorClientConfig {
            source_chain: source,
            destination_chain: destination,
            request_url: self.url.clone(),
            request_time: Duration::from_millis(self.request_time_ms),
        }
    }
}

/// Ethereum-side tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthereumConfig {
    /// Quorum checks on a transfer before the relay cycle restarts.
    pub max_retries_on_quorum_reached: u64,

    /// Upper bound of a wait for transfer confirmation, in seconds.
    pub interval_to_wait_for_transfer_secs: u64,
}

/// Elrond-side tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElrondConfig {
    /// Quorum checks on an action before the relay cycle restarts.
    pub max_retries_on_quorum_reached: u64,
}

/// Logging settings, overridden by `RUST_LOG` when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base name of the service in logs and traces.
    pub service_name: String,

    /// Filter directive used when `RUST_LOG` is absent.
    pub default_directive: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            service_name: "bridge-relayer".to_string(),
            default_directive: DEFAULT_LOG_DIRECTIVE.to_string(),
        }
    }
}

impl Config {
    /// Parses a configuration from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&contents)
    }

    /// The settings of the state machine called `name`.
    pub fn state_machine(&self, name: &str) -> Result<StateMachineConfig, ConfigError> {
        self.state_machines
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::MissingStateMachine(name.to_string()))
    }

    /// The tunables handed to both executors.
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig::default()
            .with_max_quorum_retries_on_elrond(self.elrond.max_retries_on_quorum_reached)
            .with_max_quorum_retries_on_ethereum(self.ethereum.max_retries_on_quorum_reached)
            .with_transfer_confirmation_wait(Duration::from_secs(
                self.ethereum.interval_to_wait_for_transfer_secs,
            ))
    }

    /// The logger settings, picking up the OTLP endpoint from the environment.
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig::with_base_name(&self.logging.service_name)
            .with_default_directive(&self.logging.default_directive)
    }
}
