//! Tunables of the executors.

use std::time::Duration;

/// Default number of quorum checks before a relay cycle is restarted.
pub const DEFAULT_MAX_QUORUM_RETRIES: u64 = 10;

/// Default time spent waiting for an executed transfer to show up on Ethereum.
pub const DEFAULT_TRANSFER_CONFIRMATION_WAIT: Duration = Duration::from_secs(30);

/// Configuration shared by both executors.
///
/// Construct it with [`Default::default`] and adjust it with the `with_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Quorum checks allowed on Elrond actions before giving up on the cycle.
    pub(crate) max_quorum_retries_on_elrond: u64,

    /// Quorum checks allowed on Ethereum transfers before giving up on the cycle.
    pub(crate) max_quorum_retries_on_ethereum: u64,

    /// Upper bound of a single wait for transfer confirmation.
    pub(crate) transfer_confirmation_wait: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_quorum_retries_on_elrond: DEFAULT_MAX_QUORUM_RETRIES,
            max_quorum_retries_on_ethereum: DEFAULT_MAX_QUORUM_RETRIES,
            transfer_confirmation_wait: DEFAULT_TRANSFER_CONFIRMATION_WAIT,
        }
    }
}

impl ExecutorConfig {
    /// Sets the number of quorum checks allowed on Elrond actions.
    pub const fn with_max_quorum_retries_on_elrond(mut self, retries: u64) -> Self {
        self.max_quorum_retries_on_elrond = retries;
        self
    }

    /// Sets the number of quorum checks allowed on Ethereum transfers.
    pub const fn with_max_quorum_retries_on_ethereum(mut self, retries: u64) -> Self {
        self.max_quorum_retries_on_ethereum = retries;
        self
    }

    /// Sets the upper bound of a single wait for transfer confirmation.
    pub const fn with_transfer_confirmation_wait(mut self, wait: Duration) -> Self {
        self.transfer_confirmation_wait = wait;
        self
    }

    /// The upper bound of a single wait for transfer confirmation.
    pub const fn transfer_confirmation_wait(&self) -> Duration {
        self.transfer_confirmation_wait
    }
}
