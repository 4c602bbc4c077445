//! Errors of the relayer crate.

use std::{io, path::PathBuf};

use bridge_relayer_batch_validator::ValidatorError;
use bridge_relayer_common::logging::LoggingError;
use bridge_relayer_state_machine::StateMachineError;
use thiserror::Error;

/// Errors encountered while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("could not read config file {path}: {source}")]
    Io {
        /// The path that was read.
        path: PathBuf,

        /// The underlying error.
        source: io::Error,
    },

    /// The configuration is not valid TOML or does not match the expected layout.
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// No `[state_machines.<name>]` table exists for a direction.
    #[error("missing configuration for state machine {0}")]
    MissingStateMachine(String),
}

/// Errors encountered while starting the relayer.
#[derive(Debug, Error)]
pub enum RelayerError {
    /// The configuration is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The batch validator could not be created.
    #[error("invalid batch validator: {0}")]
    Validator(#[from] ValidatorError),

    /// A state machine could not be built.
    #[error("could not build state machine: {0}")]
    StateMachine(#[from] StateMachineError),

    /// Logging could not be initialized.
    #[error("could not initialize logging: {0}")]
    Logging(#[from] LoggingError),
}
