//! Errors raised while assembling a step graph or starting a state machine.

use thiserror::Error;

/// Errors that prevent a [`StateMachine`](crate::StateMachine) from being created.
///
/// Identifiers are carried in their display form so that the error stays independent of the
/// identifier type of a particular graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateMachineError {
    /// The step graph does not contain a single step.
    #[error("nil or empty steps map")]
    NoSteps,

    /// The step registered under an identifier reports a different identifier.
    #[error("invalid step for identifier {0}")]
    InvalidStep(String),

    /// More than one step was provided for the same identifier.
    #[error("duplicate step for identifier {0}")]
    DuplicateStep(String),

    /// A step may transition to an identifier that has no step in the graph.
    #[error("step {from} may transition to {to} which is not part of the graph")]
    DanglingTransition {
        /// The step declaring the transition.
        from: String,

        /// The missing target.
        to: String,
    },

    /// The requested identifier has no step in the graph.
    #[error("step not found for identifier '{0}'")]
    StepNotFound(String),
}

/// Result alias for state machine construction.
pub type StateMachineResult<T> = Result<T, StateMachineError>;
