//! A generic, step-based state machine that polls the current step of a closed step graph at a
//! fixed interval and advances along the identifiers returned by the steps.
//!
//! Steps never fail from the point of view of the engine: every outcome, including operational
//! failures, is expressed as the identifier of the next step to run. The only condition that stops
//! a running machine, apart from cancellation, is a step returning an identifier that is not part
//! of its graph.

pub mod errors;
pub mod graph;
pub mod machine;
pub mod step;

pub use errors::StateMachineError;
pub use graph::MachineStates;
pub use machine::StateMachine;
pub use step::{Step, StepIdentifier};
