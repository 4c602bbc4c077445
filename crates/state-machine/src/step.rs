//! The unit of work driven by the state machine.

use std::{fmt, hash::Hash};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Marker trait for the closed set of identifiers of a step graph.
///
/// This is blanket-implemented for every type with the required bounds, in practice a fieldless
/// `enum` per graph.
pub trait StepIdentifier:
    Copy + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
}

impl<T> StepIdentifier for T where
    T: Copy + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
}

/// One state of a step graph.
///
/// A step evaluates the current state of the world and returns the identifier of the step that
/// should run on the next poll, which may be its own identifier. Repeated executions without any
/// external change must yield the same identifier. Failures are never surfaced to the engine:
/// a step logs them and routes to a recovery identifier instead.
#[async_trait]
pub trait Step<I: StepIdentifier>: fmt::Debug + Send + Sync {
    /// The identifier under which this step is registered.
    fn identifier(&self) -> I;

    /// Every identifier [`Step::execute`] may return.
    ///
    /// Used to check that the graph is closed before any step runs.
    fn transitions(&self) -> Vec<I>;

    /// Runs the step once and returns the identifier of the next step.
    ///
    /// Long waits inside the step must observe `cancel`.
    async fn execute(&self, cancel: &CancellationToken) -> I;
}
