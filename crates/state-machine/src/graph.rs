//! The closed set of steps that make up one state machine.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    errors::{StateMachineError, StateMachineResult},
    step::{Step, StepIdentifier},
};

/// An immutable mapping from identifiers to steps.
///
/// A [`MachineStates`] can only be built if it is non-empty and closed, i.e. every identifier that
/// any of its steps declares as a possible transition has a step registered for it.
#[derive(Debug)]
pub struct MachineStates<I: StepIdentifier> {
    steps: BTreeMap<I, Box<dyn Step<I>>>,
}

impl<I: StepIdentifier> MachineStates<I> {
    /// Builds a graph from a list of steps, each registered under its own identifier.
    pub fn new(steps: Vec<Box<dyn Step<I>>>) -> StateMachineResult<Self> {
        let mut map = BTreeMap::new();
        for step in steps {
            let identifier = step.identifier();
            if map.insert(identifier, step).is_some() {
                return Err(StateMachineError::DuplicateStep(identifier.to_string()));
            }
        }

        Self::from_map(map)
    }

    /// Builds a graph from an explicit mapping.
    ///
    /// Every step must be registered under the identifier it reports.
    pub fn from_map(steps: BTreeMap<I, Box<dyn Step<I>>>) -> StateMachineResult<Self> {
        if steps.is_empty() {
            return Err(StateMachineError::NoSteps);
        }

        for (identifier, step) in &steps {
            if step.identifier() != *identifier {
                return Err(StateMachineError::InvalidStep(identifier.to_string()));
            }
        }

        for (identifier, step) in &steps {
            if let Some(missing) = step
                .transitions()
                .into_iter()
                .find(|target| !steps.contains_key(target))
            {
                return Err(StateMachineError::DanglingTransition {
                    from: identifier.to_string(),
                    to: missing.to_string(),
                });
            }
        }

        debug!(num_steps = steps.len(), "step graph assembled");

        Ok(Self { steps })
    }

    /// Looks up the step registered for `identifier`.
    pub fn get(&self, identifier: I) -> StateMachineResult<&dyn Step<I>> {
        self.steps
            .get(&identifier)
            .map(|step| step.as_ref())
            .ok_or_else(|| StateMachineError::StepNotFound(identifier.to_string()))
    }

    /// Whether a step is registered for `identifier`.
    pub fn contains(&self, identifier: I) -> bool {
        self.steps.contains_key(&identifier)
    }

    /// All identifiers of the graph in ascending order.
    pub fn identifiers(&self) -> impl Iterator<Item = I> + '_ {
        self.steps.keys().copied()
    }

    /// The number of steps in the graph.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the graph is empty. Always `false` for a successfully built graph.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
