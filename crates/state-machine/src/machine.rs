//! The engine that drives a [`MachineStates`] graph on a background task.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, trace, Instrument};

use crate::{
    errors::StateMachineResult,
    graph::MachineStates,
    step::{Step, StepIdentifier},
};

/// A running state machine.
///
/// The machine owns a single background task that waits `step_duration` between two steps and
/// executes exactly one step per wake-up. Steps of one machine never run concurrently.
///
/// Dropping the handle has the same effect as [`StateMachine::close`].
#[derive(Debug)]
pub struct StateMachine {
    name: String,
    cancel: CancellationToken,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl StateMachine {
    /// Resolves `start` in `steps` and spawns the execution loop on the current tokio runtime.
    ///
    /// Returns immediately. Fails if `start` has no step in the graph, in which case nothing is
    /// spawned.
    ///
    /// # Panics
    ///
    /// If called outside of a tokio runtime.
    pub fn new<I: StepIdentifier>(
        name: impl Into<String>,
        steps: MachineStates<I>,
        start: I,
        step_duration: Duration,
    ) -> StateMachineResult<Self> {
        let name = name.into();

        // fail before spawning anything
        steps.get(start)?;

        let cancel = CancellationToken::new();
        let running = Arc::new(AtomicBool::new(true));

        let span = info_span!("state_machine", name = %name);
        let handle = tokio::spawn(
            execute_loop(steps, start, step_duration, cancel.clone(), running.clone())
                .instrument(span),
        );

        info!(%name, %start, ?step_duration, "state machine started");

        Ok(Self {
            name,
            cancel,
            running,
            handle: Some(handle),
        })
    }

    /// The name this machine was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the execution loop is still active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Requests the execution loop to stop.
    ///
    /// Does not wait for the loop to observe the request. Calling this more than once is a no-op.
    pub fn close(&self) {
        if !self.cancel.is_cancelled() {
            debug!(name = %self.name, "closing state machine");
        }

        self.cancel.cancel();
    }

    /// Requests the execution loop to stop and waits until it has exited.
    pub async fn shutdown(mut self) {
        self.close();

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!(name = %self.name, ?e, "state machine task did not exit cleanly");
            }
        }
    }
}

impl Drop for StateMachine {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Unsets the running flag however the loop exits.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

async fn execute_loop<I: StepIdentifier>(
    steps: MachineStates<I>,
    start: I,
    step_duration: Duration,
    cancel: CancellationToken,
    running: Arc<AtomicBool>,
) {
    let _guard = RunningGuard(running);

    let mut current: &dyn Step<I> = match steps.get(start) {
        Ok(step) => step,
        Err(e) => {
            error!(%e, "state machine stopped");
            return;
        }
    };

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!("state machine main execute loop is closing");
                return;
            }
            _ = sleep(step_duration) => {}
        }

        trace!(step = %current.identifier(), "executing step");

        let next = tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!(step = %current.identifier(), "state machine closed while executing step");
                return;
            }
            next = current.execute(&cancel) => next,
        };

        current = match steps.get(next) {
            Ok(step) => step,
            Err(e) => {
                error!(
                    from = %current.identifier(),
                    %e,
                    status = "state machine stopped",
                    "state machine error"
                );
                return;
            }
        };
    }
}
