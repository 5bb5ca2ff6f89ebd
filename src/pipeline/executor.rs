// ABOUTME: Runs pipeline actions in order and unwinds completed ones on failure.
// ABOUTME: Compensations run newest-first, best effort, never stopping early.

use std::borrow::Cow;
use std::fmt;

use super::action::{Action, Operation};
use super::error::{PipelineError, StepFailure};

/// Receives progress notifications while a pipeline runs.
///
/// All methods default to no-ops.
pub trait PipelineObserver {
    fn step_started(&mut self, _index: usize, _name: &str) {}

    fn step_failed(&mut self, _index: usize, _name: &str, _error: &dyn fmt::Display) {}

    fn compensation_started(&mut self, _index: usize, _name: &str) {}

    fn compensation_failed(&mut self, _index: usize, _name: &str, _error: &dyn fmt::Display) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// An ordered list of actions executed exactly once.
pub struct Pipeline<'a, E> {
    actions: Vec<Action<'a, E>>,
    failure_message: String,
}

/// An action that finished its forward operation, kept for unwinding.
struct Completed<'a, E> {
    index: usize,
    name: Cow<'static, str>,
    compensation: Option<Operation<'a, E>>,
}

impl<'a, E> Pipeline<'a, E>
where
    E: std::error::Error + 'a,
{
    /// An empty pipeline. `failure_message` prefixes the error on failure.
    pub fn new(failure_message: impl Into<String>) -> Self {
        Self {
            actions: Vec::new(),
            failure_message: failure_message.into(),
        }
    }

    pub fn with_actions(actions: Vec<Action<'a, E>>, failure_message: impl Into<String>) -> Self {
        Self {
            actions,
            failure_message: failure_message.into(),
        }
    }

    pub fn push(&mut self, action: Action<'a, E>) {
        self.actions.push(action);
    }

    pub fn then(mut self, action: Action<'a, E>) -> Self {
        self.push(action);
        self
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.actions.iter().map(Action::name).collect()
    }

    pub fn failure_message(&self) -> &str {
        &self.failure_message
    }

    pub async fn execute(self) -> Result<(), PipelineError<E>> {
        self.execute_observed(&mut NoopObserver).await
    }

    /// Run every action in order.
    ///
    /// When the action at index `i` fails, the compensations attached to
    /// actions `i - 1` down to `0` are invoked in that order. The failing
    /// action's own compensation is not run. A failing compensation is
    /// recorded and the walk continues.
    pub async fn execute_observed(
        self,
        observer: &mut dyn PipelineObserver,
    ) -> Result<(), PipelineError<E>> {
        let Pipeline {
            actions,
            failure_message,
        } = self;
        let mut completed: Vec<Completed<'a, E>> = Vec::with_capacity(actions.len());

        for (index, action) in actions.into_iter().enumerate() {
            let Action {
                name,
                forward,
                compensation,
            } = action;

            tracing::info!(step = %name, index, "running step");
            observer.step_started(index, &name);

            match forward().await {
                Ok(()) => {
                    tracing::debug!(step = %name, index, "step completed");
                    completed.push(Completed {
                        index,
                        name,
                        compensation,
                    });
                }
                Err(error) => {
                    tracing::error!(step = %name, index, %error, "step failed, rolling back");
                    observer.step_failed(index, &name, &error);

                    let unwind_failures = unwind(completed, observer).await;
                    let failed = StepFailure {
                        index,
                        name: name.into_owned(),
                        error,
                    };
                    return Err(PipelineError::new(failure_message, failed, unwind_failures));
                }
            }
        }

        Ok(())
    }
}

async fn unwind<'a, E>(
    completed: Vec<Completed<'a, E>>,
    observer: &mut dyn PipelineObserver,
) -> Vec<StepFailure<E>>
where
    E: std::error::Error + 'a,
{
    let mut failures = Vec::new();

    for Completed {
        index,
        name,
        compensation,
    } in completed.into_iter().rev()
    {
        let Some(compensate) = compensation else {
            continue;
        };

        tracing::info!(step = %name, index, "running compensation");
        observer.compensation_started(index, &name);

        if let Err(error) = compensate().await {
            tracing::warn!(step = %name, index, %error, "compensation failed, continuing rollback");
            observer.compensation_failed(index, &name, &error);
            failures.push(StepFailure {
                index,
                name: name.into_owned(),
                error,
            });
        }
    }

    failures
}

impl<E> fmt::Debug for Pipeline<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("actions", &self.actions)
            .field("failure_message", &self.failure_message)
            .finish()
    }
}
