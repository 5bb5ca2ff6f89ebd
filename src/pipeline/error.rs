// ABOUTME: Composite error returned when a pipeline fails.
// ABOUTME: Carries the triggering step failure and every failed compensation.

use std::fmt;

/// A failed operation, tagged with the position and name of its action.
#[derive(Debug)]
pub struct StepFailure<E> {
    pub index: usize,
    pub name: String,
    pub error: E,
}

/// A pipeline run that stopped at a failing step and was unwound.
///
/// Rollback is best effort: every compensation is attempted, and all of
/// their failures are kept here in the order they happened.
#[derive(Debug)]
pub struct PipelineError<E> {
    failure_message: String,
    failed: StepFailure<E>,
    unwind_failures: Vec<StepFailure<E>>,
}

impl<E> PipelineError<E> {
    pub(crate) fn new(
        failure_message: String,
        failed: StepFailure<E>,
        unwind_failures: Vec<StepFailure<E>>,
    ) -> Self {
        Self {
            failure_message,
            failed,
            unwind_failures,
        }
    }

    pub fn failure_message(&self) -> &str {
        &self.failure_message
    }

    /// The step whose forward operation failed.
    pub fn failed_step(&self) -> &StepFailure<E> {
        &self.failed
    }

    /// The error that triggered the rollback.
    pub fn error(&self) -> &E {
        &self.failed.error
    }

    pub fn unwind_failures(&self) -> &[StepFailure<E>] {
        &self.unwind_failures
    }

    pub fn first_unwind_failure(&self) -> Option<&StepFailure<E>> {
        self.unwind_failures.first()
    }

    /// True when rollback itself failed and the operator has to check the
    /// remote state by hand.
    pub fn requires_manual_intervention(&self) -> bool {
        !self.unwind_failures.is_empty()
    }

    pub fn into_error(self) -> E {
        self.failed.error
    }
}

impl<E: fmt::Display> fmt::Display for PipelineError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: step '{}' failed: {}",
            self.failure_message, self.failed.name, self.failed.error
        )?;

        if let Some(first) = self.unwind_failures.first() {
            write!(
                f,
                "; rollback incomplete, compensation in '{}' failed: {}",
                first.name, first.error
            )?;
            let more = self.unwind_failures.len() - 1;
            if more > 0 {
                write!(f, " (and {more} more rollback failure(s))")?;
            }
        }
        Ok(())
    }
}

impl<E> std::error::Error for PipelineError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.failed.error)
    }
}
