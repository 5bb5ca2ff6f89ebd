// ABOUTME: Compensating-action pipeline executor.
// ABOUTME: Runs steps forward and rolls back completed steps when one fails.

mod action;
mod error;
mod executor;

pub use action::{Action, StepFuture};
pub use error::{PipelineError, StepFailure};
pub use executor::{NoopObserver, Pipeline, PipelineObserver};
