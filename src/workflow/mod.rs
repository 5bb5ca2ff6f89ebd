// ABOUTME: Redeployment recipes built on the compensating-action pipeline.
// ABOUTME: Exports the restage and restart builders, plan, and cleanup policy.

mod cleanup;
mod error;
mod plan;
mod preflight;
mod restage;
mod restart;
mod steps;

pub use cleanup::CleanupPolicy;
pub use error::{PreflightError, StepError};
pub use plan::{RedeployPlan, Settings};
pub use preflight::preflight;
pub use restage::restage;
pub use restart::restart;
