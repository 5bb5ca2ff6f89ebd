// ABOUTME: Control-plane capabilities used by the redeployment workflows.
// ABOUTME: Exports the capability traits, the job model, and the cf CLI adapter.

mod cf;
mod error;
mod job;
mod traits;

pub use cf::{CfCli, DEFAULT_CF_BINARY};
pub use error::PlatformError;
pub use job::{Job, JobErrorDetails, JobStatus};
pub use traits::{AppOps, ArtifactOps, JobOps, Platform};
