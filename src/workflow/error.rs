// ABOUTME: Error types for workflow steps and preflight checks.
// ABOUTME: Step errors wrap platform failures and copy-bits job failures.

use snafu::Snafu;
use thiserror::Error;

use crate::platform::PlatformError;
use crate::poller::PollError;
use crate::types::AppName;

/// Failure of one workflow step's forward or compensating operation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StepError {
    #[snafu(display("{source}"), context(false))]
    Platform { source: PlatformError },

    #[snafu(display("copying application bits failed: {source}"))]
    CopyBits { source: PollError },
}

/// Conditions checked before anything is changed remotely.
#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("application '{0}' does not exist")]
    AppMissing(AppName),

    #[error("'{0}' already exists; remove or rename it before redeploying")]
    RetiredNameTaken(AppName),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}
