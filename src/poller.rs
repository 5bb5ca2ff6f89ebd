// ABOUTME: Waits for a remote asynchronous job to reach a terminal status.
// ABOUTME: Polls on a fixed interval and reports each cycle to an observer.

use snafu::{ResultExt, Snafu};
use std::time::Duration;

use crate::platform::{Job, JobErrorDetails, JobOps, JobStatus, PlatformError};
use crate::types::JobGuid;

/// Delay between two status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PollError {
    /// The status request itself failed; the job may still be running.
    #[snafu(display("failed to fetch status of job {job_id}: {source}"))]
    Fetch {
        job_id: JobGuid,
        source: PlatformError,
    },

    /// The platform reported the job as failed.
    #[snafu(display("job {job_id} failed: {details}"))]
    JobFailed {
        job_id: JobGuid,
        details: JobErrorDetails,
    },
}

impl PollError {
    pub fn job_id(&self) -> &JobGuid {
        match self {
            PollError::Fetch { job_id, .. } | PollError::JobFailed { job_id, .. } => job_id,
        }
    }

    /// Remote error details, when the job itself failed.
    pub fn details(&self) -> Option<&JobErrorDetails> {
        match self {
            PollError::JobFailed { details, .. } => Some(details),
            PollError::Fetch { .. } => None,
        }
    }
}

/// Notified once per poll cycle and once on termination.
pub trait PollObserver {
    /// Called before every status fetch.
    fn tick(&mut self) {}

    /// Called once the wait ends, successfully or not.
    fn finished(&mut self, _succeeded: bool) {}
}

/// Observer for callers that do not render progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl PollObserver for Silent {}

impl<O: PollObserver + ?Sized> PollObserver for Box<O> {
    fn tick(&mut self) {
        (**self).tick();
    }

    fn finished(&mut self, succeeded: bool) {
        (**self).finished(succeeded);
    }
}

/// Block until `job` is `finished` or `failed`.
///
/// Every cycle ticks the observer, fetches a fresh snapshot and, if the job
/// is still pending, sleeps for `interval`. There is no attempt limit: a job
/// that never terminates keeps this waiting until the process is stopped.
/// A failed fetch ends the wait immediately.
pub async fn wait_for_job<J, O>(
    jobs: &J,
    job: Job,
    interval: Duration,
    observer: &mut O,
) -> Result<Job, PollError>
where
    J: JobOps + ?Sized,
    O: PollObserver + ?Sized,
{
    let id = job.id;
    let mut attempt: u64 = 0;

    loop {
        attempt += 1;
        observer.tick();

        let job = jobs
            .fetch_job(&id)
            .await
            .inspect_err(|_| observer.finished(false))
            .context(FetchSnafu { job_id: id.clone() })?;

        tracing::debug!(job = %id, attempt, status = %job.status, "polled job");

        match job.status {
            JobStatus::Finished => {
                observer.finished(true);
                return Ok(job);
            }
            JobStatus::Failed => {
                observer.finished(false);
                let details = job.failure_details();
                tracing::warn!(job = %id, %details, "job failed");
                return JobFailedSnafu { job_id: id, details }.fail();
            }
            JobStatus::Queued | JobStatus::Running | JobStatus::Other(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}
