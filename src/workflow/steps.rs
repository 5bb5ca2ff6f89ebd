// ABOUTME: Building blocks shared by the restage and restart workflows.
// ABOUTME: Each function returns one pipeline action bound to a platform and plan.

use snafu::ResultExt;
use std::path::Path;

use super::error::{CopyBitsSnafu, StepError};
use super::plan::RedeployPlan;
use crate::pipeline::Action;
use crate::platform::Platform;
use crate::poller::{PollObserver, wait_for_job};

/// Put the retired instance back under the live name.
///
/// Safe to run repeatedly: once the retired name is gone there is nothing
/// left to restore. Whatever occupies the live name at that point was
/// created by this run and is deleted first.
pub(crate) async fn restore_retired<P>(platform: &P, plan: &RedeployPlan) -> Result<(), StepError>
where
    P: Platform + ?Sized,
{
    if !platform.app_exists(&plan.retired).await? {
        tracing::debug!(retired = %plan.retired, "retired instance not present, nothing to restore");
        return Ok(());
    }

    if platform.app_exists(&plan.app).await? {
        tracing::info!(app = %plan.app, "deleting new instance");
        platform.delete_application(&plan.app).await?;
    }

    tracing::info!(from = %plan.retired, to = %plan.app, "restoring retired instance");
    platform.rename_application(&plan.retired, &plan.app).await?;
    Ok(())
}

pub(crate) fn download_droplet<'a, P: Platform>(
    platform: &'a P,
    plan: &'a RedeployPlan,
    droplet: &'a Path,
) -> Action<'a, StepError> {
    Action::new(format!("download droplet of {}", plan.app), move || async move {
        let guid = platform.app_guid(&plan.app).await?;
        platform.download_droplet(&guid, droplet).await?;
        Ok::<(), StepError>(())
    })
}

pub(crate) fn capture_manifest<'a, P: Platform>(
    platform: &'a P,
    plan: &'a RedeployPlan,
    manifest: &'a Path,
) -> Action<'a, StepError> {
    Action::new(format!("capture manifest of {}", plan.app), move || async move {
        platform.create_manifest(&plan.app, manifest).await?;
        Ok::<(), StepError>(())
    })
}

pub(crate) fn rename_to_retired<'a, P: Platform>(
    platform: &'a P,
    plan: &'a RedeployPlan,
) -> Action<'a, StepError> {
    Action::new(
        format!("rename {} to {}", plan.app, plan.retired),
        move || async move {
            platform.rename_application(&plan.app, &plan.retired).await?;
            Ok::<(), StepError>(())
        },
    )
    .compensates_prior(move || restore_retired(platform, plan))
}

/// Push a stopped instance carrying placeholder bits and the captured manifest.
pub(crate) fn push_new<'a, P: Platform>(
    platform: &'a P,
    plan: &'a RedeployPlan,
    manifest: &'a Path,
    artifact_dir: &'a Path,
) -> Action<'a, StepError> {
    Action::new(format!("push new {}", plan.app), move || async move {
        platform
            .push_application(&plan.app, manifest, artifact_dir)
            .await?;
        Ok::<(), StepError>(())
    })
    .compensates_prior(move || restore_retired(platform, plan))
}

/// Copy the retired instance's artifact into the new one and wait for the
/// remote job to finish.
pub(crate) fn copy_bits<'a, P, O>(
    platform: &'a P,
    plan: &'a RedeployPlan,
    mut progress: O,
) -> Action<'a, StepError>
where
    P: Platform,
    O: PollObserver + Send + 'a,
{
    Action::new(
        format!("copy bits from {} to {}", plan.retired, plan.app),
        move || async move {
            let source = platform.app_guid(&plan.retired).await?;
            let destination = platform.app_guid(&plan.app).await?;
            let job = platform.copy_bits(&source, &destination).await?;
            tracing::info!(job = %job.id, %source, %destination, "copy-bits job started");

            wait_for_job(platform, job, plan.poll_interval, &mut progress)
                .await
                .context(CopyBitsSnafu)?;
            Ok::<(), StepError>(())
        },
    )
    .compensates_prior(move || restore_retired(platform, plan))
}

pub(crate) fn upload_droplet<'a, P: Platform>(
    platform: &'a P,
    plan: &'a RedeployPlan,
    droplet: &'a Path,
) -> Action<'a, StepError> {
    Action::new(format!("upload droplet to {}", plan.app), move || async move {
        platform.upload_droplet(&plan.app, droplet).await?;
        Ok::<(), StepError>(())
    })
    .compensates_prior(move || restore_retired(platform, plan))
}

/// Start the new instance.
///
/// If the cleanup after it fails, the new instance is deleted and the
/// retired one takes the live name back.
pub(crate) fn start_new<'a, P: Platform>(
    platform: &'a P,
    plan: &'a RedeployPlan,
) -> Action<'a, StepError> {
    Action::new(format!("start {}", plan.app), move || async move {
        platform.start_application(&plan.app).await?;
        Ok::<(), StepError>(())
    })
    .compensates_prior(move || restore_retired(platform, plan))
}

pub(crate) fn clean_up_retired<'a, P: Platform>(
    platform: &'a P,
    plan: &'a RedeployPlan,
) -> Action<'a, StepError> {
    Action::new(plan.cleanup.describe(&plan.retired), move || async move {
        plan.cleanup.apply(platform, &plan.retired).await?;
        Ok::<(), StepError>(())
    })
}
