// ABOUTME: Restart recipe: like restage, but the droplet is relocated locally.
// ABOUTME: Downloads the live droplet first and uploads it to the new instance.

use super::error::StepError;
use super::plan::RedeployPlan;
use super::steps;
use crate::pipeline::Pipeline;
use crate::platform::Platform;
use crate::poller::PollObserver;
use crate::scratch::ScratchDir;

/// Build the restart pipeline.
///
/// Same shape as [`restage`](super::restage), with the live droplet
/// downloaded before anything changes and uploaded to the new instance
/// before it is started. Uploading the droplet pins the new instance to
/// exactly the artifact that was running, without restaging it.
pub fn restart<'a, P, O>(
    platform: &'a P,
    plan: &'a RedeployPlan,
    scratch: &'a ScratchDir,
    progress: O,
) -> Pipeline<'a, StepError>
where
    P: Platform,
    O: PollObserver + Send + 'a,
{
    let manifest = scratch.manifest_path();
    let droplet = scratch.droplet_path();

    Pipeline::new(plan.failure_message())
        .then(steps::download_droplet(platform, plan, droplet))
        .then(steps::capture_manifest(platform, plan, manifest))
        .then(steps::rename_to_retired(platform, plan))
        .then(steps::push_new(platform, plan, manifest, scratch.path()))
        .then(steps::copy_bits(platform, plan, progress))
        .then(steps::upload_droplet(platform, plan, droplet))
        .then(steps::start_new(platform, plan))
        .then(steps::clean_up_retired(platform, plan))
}
