// ABOUTME: Restage recipe: new instance built from the retired one's bits.
// ABOUTME: The artifact moves server-side through the copy-bits job.

use super::error::StepError;
use super::plan::RedeployPlan;
use super::steps;
use crate::pipeline::Pipeline;
use crate::platform::Platform;
use crate::poller::PollObserver;
use crate::scratch::ScratchDir;

/// Build the restage pipeline.
///
/// 1. capture the live manifest
/// 2. rename live to retired
/// 3. push a stopped placeholder under the live name
/// 4. copy the retired bits into it and wait for the job
/// 5. start it
/// 6. apply the cleanup policy to the retired instance
pub fn restage<'a, P, O>(
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

    Pipeline::new(plan.failure_message())
        .then(steps::capture_manifest(platform, plan, manifest))
        .then(steps::rename_to_retired(platform, plan))
        .then(steps::push_new(platform, plan, manifest, scratch.path()))
        .then(steps::copy_bits(platform, plan, progress))
        .then(steps::start_new(platform, plan))
        .then(steps::clean_up_retired(platform, plan))
}
