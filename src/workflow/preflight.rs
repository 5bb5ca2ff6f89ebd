// ABOUTME: Checks run before a redeployment changes anything remotely.
// ABOUTME: The live app must exist and the retired name must be free.

use super::error::PreflightError;
use super::plan::RedeployPlan;
use crate::platform::AppOps;

/// Verify that a redeployment of `plan.app` can start.
///
/// A leftover retired instance from an earlier, interrupted run would make
/// the rename fail halfway; catching it here leaves everything untouched.
pub async fn preflight<P>(platform: &P, plan: &RedeployPlan) -> Result<(), PreflightError>
where
    P: AppOps + ?Sized,
{
    if !platform.app_exists(&plan.app).await? {
        return Err(PreflightError::AppMissing(plan.app.clone()));
    }

    if platform.app_exists(&plan.retired).await? {
        return Err(PreflightError::RetiredNameTaken(plan.retired.clone()));
    }

    Ok(())
}
