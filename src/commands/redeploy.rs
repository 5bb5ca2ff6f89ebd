// ABOUTME: Restage and restart command implementation.
// ABOUTME: Resolves the plan, runs preflight, drives the pipeline, and reports the outcome.

use crate::cli::RedeployOpts;
use bg_restage::config::Config;
use bg_restage::diagnostics::{Diagnostics, Warning};
use bg_restage::error::Result;
use bg_restage::output::{Output, OutputMode};
use bg_restage::platform::{AppOps, CfCli};
use bg_restage::scratch::ScratchDir;
use bg_restage::workflow::{self, CleanupPolicy, RedeployPlan};

/// Which redeployment recipe to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipe {
    Restage,
    Restart,
}

impl Recipe {
    fn verb(self) -> &'static str {
        match self {
            Recipe::Restage => "restaged",
            Recipe::Restart => "restarted",
        }
    }
}

pub async fn redeploy(
    recipe: Recipe,
    config: Config,
    opts: RedeployOpts,
    mut output: Output,
) -> Result<()> {
    let config = config.with_suffix(opts.suffix.as_deref())?;
    let cleanup = CleanupPolicy::from_flags(opts.stop_only, opts.no_delete);
    let plan = RedeployPlan::new(opts.app, &config.settings(), cleanup)?;

    // cf's own progress is only useful on an interactive terminal.
    let cf = CfCli::new(config.cf_binary.clone()).echo(output.mode() == OutputMode::Normal);
    let mut diag = Diagnostics::default();

    output.start_timer();
    output.progress(&format!(
        "Redeploying {} (old instance parked as {}, then: {})",
        plan.app,
        plan.retired,
        plan.cleanup.describe(&plan.retired)
    ));

    workflow::preflight(&cf, &plan).await?;

    let scratch = ScratchDir::create()?;
    let ticker = output.ticker(format!("Copying bits into {}", plan.app));
    let pipeline = match recipe {
        Recipe::Restage => workflow::restage(&cf, &plan, &scratch, ticker),
        Recipe::Restart => workflow::restart(&cf, &plan, &scratch, ticker),
    };
    tracing::debug!(steps = ?pipeline.step_names(), "built pipeline");

    let outcome = pipeline.execute_observed(&mut output).await;

    if let Err(e) = scratch.close() {
        diag.warn(Warning::scratch_cleanup(e.to_string()));
    }

    if outcome.is_ok() {
        output.success(&format!(
            "Your application has been {} with no downtime!",
            recipe.verb()
        ));
        if let Err(e) = cf.list_applications().await {
            diag.warn(Warning::app_listing(e.to_string()));
        }
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    outcome?;
    Ok(())
}
