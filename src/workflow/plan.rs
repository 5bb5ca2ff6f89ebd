// ABOUTME: Inputs of one redeployment, resolved before any step runs.
// ABOUTME: Settings carry the naming rule and poll interval explicitly.

use std::time::Duration;

use super::cleanup::CleanupPolicy;
use crate::poller::DEFAULT_POLL_INTERVAL;
use crate::types::{AppName, Naming, NamingError};

/// Tunables shared by both workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub naming: Naming,
    pub poll_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            naming: Naming::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Everything a workflow builder needs to know about one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeployPlan {
    /// Name the application is served under, before and after.
    pub app: AppName,
    /// Name the pre-existing instance is parked under during the run.
    pub retired: AppName,
    pub cleanup: CleanupPolicy,
    pub poll_interval: Duration,
}

impl RedeployPlan {
    pub fn new(
        app: AppName,
        settings: &Settings,
        cleanup: CleanupPolicy,
    ) -> Result<Self, NamingError> {
        let retired = settings.naming.retired_name(&app)?;
        Ok(Self {
            app,
            retired,
            cleanup,
            poll_interval: settings.poll_interval,
        })
    }

    /// Preface of the error reported when the pipeline fails.
    pub fn failure_message(&self) -> String {
        format!("redeployment of {} failed", self.app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_derives_retired_name_from_settings() {
        let settings = Settings {
            naming: Naming::new("-blue").unwrap(),
            poll_interval: Duration::from_secs(1),
        };
        let plan = RedeployPlan::new(
            AppName::new("api").unwrap(),
            &settings,
            CleanupPolicy::Stop,
        )
        .unwrap();
        assert_eq!(plan.retired.as_str(), "api-blue");
        assert_eq!(plan.poll_interval, Duration::from_secs(1));
        assert_eq!(plan.cleanup, CleanupPolicy::Stop);
    }

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.naming.suffix(), "-venerable");
        assert_eq!(settings.poll_interval, Duration::from_millis(500));
    }
}
