// ABOUTME: Disposition of the retired instance once the new one is live.
// ABOUTME: Resolved once from the --stop-only and --no-delete flags.

use std::fmt;

use crate::platform::{AppOps, PlatformError};
use crate::types::AppName;

/// What happens to the retired instance at the end of a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanupPolicy {
    /// Leave it running.
    Skip,
    /// Stop it but keep it around for inspection or a manual rollback.
    Stop,
    /// Delete it.
    #[default]
    Delete,
}

impl CleanupPolicy {
    /// Resolve the policy from the invocation flags.
    ///
    /// `stop_only` wins over `no_delete`: stopping already implies keeping
    /// the instance. Without either flag the retired instance is deleted.
    pub fn from_flags(stop_only: bool, no_delete: bool) -> Self {
        match (stop_only, no_delete) {
            (true, _) => CleanupPolicy::Stop,
            (false, true) => CleanupPolicy::Skip,
            (false, false) => CleanupPolicy::Delete,
        }
    }

    /// Human-readable description of the cleanup for `retired`.
    pub fn describe(self, retired: &AppName) -> String {
        match self {
            CleanupPolicy::Skip => format!("keep {retired} running"),
            CleanupPolicy::Stop => format!("stop {retired}"),
            CleanupPolicy::Delete => format!("delete {retired}"),
        }
    }

    pub async fn apply<P>(self, platform: &P, retired: &AppName) -> Result<(), PlatformError>
    where
        P: AppOps + ?Sized,
    {
        match self {
            CleanupPolicy::Skip => {
                tracing::info!(%retired, "leaving retired instance running");
                Ok(())
            }
            CleanupPolicy::Stop => platform.stop_application(retired).await,
            CleanupPolicy::Delete => platform.delete_application(retired).await,
        }
    }
}

impl fmt::Display for CleanupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CleanupPolicy::Skip => "skip",
            CleanupPolicy::Stop => "stop",
            CleanupPolicy::Delete => "delete",
        };
        f.write_str(name)
    }
}
