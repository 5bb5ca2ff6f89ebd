// ABOUTME: Composable capability traits for the application platform.
// ABOUTME: Defines AppOps, JobOps, ArtifactOps and the Platform umbrella trait.

use async_trait::async_trait;
use std::path::Path;

use super::error::PlatformError;
use super::job::Job;
use crate::types::{AppGuid, AppName, JobGuid};

/// Application lifecycle operations.
#[async_trait]
pub trait AppOps: Send + Sync {
    /// Write the deployment manifest of `app` to `path`.
    async fn create_manifest(&self, app: &AppName, path: &Path) -> Result<(), PlatformError>;

    /// Rename an application. Fails if `from` is missing or `to` is taken.
    async fn rename_application(&self, from: &AppName, to: &AppName)
    -> Result<(), PlatformError>;

    /// Push a new, not yet started, instance of `app`.
    async fn push_application(
        &self,
        app: &AppName,
        manifest: &Path,
        artifact_dir: &Path,
    ) -> Result<(), PlatformError>;

    /// Resolve the GUID of an application.
    async fn app_guid(&self, app: &AppName) -> Result<AppGuid, PlatformError>;

    /// Whether an application with this name exists in the targeted space.
    async fn app_exists(&self, app: &AppName) -> Result<bool, PlatformError>;

    async fn start_application(&self, app: &AppName) -> Result<(), PlatformError>;

    async fn stop_application(&self, app: &AppName) -> Result<(), PlatformError>;

    async fn delete_application(&self, app: &AppName) -> Result<(), PlatformError>;

    /// Show the applications of the targeted space to the operator.
    async fn list_applications(&self) -> Result<(), PlatformError>;
}

/// Remote asynchronous jobs.
#[async_trait]
pub trait JobOps: Send + Sync {
    /// Start copying the artifact of `source` into `destination`.
    async fn copy_bits(
        &self,
        source: &AppGuid,
        destination: &AppGuid,
    ) -> Result<Job, PlatformError>;

    /// Fetch the current snapshot of a job.
    async fn fetch_job(&self, id: &JobGuid) -> Result<Job, PlatformError>;
}

/// Moving packaged artifacts (droplets) through local storage.
#[async_trait]
pub trait ArtifactOps: Send + Sync {
    async fn download_droplet(&self, app: &AppGuid, path: &Path) -> Result<(), PlatformError>;

    async fn upload_droplet(&self, app: &AppName, path: &Path) -> Result<(), PlatformError>;
}

/// Everything the redeployment workflows need from a platform.
///
/// Automatically implemented for any type with all three capabilities.
pub trait Platform: AppOps + JobOps + ArtifactOps {}

impl<T: AppOps + JobOps + ArtifactOps> Platform for T {}
