// ABOUTME: Test support utilities.
// ABOUTME: Provides an in-memory platform with failure injection and a call log.

use async_trait::async_trait;
use bg_restage::platform::{
    AppOps, ArtifactOps, Job, JobErrorDetails, JobOps, JobStatus, PlatformError,
};
use bg_restage::types::{AppGuid, AppName, JobGuid};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::Path;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("bg_restage=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeApp {
    pub guid: String,
    pub started: bool,
    /// Identifies the artifact the app runs; `None` for placeholder bits.
    pub bits: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum FailRule {
    Always,
    Nth(usize),
}

#[derive(Default)]
struct State {
    apps: BTreeMap<String, FakeApp>,
    calls: Vec<String>,
    failures: HashMap<&'static str, FailRule>,
    counts: HashMap<&'static str, usize>,
    job_script: VecDeque<JobStatus>,
    job_error: Option<JobErrorDetails>,
    pending_copy: Option<(String, String)>,
    next_guid: usize,
}

impl State {
    fn new_guid(&mut self, prefix: &str) -> String {
        self.next_guid += 1;
        format!("{prefix}-{}", self.next_guid)
    }

    /// Record the call and decide whether it should fail.
    fn enter(&mut self, op: &'static str, call: String) -> Result<(), PlatformError> {
        self.calls.push(call.clone());
        let count = self.counts.entry(op).or_insert(0);
        *count += 1;
        let fail = match self.failures.get(op) {
            Some(FailRule::Always) => true,
            Some(FailRule::Nth(n)) => *n == *count,
            None => false,
        };
        if fail {
            Err(PlatformError::CommandFailed {
                command: format!("cf {call}"),
                code: Some(1),
                output: format!("injected failure in {op}"),
            })
        } else {
            Ok(())
        }
    }

    fn app_mut(&mut self, name: &str) -> Result<&mut FakeApp, PlatformError> {
        self.apps
            .get_mut(name)
            .ok_or_else(|| PlatformError::AppNotFound(name.to_string()))
    }

    fn name_of(&self, guid: &str) -> Option<String> {
        self.apps
            .iter()
            .find(|(_, app)| app.guid == guid)
            .map(|(name, _)| name.clone())
    }
}

/// In-memory stand-in for a Cloud Foundry space.
#[derive(Default)]
pub struct FakePlatform {
    state: Mutex<State>,
}

#[allow(dead_code)]
impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// A space holding one running app with the given artifact.
    pub fn with_running_app(name: &str, bits: &str) -> Self {
        let platform = Self::new();
        platform.add_app(name, true, Some(bits));
        platform
    }

    pub fn add_app(&self, name: &str, started: bool, bits: Option<&str>) {
        let mut state = self.state.lock();
        let guid = state.new_guid("app");
        state.apps.insert(
            name.to_string(),
            FakeApp {
                guid,
                started,
                bits: bits.map(str::to_string),
            },
        );
    }

    /// Fail every call of `op`.
    pub fn fail(&self, op: &'static str) {
        self.state.lock().failures.insert(op, FailRule::Always);
    }

    /// Fail only the `n`th call (1-based) of `op`.
    pub fn fail_nth(&self, op: &'static str, n: usize) {
        self.state.lock().failures.insert(op, FailRule::Nth(n));
    }

    /// Statuses returned by successive job fetches. Once exhausted, jobs
    /// report `finished`.
    pub fn script_job(&self, statuses: impl IntoIterator<Item = JobStatus>) {
        self.state.lock().job_script.extend(statuses);
    }

    pub fn job_error(&self, details: JobErrorDetails) {
        self.state.lock().job_error = Some(details);
    }

    pub fn app(&self, name: &str) -> Option<FakeApp> {
        self.state.lock().apps.get(name).cloned()
    }

    pub fn app_names(&self) -> Vec<String> {
        self.state.lock().apps.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Calls that change remote state, in order.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| {
                !c.starts_with("app ") && !c.starts_with("exists ") && !c.starts_with("job ")
            })
            .collect()
    }

    pub fn count(&self, op: &'static str) -> usize {
        self.state.lock().counts.get(op).copied().unwrap_or(0)
    }
}

#[async_trait]
impl AppOps for FakePlatform {
    async fn create_manifest(&self, app: &AppName, path: &Path) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.enter("create_manifest", format!("create-app-manifest {app}"))?;
        state.app_mut(app.as_str())?;
        std::fs::write(path, format!("applications:\n- name: {app}\n")).map_err(|source| {
            PlatformError::Spawn {
                command: "create-app-manifest".to_string(),
                source,
            }
        })
    }

    async fn rename_application(
        &self,
        from: &AppName,
        to: &AppName,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.enter("rename", format!("rename {from} {to}"))?;
        if state.apps.contains_key(to.as_str()) {
            return Err(PlatformError::CommandFailed {
                command: format!("cf rename {from} {to}"),
                code: Some(1),
                output: format!("App with the name {to} already exists"),
            });
        }
        let app = state
            .apps
            .remove(from.as_str())
            .ok_or_else(|| PlatformError::AppNotFound(from.to_string()))?;
        state.apps.insert(to.to_string(), app);
        Ok(())
    }

    async fn push_application(
        &self,
        app: &AppName,
        manifest: &Path,
        artifact_dir: &Path,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.enter("push", format!("push {app}"))?;
        assert!(manifest.exists(), "push needs the captured manifest");
        assert!(artifact_dir.is_dir(), "push needs the placeholder directory");
        if !state.apps.contains_key(app.as_str()) {
            let guid = state.new_guid("app");
            state.apps.insert(
                app.to_string(),
                FakeApp {
                    guid,
                    started: false,
                    bits: None,
                },
            );
        }
        Ok(())
    }

    async fn app_guid(&self, app: &AppName) -> Result<AppGuid, PlatformError> {
        let mut state = self.state.lock();
        state.enter("app_guid", format!("app {app} --guid"))?;
        state.app_mut(app.as_str()).map(|a| AppGuid::new(a.guid.clone()))
    }

    async fn app_exists(&self, app: &AppName) -> Result<bool, PlatformError> {
        let mut state = self.state.lock();
        state.enter("app_exists", format!("exists {app}"))?;
        Ok(state.apps.contains_key(app.as_str()))
    }

    async fn start_application(&self, app: &AppName) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.enter("start", format!("start {app}"))?;
        state.app_mut(app.as_str())?.started = true;
        Ok(())
    }

    async fn stop_application(&self, app: &AppName) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.enter("stop", format!("stop {app}"))?;
        state.app_mut(app.as_str())?.started = false;
        Ok(())
    }

    async fn delete_application(&self, app: &AppName) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.enter("delete", format!("delete {app}"))?;
        state
            .apps
            .remove(app.as_str())
            .map(|_| ())
            .ok_or_else(|| PlatformError::AppNotFound(app.to_string()))
    }

    async fn list_applications(&self) -> Result<(), PlatformError> {
        self.state.lock().enter("list", "apps".to_string())
    }
}

#[async_trait]
impl JobOps for FakePlatform {
    async fn copy_bits(
        &self,
        source: &AppGuid,
        destination: &AppGuid,
    ) -> Result<Job, PlatformError> {
        let mut state = self.state.lock();
        state.enter("copy_bits", format!("copy-bits {source} {destination}"))?;
        state.pending_copy = Some((source.to_string(), destination.to_string()));
        let id = state.new_guid("job");
        Ok(Job::new(JobGuid::new(id), JobStatus::Queued))
    }

    async fn fetch_job(&self, id: &JobGuid) -> Result<Job, PlatformError> {
        let mut state = self.state.lock();
        state.enter("fetch_job", format!("job {id}"))?;
        let status = state.job_script.pop_front().unwrap_or(JobStatus::Finished);
        let mut job = Job::new(id.clone(), status.clone());

        match status {
            JobStatus::Finished => {
                if let Some((source, destination)) = state.pending_copy.take() {
                    let bits = state
                        .name_of(&source)
                        .and_then(|name| state.apps.get(&name))
                        .and_then(|app| app.bits.clone());
                    if let Some(name) = state.name_of(&destination) {
                        state.app_mut(&name)?.bits = bits;
                    }
                }
            }
            JobStatus::Failed => {
                if let Some(details) = state.job_error.clone() {
                    job = job.with_error(details);
                }
            }
            _ => {}
        }
        Ok(job)
    }
}

#[async_trait]
impl ArtifactOps for FakePlatform {
    async fn download_droplet(&self, app: &AppGuid, path: &Path) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.enter("download_droplet", format!("download-droplet {app}"))?;
        let name = state
            .name_of(app.as_str())
            .ok_or_else(|| PlatformError::AppNotFound(app.to_string()))?;
        let bits = state.app_mut(&name)?.bits.clone().unwrap_or_default();
        std::fs::write(path, bits).map_err(|source| PlatformError::Spawn {
            command: "download-droplet".to_string(),
            source,
        })
    }

    async fn upload_droplet(&self, app: &AppName, path: &Path) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.enter("upload_droplet", format!("upload-droplet {app}"))?;
        let bits = std::fs::read_to_string(path).map_err(|source| PlatformError::Spawn {
            command: "upload-droplet".to_string(),
            source,
        })?;
        state.app_mut(app.as_str())?.bits = Some(bits);
        Ok(())
    }
}
