// ABOUTME: Platform adapter that drives the `cf` command line client.
// ABOUTME: Maps each capability onto a cf subcommand or a `cf curl` API call.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::error::PlatformError;
use super::job::Job;
use super::traits::{AppOps, ArtifactOps, JobOps};
use crate::types::{AppGuid, AppName, JobGuid};

/// Default name of the cf executable, resolved through `PATH`.
pub const DEFAULT_CF_BINARY: &str = "cf";

/// Captured result of one cf invocation.
#[derive(Debug)]
struct CommandOutput {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl CommandOutput {
    fn success(&self) -> bool {
        self.code == Some(0)
    }

    fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Drives the control plane through an installed, logged-in cf CLI.
#[derive(Debug, Clone)]
pub struct CfCli {
    binary: PathBuf,
    echo: bool,
}

impl CfCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            echo: true,
        }
    }

    /// Whether operator-facing commands stream their output to the terminal.
    /// When disabled, all output is captured and only logged.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    fn display(&self, args: &[String]) -> String {
        let mut line = self.binary.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Run a command the operator should see.
    async fn run(&self, args: Vec<String>) -> Result<(), PlatformError> {
        if !self.echo {
            return self.capture(args).await.map(|_| ());
        }

        let command = self.display(&args);
        tracing::debug!(%command, "running cf");

        let status = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| PlatformError::Spawn {
                command: command.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(PlatformError::CommandFailed {
                command,
                code: status.code(),
                output: String::new(),
            })
        }
    }

    /// Run a command silently and return its output, failing on non-zero exit.
    async fn capture(&self, args: Vec<String>) -> Result<String, PlatformError> {
        let command = self.display(&args);
        let output = self.exec(&command, &args).await?;
        if !output.success() {
            return Err(PlatformError::CommandFailed {
                command,
                code: output.code,
                output: output.combined(),
            });
        }
        Ok(output.stdout)
    }

    async fn exec(&self, command: &str, args: &[String]) -> Result<CommandOutput, PlatformError> {
        tracing::debug!(%command, "running cf (captured)");

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| PlatformError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let output = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::trace!(%command, code = ?output.code, stdout = %output.stdout, "cf finished");
        Ok(output)
    }

    /// Call the API through `cf curl` and parse the JSON response body.
    async fn curl(&self, args: Vec<String>) -> Result<serde_json::Value, PlatformError> {
        let command = self.display(&args);
        let body = self.capture(args).await?;
        parse_api_response(&command, &body)
    }
}

impl Default for CfCli {
    fn default() -> Self {
        Self::new(DEFAULT_CF_BINARY)
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

fn push_args(app: &AppName, manifest: &Path, artifact_dir: &Path) -> Vec<String> {
    vec![
        "push".to_string(),
        app.to_string(),
        "-f".to_string(),
        path_arg(manifest),
        "-p".to_string(),
        path_arg(artifact_dir),
        "--no-start".to_string(),
    ]
}

fn copy_bits_args(source: &AppGuid, destination: &AppGuid) -> Vec<String> {
    let body = serde_json::json!({ "source_app_guid": source.as_str() });
    vec![
        "curl".to_string(),
        "-X".to_string(),
        "POST".to_string(),
        format!("/v2/apps/{destination}/copy_bits"),
        "-d".to_string(),
        body.to_string(),
    ]
}

fn upload_droplet_args(app: &AppName, path: &Path) -> Vec<String> {
    vec![
        "push".to_string(),
        app.to_string(),
        "--no-manifest".to_string(),
        "--droplet".to_string(),
        path_arg(path),
        "--no-start".to_string(),
    ]
}

/// `cf curl` exits zero on API errors; the error travels in the body.
fn parse_api_response(command: &str, body: &str) -> Result<serde_json::Value, PlatformError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|source| PlatformError::InvalidResponse {
            command: command.to_string(),
            source,
        })?;

    if let Some(error_code) = value.get("error_code").and_then(|v| v.as_str()) {
        return Err(PlatformError::Api {
            code: value.get("code").and_then(|v| v.as_i64()).unwrap_or_default(),
            description: value
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            error_code: error_code.to_string(),
        });
    }

    Ok(value)
}

fn is_not_found(output: &str) -> bool {
    output.to_lowercase().contains("not found")
}

#[async_trait]
impl AppOps for CfCli {
    async fn create_manifest(&self, app: &AppName, path: &Path) -> Result<(), PlatformError> {
        self.run(vec![
            "create-app-manifest".to_string(),
            app.to_string(),
            "-p".to_string(),
            path_arg(path),
        ])
        .await
    }

    async fn rename_application(
        &self,
        from: &AppName,
        to: &AppName,
    ) -> Result<(), PlatformError> {
        self.run(vec!["rename".to_string(), from.to_string(), to.to_string()])
            .await
    }

    async fn push_application(
        &self,
        app: &AppName,
        manifest: &Path,
        artifact_dir: &Path,
    ) -> Result<(), PlatformError> {
        self.run(push_args(app, manifest, artifact_dir)).await
    }

    async fn app_guid(&self, app: &AppName) -> Result<AppGuid, PlatformError> {
        let args = vec!["app".to_string(), app.to_string(), "--guid".to_string()];
        let command = self.display(&args);
        let output = self.exec(&command, &args).await?;

        if !output.success() {
            if is_not_found(&output.combined()) {
                return Err(PlatformError::AppNotFound(app.to_string()));
            }
            return Err(PlatformError::CommandFailed {
                command,
                code: output.code,
                output: output.combined(),
            });
        }

        output
            .stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(AppGuid::new)
            .ok_or_else(|| PlatformError::AppNotFound(app.to_string()))
    }

    async fn app_exists(&self, app: &AppName) -> Result<bool, PlatformError> {
        match self.app_guid(app).await {
            Ok(_) => Ok(true),
            Err(PlatformError::AppNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn start_application(&self, app: &AppName) -> Result<(), PlatformError> {
        self.run(vec!["start".to_string(), app.to_string()]).await
    }

    async fn stop_application(&self, app: &AppName) -> Result<(), PlatformError> {
        self.run(vec!["stop".to_string(), app.to_string()]).await
    }

    async fn delete_application(&self, app: &AppName) -> Result<(), PlatformError> {
        self.run(vec!["delete".to_string(), app.to_string(), "-f".to_string()])
            .await
    }

    async fn list_applications(&self) -> Result<(), PlatformError> {
        self.run(owned(&["apps"])).await
    }
}

#[async_trait]
impl JobOps for CfCli {
    async fn copy_bits(
        &self,
        source: &AppGuid,
        destination: &AppGuid,
    ) -> Result<Job, PlatformError> {
        let args = copy_bits_args(source, destination);
        let command = self.display(&args);
        let value = self.curl(args).await?;
        Job::from_value(value).map_err(|source| PlatformError::InvalidResponse { command, source })
    }

    async fn fetch_job(&self, id: &JobGuid) -> Result<Job, PlatformError> {
        let args = vec!["curl".to_string(), format!("/v2/jobs/{id}")];
        let command = self.display(&args);
        let value = self.curl(args).await?;
        Job::from_value(value).map_err(|source| PlatformError::InvalidResponse { command, source })
    }
}

#[async_trait]
impl ArtifactOps for CfCli {
    async fn download_droplet(&self, app: &AppGuid, path: &Path) -> Result<(), PlatformError> {
        self.capture(vec![
            "curl".to_string(),
            format!("/v2/apps/{app}/droplet/download"),
            "--output".to_string(),
            path_arg(path),
        ])
        .await
        .map(|_| ())
    }

    async fn upload_droplet(&self, app: &AppName, path: &Path) -> Result<(), PlatformError> {
        self.run(upload_droplet_args(app, path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(name: &str) -> AppName {
        AppName::new(name).unwrap()
    }

    #[test]
    fn push_uses_manifest_and_placeholder_dir_without_starting() {
        let args = push_args(
            &app("api"),
            Path::new("/tmp/scratch/manifest.yml"),
            Path::new("/tmp/scratch"),
        );
        assert_eq!(
            args,
            owned(&[
                "push",
                "api",
                "-f",
                "/tmp/scratch/manifest.yml",
                "-p",
                "/tmp/scratch",
                "--no-start"
            ])
        );
    }

    #[test]
    fn copy_bits_posts_source_guid_to_destination() {
        let args = copy_bits_args(&AppGuid::new("old-guid"), &AppGuid::new("new-guid"));
        assert_eq!(args[0], "curl");
        assert_eq!(args[3], "/v2/apps/new-guid/copy_bits");
        let body: serde_json::Value = serde_json::from_str(&args[5]).unwrap();
        assert_eq!(body["source_app_guid"], "old-guid");
    }

    #[test]
    fn upload_droplet_skips_manifest() {
        let args = upload_droplet_args(&app("api"), Path::new("/tmp/scratch/droplet"));
        assert!(args.contains(&"--no-manifest".to_string()));
        assert!(args.contains(&"--no-start".to_string()));
        assert_eq!(args[4], "/tmp/scratch/droplet");
    }

    #[test]
    fn api_error_body_becomes_api_error() {
        let body = r#"{"code": 100004, "description": "The app could not be found: x", "error_code": "CF-AppNotFound"}"#;
        let err = parse_api_response("cf curl /v2/jobs/x", body).unwrap_err();
        match err {
            PlatformError::Api {
                code, error_code, ..
            } => {
                assert_eq!(code, 100004);
                assert_eq!(error_code, "CF-AppNotFound");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_invalid_response() {
        let err = parse_api_response("cf curl /v2/jobs/x", "FAILED").unwrap_err();
        assert!(matches!(err, PlatformError::InvalidResponse { .. }));
    }

    #[test]
    fn not_found_detection_is_case_insensitive() {
        assert!(is_not_found("FAILED\nApp api NOT FOUND\n"));
        assert!(!is_not_found("FAILED\nNot logged in."));
    }

    #[test]
    fn display_prefixes_binary() {
        let cli = CfCli::new("/usr/local/bin/cf");
        assert_eq!(
            cli.display(&owned(&["app", "api", "--guid"])),
            "/usr/local/bin/cf app api --guid"
        );
    }

    #[tokio::test]
    async fn missing_binary_is_spawn_error() {
        let cli = CfCli::new("/nonexistent/bin/cf").echo(false);
        let err = cli.list_applications().await.unwrap_err();
        assert!(matches!(err, PlatformError::Spawn { .. }));
    }
}
