// ABOUTME: Snapshot of a remote asynchronous job and its wire format.
// ABOUTME: Parses the v2 job resource into a status plus optional error details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::JobGuid;

/// Lifecycle status of a remote job.
///
/// Only `Finished` and `Failed` are terminal; anything else, including
/// statuses this client does not know about, means "still pending".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Running,
    Finished,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "queued" => JobStatus::Queued,
            "running" => JobStatus::Running,
            "finished" => JobStatus::Finished,
            "failed" => JobStatus::Failed,
            other => JobStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Finished => "finished",
            JobStatus::Failed => "failed",
            JobStatus::Other(other) => other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error details attached to a failed job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobErrorDetails {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub error_code: String,
}

impl fmt::Display for JobErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error {}, {} [code: {}]",
            self.error_code, self.description, self.code
        )
    }
}

/// One poll's view of a remote job. Superseded by the next fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobGuid,
    pub created_at: DateTime<Utc>,
    pub status: JobStatus,
    pub error: Option<JobErrorDetails>,
}

impl Job {
    /// A job created now with the given status and no error details.
    pub fn new(id: JobGuid, status: JobStatus) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            status,
            error: None,
        }
    }

    pub fn with_error(mut self, details: JobErrorDetails) -> Self {
        self.error = Some(details);
        self
    }

    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<JobResource>(body).map(Job::from)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<JobResource>(value).map(Job::from)
    }

    /// Error details to report for a failed job, falling back to a generic
    /// description when the platform sent none.
    pub fn failure_details(&self) -> JobErrorDetails {
        self.error.clone().unwrap_or_else(|| JobErrorDetails {
            code: 0,
            description: "job failed without error details".to_string(),
            error_code: "UnknownError".to_string(),
        })
    }
}

// Wire format of `GET /v2/jobs/:guid` and `POST /v2/apps/:guid/copy_bits`.

#[derive(Debug, Deserialize)]
struct JobResource {
    metadata: JobMetadata,
    entity: JobEntity,
}

#[derive(Debug, Deserialize)]
struct JobMetadata {
    guid: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct JobEntity {
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_details: Option<JobErrorDetails>,
}

impl From<JobResource> for Job {
    fn from(resource: JobResource) -> Self {
        let JobResource { metadata, entity } = resource;
        let error = match (entity.error_details, entity.error) {
            (Some(details), _) => Some(details),
            (None, Some(message)) if !message.is_empty() => Some(JobErrorDetails {
                description: message,
                ..JobErrorDetails::default()
            }),
            (None, _) => None,
        };

        Job {
            id: JobGuid::new(metadata.guid),
            created_at: metadata.created_at,
            status: JobStatus::parse(&entity.status),
            error,
        }
    }
}
