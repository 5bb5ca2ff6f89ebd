// ABOUTME: Application-wide error types for bg-restage.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::PipelineError;
use crate::scratch::ScratchError;
use crate::types::NamingError;
use crate::workflow::{PreflightError, StepError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error("cannot prepare local scratch storage: {0}")]
    Setup(#[from] ScratchError),

    #[error(transparent)]
    Preflight(#[from] PreflightError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError<StepError>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// True when a failed run could not be rolled back completely.
    pub fn requires_manual_intervention(&self) -> bool {
        matches!(self, Error::Pipeline(e) if e.requires_manual_intervention())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
