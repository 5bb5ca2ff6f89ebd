// ABOUTME: Naming rule for the retired copy of an application.
// ABOUTME: Derives the retired name from the live name plus a configured suffix.

use std::fmt;
use thiserror::Error;

use super::app_name::{AppName, AppNameError};

/// Suffix appended to the live name when no other is configured.
pub const DEFAULT_SUFFIX: &str = "-venerable";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    #[error("retired-name suffix cannot be empty")]
    EmptySuffix,

    #[error("retired-name suffix cannot contain whitespace")]
    WhitespaceInSuffix,

    #[error("retired name for '{app}' is invalid: {source}")]
    InvalidRetiredName {
        app: String,
        #[source]
        source: AppNameError,
    },
}

/// The rule that maps a live application name to its retired name.
///
/// Passed explicitly to the workflow builders; there is no process-wide
/// suffix setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    suffix: String,
}

impl Naming {
    pub fn new(suffix: &str) -> Result<Self, NamingError> {
        if suffix.is_empty() {
            return Err(NamingError::EmptySuffix);
        }
        if suffix.chars().any(char::is_whitespace) {
            return Err(NamingError::WhitespaceInSuffix);
        }
        Ok(Self {
            suffix: suffix.to_string(),
        })
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Name under which the pre-existing instance of `app` lives while the
    /// new instance takes over `app`.
    pub fn retired_name(&self, app: &AppName) -> Result<AppName, NamingError> {
        app.with_suffix(&self.suffix)
            .map_err(|source| NamingError::InvalidRetiredName {
                app: app.to_string(),
                source,
            })
    }
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl fmt::Display for Naming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.suffix)
    }
}
