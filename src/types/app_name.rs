// ABOUTME: Validated application name as understood by the control plane.
// ABOUTME: Rejects names the cf CLI would misinterpret as flags or split on.

use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 255;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppNameError {
    #[error("application name cannot be empty")]
    Empty,

    #[error("application name exceeds maximum length of 255 bytes")]
    TooLong,

    #[error("application name cannot start with a hyphen")]
    StartsWithHyphen,

    #[error("application name cannot start or end with whitespace")]
    SurroundingWhitespace,

    #[error("invalid character in application name: {0:?}")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppName(String);

impl AppName {
    pub fn new(value: &str) -> Result<Self, AppNameError> {
        if value.is_empty() {
            return Err(AppNameError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(AppNameError::TooLong);
        }

        // A leading hyphen would be parsed as a flag by `cf`.
        if value.starts_with('-') {
            return Err(AppNameError::StartsWithHyphen);
        }

        if value.trim() != value {
            return Err(AppNameError::SurroundingWhitespace);
        }

        if let Some(c) = value.chars().find(|c| c.is_control()) {
            return Err(AppNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a suffix to this name.
    ///
    /// The result is validated again, so an oversized name is reported
    /// rather than silently truncated.
    pub fn with_suffix(&self, suffix: &str) -> Result<Self, AppNameError> {
        Self::new(&format!("{}{}", self.0, suffix))
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AppName {
    type Err = AppNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
