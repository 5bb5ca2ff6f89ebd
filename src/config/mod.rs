// ABOUTME: Configuration types and parsing for bg-restage.yml.
// ABOUTME: Handles YAML parsing, discovery, defaults, and CLI overrides.

mod deserialize;
mod init;

pub use init::init_config;

use deserialize::{deserialize_binary, deserialize_naming};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::platform::DEFAULT_CF_BINARY;
use crate::poller::DEFAULT_POLL_INTERVAL;
use crate::types::Naming;
use crate::workflow::Settings;

pub const CONFIG_FILENAME: &str = "bg-restage.yml";
pub const CONFIG_FILENAME_ALT: &str = "bg-restage.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".bg-restage/config.yml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, deserialize_with = "deserialize_naming")]
    pub venerable_suffix: Naming,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(default = "default_cf_binary", deserialize_with = "deserialize_binary")]
    pub cf_binary: PathBuf,
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_cf_binary() -> PathBuf {
    PathBuf::from(DEFAULT_CF_BINARY)
}

impl Default for Config {
    fn default() -> Self {
        Config {
            venerable_suffix: Naming::default(),
            poll_interval: default_poll_interval(),
            cf_binary: default_cf_binary(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty or comment-only file means "all defaults".
        let config: Config = match serde_yaml::from_str::<Option<Config>>(yaml)? {
            Some(config) => config,
            None => Config::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or the defaults when
    /// there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(path);
            }
        }

        tracing::debug!(dir = %dir.display(), "no config file found, using defaults");
        Ok(Config::default())
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "poll_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply a `--suffix` given on the command line.
    pub fn with_suffix(mut self, suffix: Option<&str>) -> Result<Self> {
        if let Some(suffix) = suffix {
            self.venerable_suffix = Naming::new(suffix)?;
        }
        Ok(self)
    }

    /// Workflow settings derived from this config.
    pub fn settings(&self) -> Settings {
        Settings {
            naming: self.venerable_suffix.clone(),
            poll_interval: self.poll_interval,
        }
    }
}
