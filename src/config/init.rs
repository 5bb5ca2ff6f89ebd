// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes a commented bg-restage.yml holding the default settings.

use std::path::Path;

use crate::error::{Error, Result};
use crate::platform::DEFAULT_CF_BINARY;
use crate::poller::DEFAULT_POLL_INTERVAL;
use crate::types::DEFAULT_SUFFIX;

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, template_yaml())?;
    tracing::info!(path = %config_path.display(), "wrote config template");

    Ok(())
}

fn template_yaml() -> String {
    format!(
        r#"# Suffix appended to the application name while the old instance is parked.
venerable_suffix: "{}"

# Delay between two status checks of the copy-bits job.
poll_interval: {}ms

# cf executable used to talk to the platform (must be logged in and targeted).
cf_binary: {}
"#,
        DEFAULT_SUFFIX,
        DEFAULT_POLL_INTERVAL.as_millis(),
        DEFAULT_CF_BINARY
    )
}
