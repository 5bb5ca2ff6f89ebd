// ABOUTME: Scoped scratch directory for manifests and droplets.
// ABOUTME: Seeded with placeholder app bits and removed when the run ends.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

const DIR_PREFIX: &str = "bg-restage";
const MANIFEST_FILE: &str = "manifest.yml";
const DROPLET_FILE: &str = "droplet";
const IGNORE_FILE: &str = ".cfignore";
const PLACEHOLDER_FILE: &str = ".app_bits_placeholder";

#[derive(Debug, Error)]
pub enum ScratchError {
    #[error("failed to create scratch directory: {0}")]
    Create(#[source] std::io::Error),

    #[error("failed to prepare {}: {source}", .path.display())]
    Seed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove scratch directory {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Temporary working directory owned by one redeployment.
///
/// Pushing this directory uploads placeholder bits only; a downloaded
/// droplet is kept out of the upload by `.cfignore`.
/// The directory is removed on drop, whether the run succeeded or not.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
    manifest: PathBuf,
    droplet: PathBuf,
}

impl ScratchDir {
    pub fn create() -> Result<Self, ScratchError> {
        let dir = tempfile::Builder::new()
            .prefix(DIR_PREFIX)
            .tempdir()
            .map_err(ScratchError::Create)?;

        let scratch = Self {
            manifest: dir.path().join(MANIFEST_FILE),
            droplet: dir.path().join(DROPLET_FILE),
            dir,
        };
        scratch.seed(IGNORE_FILE, format!("{DROPLET_FILE}\n").as_bytes())?;
        scratch.seed(PLACEHOLDER_FILE, b"")?;

        tracing::debug!(path = %scratch.path().display(), "created scratch directory");
        Ok(scratch)
    }

    fn seed(&self, name: &str, contents: &[u8]) -> Result<(), ScratchError> {
        let path = self.path().join(name);
        std::fs::write(&path, contents).map_err(|source| ScratchError::Seed { path, source })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest
    }

    pub fn droplet_path(&self) -> &Path {
        &self.droplet
    }

    /// Remove the directory now, reporting failure instead of ignoring it.
    pub fn close(self) -> Result<(), ScratchError> {
        let path = self.path().to_path_buf();
        self.dir
            .close()
            .map_err(|source| ScratchError::Remove { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_placeholder_and_ignore_file() {
        let scratch = ScratchDir::create().unwrap();
        let ignore = std::fs::read_to_string(scratch.path().join(IGNORE_FILE)).unwrap();
        assert_eq!(ignore, "droplet\n");
        assert!(scratch.path().join(PLACEHOLDER_FILE).is_file());
    }

    #[test]
    fn paths_live_inside_the_directory() {
        let scratch = ScratchDir::create().unwrap();
        assert_eq!(scratch.manifest_path().parent(), Some(scratch.path()));
        assert_eq!(scratch.droplet_path().parent(), Some(scratch.path()));
        assert!(scratch.manifest_path().ends_with("manifest.yml"));
    }

    #[test]
    fn removed_on_drop() {
        let scratch = ScratchDir::create().unwrap();
        let path = scratch.path().to_path_buf();
        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn close_removes_directory() {
        let scratch = ScratchDir::create().unwrap();
        let path = scratch.path().to_path_buf();
        scratch.close().unwrap();
        assert!(!path.exists());
    }
}
