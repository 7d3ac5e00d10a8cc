//! Diagnostic page snapshots written when an engine keeps failing.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::Result;

/// Writes page snapshots under unique names into a directory.
///
/// Write-only: nothing in the crate reads the files back. A sink without a
/// directory discards everything.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSink {
    directory: Option<PathBuf>,
}

impl ArtifactSink {
    /// A sink writing into `directory` (created on first write).
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
        }
    }

    /// A sink that writes nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Writes `content` to `<dir>/<uuid>.html` and returns the path.
    pub async fn persist(&self, content: &str) -> Result<Option<PathBuf>> {
        let Some(directory) = &self.directory else {
            return Ok(None);
        };

        tokio::fs::create_dir_all(directory).await?;
        let path = directory.join(format!("{}.html", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, content).await?;
        Ok(Some(path))
    }

    /// Like [`ArtifactSink::persist`] but logs failures instead of returning them.
    pub async fn persist_or_log(&self, content: &str) -> Option<PathBuf> {
        match self.persist(content).await {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Could not write diagnostic page snapshot");
                None
            }
        }
    }
}
