//! Atomic JSON persistence of the harvested collection.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::domain::errors::{HarvestError, HarvestResult};
use crate::domain::models::IssueRecord;

/// Writes the issue collection as a pretty-printed JSON array.
///
/// The document is written to a temporary file in the target directory and
/// renamed over the target only once fully written. A failure leaves any
/// previous document untouched.
#[derive(Debug, Clone)]
pub struct IssuePersister {
    path: PathBuf,
}

impl IssuePersister {
    /// Persister writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the document at the configured path with `issues`.
    pub fn persist(&self, issues: &[IssueRecord]) -> HarvestResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|source| self.failure(source))?;

        let tmp = NamedTempFile::new_in(&dir).map_err(|source| self.failure(source))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, issues)
                .map_err(|e| self.failure(e.into()))?;
            writer
                .write_all(b"\n")
                .and_then(|()| writer.flush())
                .map_err(|source| self.failure(source))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|source| self.failure(source))?;
        tmp.persist(&self.path)
            .map_err(|e| self.failure(e.error))?;

        info!(
            path = %self.path.display(),
            issues = issues.len(),
            "Wrote issues document"
        );
        Ok(())
    }

    fn failure(&self, source: std::io::Error) -> HarvestError {
        HarvestError::Persistence {
            path: self.path.clone(),
            source,
        }
    }
}
