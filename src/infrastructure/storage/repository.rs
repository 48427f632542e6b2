//! Read side of the persisted issues document.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::errors::{HarvestError, HarvestResult};
use crate::domain::models::IssueRecord;

/// Loads the persisted collection at most once and serves it from memory.
///
/// Construct one per process and hand it to whoever needs the issues. The
/// first successful [`issues`](Self::issues) call reads the file; every
/// later call returns the same slice without touching the disk. A failed
/// load leaves the cache empty, so the next call tries again.
#[derive(Debug)]
pub struct IssueRepository {
    path: PathBuf,
    cache: OnceCell<Vec<IssueRecord>>,
    loads: AtomicUsize,
}

impl IssueRepository {
    /// Repository over the document at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Source document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How many times the document was actually read and decoded.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// The cached collection, loading it on first use.
    pub async fn issues(&self) -> HarvestResult<&[IssueRecord]> {
        let issues = self.cache.get_or_try_init(|| self.load()).await?;
        Ok(issues.as_slice())
    }

    async fn load(&self) -> HarvestResult<Vec<IssueRecord>> {
        debug!(path = %self.path.display(), "Loading issues document");
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| HarvestError::LoadFailure {
                path: self.path.clone(),
                source,
            })?;
        let issues: Vec<IssueRecord> =
            serde_json::from_slice(&bytes).map_err(|source| HarvestError::ParseFailure {
                path: self.path.clone(),
                source,
            })?;

        self.loads.fetch_add(1, Ordering::SeqCst);
        info!(
            path = %self.path.display(),
            issues = issues.len(),
            "Loaded issues document"
        );
        Ok(issues)
    }
}
