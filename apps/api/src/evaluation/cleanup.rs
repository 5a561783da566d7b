//! "Clear analysis": cascade delete of everything evaluated for one job.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::evaluation::locks::JobLocks;
use crate::evaluation::uploads::UploadStore;
use crate::store::{Records, StoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClearSummary {
    pub files_removed: usize,
    pub resumes_deleted: u64,
    pub analyses_deleted: u64,
    pub files_deleted: u64,
}

/// Removes the job's uploaded PDFs from disk, then its resume, analysis and
/// file records. The job itself is kept.
///
/// Disk failures are logged and skipped; only store failures abort.
pub async fn clear_job_analyses(
    records: &Records,
    uploads: &UploadStore,
    locks: &JobLocks,
    job_id: Uuid,
) -> Result<ClearSummary, StoreError> {
    let _guard = locks.lock(job_id).await;

    let mut paths = BTreeSet::new();
    paths.extend(records.resumes_for_job(job_id).await?.into_iter().map(|r| r.file));
    paths.extend(records.files_for_job(job_id).await?.into_iter().map(|f| f.path));

    let mut files_removed = 0;
    for path in &paths {
        match uploads.remove(Path::new(path)).await {
            Ok(true) => files_removed += 1,
            Ok(false) => debug!(%job_id, path = %path, "upload already gone"),
            Err(e) => warn!(%job_id, path = %path, "could not remove upload: {e}"),
        }
    }

    let counts = records.delete_all_for_job(job_id).await?;
    let summary = ClearSummary {
        files_removed,
        resumes_deleted: counts.resumes_deleted,
        analyses_deleted: counts.analyses_deleted,
        files_deleted: counts.files_deleted,
    };

    info!(%job_id, ?summary, "cleared job analyses");
    Ok(summary)
}
