use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{Collection, DocumentStore, StoreError};
use crate::models::{Analysis, Job, Resume, StoredFile};

/// Rows removed by a cascade delete, per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeCounts {
    pub resumes_deleted: u64,
    pub analyses_deleted: u64,
    pub files_deleted: u64,
}

/// Typed view over a [`DocumentStore`]. Cheap to clone; handed to the pipeline
/// and route handlers instead of a global database handle.
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn DocumentStore>,
}

impl Records {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    async fn insert<T: Serialize + Sync>(
        &self,
        collection: Collection,
        record: &T,
    ) -> Result<(), StoreError> {
        let doc = serde_json::to_value(record)?;
        self.store.insert(collection, &doc).await
    }

    async fn find<T: DeserializeOwned>(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<T>, StoreError> {
        let docs = self.store.find_by_field(collection, field, value).await?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }

    async fn first<T: DeserializeOwned>(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<T>, StoreError> {
        Ok(self.find(collection, field, value).await?.into_iter().next())
    }

    // Jobs

    pub async fn insert_job(&self, job: &Job) -> Result<(), StoreError> {
        self.insert(Collection::Jobs, job).await
    }

    pub async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        self.store
            .all(Collection::Jobs)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }

    /// First job registered under `name`, if any.
    pub async fn job_by_name(&self, name: &str) -> Result<Option<Job>, StoreError> {
        self.first(Collection::Jobs, "name", name).await
    }

    pub async fn job_by_id(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        self.first(Collection::Jobs, "id", &id.to_string()).await
    }

    // Per-upload records

    pub async fn insert_file(&self, file: &StoredFile) -> Result<(), StoreError> {
        self.insert(Collection::Files, file).await
    }

    pub async fn insert_resume(&self, resume: &Resume) -> Result<(), StoreError> {
        self.insert(Collection::Resumes, resume).await
    }

    pub async fn insert_analysis(&self, analysis: &Analysis) -> Result<(), StoreError> {
        self.insert(Collection::Analyses, analysis).await
    }

    pub async fn resume_by_id(&self, id: Uuid) -> Result<Option<Resume>, StoreError> {
        self.first(Collection::Resumes, "id", &id.to_string()).await
    }

    pub async fn resumes_for_job(&self, job_id: Uuid) -> Result<Vec<Resume>, StoreError> {
        self.find(Collection::Resumes, "job_id", &job_id.to_string())
            .await
    }

    pub async fn files_for_job(&self, job_id: Uuid) -> Result<Vec<StoredFile>, StoreError> {
        self.find(Collection::Files, "job_id", &job_id.to_string())
            .await
    }

    pub async fn analyses_for_job(&self, job_id: Uuid) -> Result<Vec<Analysis>, StoreError> {
        self.find(Collection::Analyses, "job_id", &job_id.to_string())
            .await
    }

    pub async fn analyses_for_resume(&self, resum_id: Uuid) -> Result<Vec<Analysis>, StoreError> {
        self.find(Collection::Analyses, "resum_id", &resum_id.to_string())
            .await
    }

    /// Deletes every resume, analysis and file row for a job. The job row stays.
    /// Files on disk are not touched here; see `evaluation::cleanup`.
    pub async fn delete_all_for_job(&self, job_id: Uuid) -> Result<CascadeCounts, StoreError> {
        let key = job_id.to_string();
        let counts = CascadeCounts {
            resumes_deleted: self
                .store
                .delete_by_field(Collection::Resumes, "job_id", &key)
                .await?,
            analyses_deleted: self
                .store
                .delete_by_field(Collection::Analyses, "job_id", &key)
                .await?,
            files_deleted: self
                .store
                .delete_by_field(Collection::Files, "job_id", &key)
                .await?,
        };
        debug!(%job_id, ?counts, "deleted job records");
        Ok(counts)
    }
}
