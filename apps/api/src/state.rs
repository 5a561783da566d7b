use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::locks::JobLocks;
use crate::evaluation::uploads::UploadStore;
use crate::evaluation::EvaluationPipeline;
use crate::store::Records;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub records: Records,
    pub uploads: UploadStore,
    pub pipeline: Arc<EvaluationPipeline>,
    /// Same registry the pipeline holds; cascade deletes lock through it too.
    pub locks: JobLocks,
    pub config: Config,
}
