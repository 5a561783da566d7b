//! Evaluation pipeline: PDF upload → text → prompt → completion → parse → records.
//!
//! Each résumé is independent. A failure aborts only that résumé; the batch
//! moves on and reports it at the end. The three inserts per résumé are not
//! transactional, and re-uploading the same PDF creates a second evaluation.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::evaluation::extractor::{extract_text, ExtractionError};
use crate::evaluation::locks::JobLocks;
use crate::evaluation::parser::{parse_reply, ParseError};
use crate::evaluation::prompts::{build_prompt, EVALUATION_SYSTEM};
use crate::evaluation::uploads::{StorageError, UploadStore};
use crate::llm_client::{CompletionClient, CompletionError};
use crate::models::{Analysis, Job, Resume, StoredFile};
use crate::store::{Records, StoreError};

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("could not save upload: {0}")]
    Storage(#[from] StorageError),

    #[error("could not extract text: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("could not persist evaluation: {0}")]
    Store(#[from] StoreError),
}

impl EvaluationError {
    pub fn kind(&self) -> &'static str {
        match self {
            EvaluationError::Storage(_) => "storage",
            EvaluationError::Extraction(_) => "extraction",
            EvaluationError::Completion(_) => "completion",
            EvaluationError::Parse(_) => "parse",
            EvaluationError::Store(_) => "store",
        }
    }

    /// The model's reply, when it could not be parsed.
    pub fn raw_reply(&self) -> Option<&str> {
        match self {
            EvaluationError::Parse(e) => Some(&e.raw),
            _ => None,
        }
    }
}

/// One uploaded PDF, as received.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Bytes,
}

/// The three records written for a successfully evaluated résumé.
#[derive(Debug, Clone)]
pub struct EvaluatedResume {
    pub file: StoredFile,
    pub resume: Resume,
    pub analysis: Analysis,
    /// True when the reply needed the brace-span fallback.
    pub recovered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluatedSummary {
    pub resume_id: Uuid,
    pub filename: String,
    pub name: Option<String>,
    pub score: Option<i64>,
    pub recovered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedResume {
    pub filename: String,
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_reply: Option<String>,
}

/// Outcome of one batch, reported once after every upload was attempted.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub job_id: Uuid,
    pub attempted: usize,
    pub succeeded: Vec<EvaluatedSummary>,
    pub failed: Vec<FailedResume>,
}

pub struct EvaluationPipeline {
    records: Records,
    uploads: UploadStore,
    completion: Arc<dyn CompletionClient>,
    locks: JobLocks,
    completion_timeout: Duration,
}

impl EvaluationPipeline {
    pub fn new(
        records: Records,
        uploads: UploadStore,
        completion: Arc<dyn CompletionClient>,
        locks: JobLocks,
        completion_timeout: Duration,
    ) -> Self {
        Self {
            records,
            uploads,
            completion,
            locks,
            completion_timeout,
        }
    }

    /// Evaluates uploads one at a time, in order, holding the job's lock throughout.
    pub async fn evaluate_batch(&self, job: &Job, uploads: Vec<Upload>) -> BatchReport {
        let _guard = self.locks.lock(job.id).await;

        let mut report = BatchReport {
            job_id: job.id,
            attempted: uploads.len(),
            succeeded: Vec::new(),
            failed: Vec::new(),
        };

        for upload in uploads {
            match self
                .evaluate_resume(job, upload.bytes, &upload.filename)
                .await
            {
                Ok(done) => report.succeeded.push(EvaluatedSummary {
                    resume_id: done.resume.id,
                    filename: upload.filename,
                    name: done.analysis.name,
                    score: done.analysis.score,
                    recovered: done.recovered,
                }),
                Err(e) => {
                    warn!(
                        job_id = %job.id,
                        filename = %upload.filename,
                        kind = e.kind(),
                        "résumé evaluation failed: {e}"
                    );
                    if let Some(raw) = e.raw_reply() {
                        warn!(filename = %upload.filename, "unparseable model reply:\n{raw}");
                    }
                    report.failed.push(FailedResume {
                        filename: upload.filename,
                        kind: e.kind(),
                        message: e.to_string(),
                        raw_reply: e.raw_reply().map(str::to_string),
                    });
                }
            }
        }

        info!(
            job_id = %job.id,
            attempted = report.attempted,
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "batch evaluation finished"
        );
        report
    }

    /// Runs the full pipeline for one PDF and writes its file, resume and analysis records.
    ///
    /// The file record is written before extraction, so a résumé that fails
    /// later leaves a file row behind until the job's analyses are cleared.
    pub async fn evaluate_resume(
        &self,
        job: &Job,
        pdf: Bytes,
        filename: &str,
    ) -> Result<EvaluatedResume, EvaluationError> {
        let resume_id = Uuid::new_v4();

        // 1. Persist the upload
        let path = self.uploads.save(resume_id, filename, &pdf).await?;
        let file = StoredFile {
            id: resume_id,
            job_id: job.id,
            path: path.to_string_lossy().into_owned(),
        };
        self.records.insert_file(&file).await?;

        // 2. Extract text (empty text is still evaluated)
        let text = tokio::task::spawn_blocking(move || extract_text(&pdf))
            .await
            .map_err(|e| ExtractionError::Aborted(e.to_string()))??;
        if text.trim().is_empty() {
            warn!(%resume_id, filename, "no extractable text; evaluating empty résumé");
        }

        // 3-4. Prompt and completion
        let prompt = build_prompt(&job.name, &job.description, &text);
        let raw = tokio::time::timeout(
            self.completion_timeout,
            self.completion.complete(EVALUATION_SYSTEM, &prompt),
        )
        .await
        .map_err(|_| CompletionError::Timeout {
            after: self.completion_timeout,
        })??;

        // 5. Parse
        let parsed = parse_reply(&raw)?;
        let recovered = parsed.is_recovered();
        let evaluation = parsed.into_evaluation();

        // 6. Persist resume + analysis under the shared id
        let resume = Resume {
            id: resume_id,
            job_id: job.id,
            content: evaluation.name.clone(),
            opinion: evaluation.opinion,
            file: file.path.clone(),
        };
        let analysis = Analysis {
            id: Uuid::new_v4(),
            job_id: job.id,
            resum_id: resume_id,
            name: evaluation.name,
            education: evaluation.education,
            skills: evaluation.skills,
            languages: evaluation.languages,
            score: evaluation.score,
        };
        self.records.insert_resume(&resume).await?;
        self.records.insert_analysis(&analysis).await?;

        info!(
            job_id = %job.id,
            %resume_id,
            filename,
            score = ?analysis.score,
            recovered,
            model = self.completion.model(),
            "résumé evaluated"
        );

        Ok(EvaluatedResume {
            file,
            resume,
            analysis,
            recovered,
        })
    }
}
