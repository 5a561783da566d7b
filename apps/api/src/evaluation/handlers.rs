use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::cleanup::{clear_job_analyses, ClearSummary};
use crate::evaluation::ranking::{rank, RankedAnalysis};
use crate::evaluation::{BatchReport, Upload};
use crate::jobs::registry::find_or_register;
use crate::models::Job;
use crate::state::AppState;

/// Parts of a résumé upload form. Unknown parts are ignored.
#[derive(Default)]
struct UploadForm {
    job_name: Option<String>,
    job_description: Option<String>,
    files: Vec<Upload>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_name" | "job_description" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid '{name}' field: {e}")))?;
                if name == "job_name" {
                    form.job_name = Some(value);
                } else {
                    form.job_description = Some(value);
                }
            }
            "files" | "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                if !is_pdf(&filename, content_type.as_deref()) {
                    return Err(AppError::Validation(format!(
                        "Only PDF files are accepted (got '{filename}')"
                    )));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file '{filename}': {e}")))?;
                form.files.push(Upload { filename, bytes });
            }
            _ => {}
        }
    }

    Ok(form)
}

fn is_pdf(filename: &str, content_type: Option<&str>) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf") || content_type == Some("application/pdf")
}

async fn existing_job(state: &AppState, job_id: Uuid) -> Result<Job, AppError> {
    state
        .records
        .job_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

/// POST /api/v1/jobs/:id/resumes
pub async fn handle_upload_resumes(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<BatchReport>, AppError> {
    let job = existing_job(&state, job_id).await?;
    let form = read_upload_form(multipart).await?;
    if form.files.is_empty() {
        return Err(AppError::Validation(
            "Upload at least one PDF".to_string(),
        ));
    }

    Ok(Json(state.pipeline.evaluate_batch(&job, form.files).await))
}

/// POST /api/v1/submit
pub async fn handle_submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchReport>, AppError> {
    let form = read_upload_form(multipart).await?;
    let name = form.job_name.unwrap_or_default();
    let description = form.job_description.unwrap_or_default();
    if name.trim().is_empty() || description.trim().is_empty() || form.files.is_empty() {
        return Err(AppError::Validation(
            "Fill in the job name and description and upload at least one PDF".to_string(),
        ));
    }

    let job = find_or_register(&state.records, &state.locks, &name, &description).await?;
    Ok(Json(state.pipeline.evaluate_batch(&job, form.files).await))
}

#[derive(Serialize)]
pub struct RankedAnalyses {
    pub job: Job,
    pub candidates: Vec<RankedAnalysis>,
}

/// GET /api/v1/jobs/:id/analyses
pub async fn handle_get_analyses(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<RankedAnalyses>, AppError> {
    let job = existing_job(&state, job_id).await?;
    let analyses = state.records.analyses_for_job(job_id).await?;
    Ok(Json(RankedAnalyses {
        job,
        candidates: rank(analyses),
    }))
}

/// DELETE /api/v1/jobs/:id/analyses
pub async fn handle_clear_analyses(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ClearSummary>, AppError> {
    existing_job(&state, job_id).await?;
    let summary = clear_job_analyses(&state.records, &state.uploads, &state.locks, job_id).await?;
    Ok(Json(summary))
}

#[derive(Serialize)]
pub struct ResumeDetail {
    pub id: Uuid,
    pub job_id: Uuid,
    pub content: Option<String>,
    pub opinion: Option<String>,
    pub file: String,
    /// Client-facing file name, without the id prefix added on save.
    pub file_name: String,
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeDetail>, AppError> {
    let resume = state
        .records
        .resume_by_id(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Résumé {resume_id} not found")))?;

    Ok(Json(ResumeDetail {
        file_name: display_file_name(resume.id, &resume.file),
        id: resume.id,
        job_id: resume.job_id,
        content: resume.content,
        opinion: resume.opinion,
        file: resume.file,
    }))
}

/// GET /api/v1/resumes/:id/file
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resume = state
        .records
        .resume_by_id(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Résumé {resume_id} not found")))?;

    let bytes = state.uploads.read(FsPath::new(&resume.file)).await?;
    let file_name: String = display_file_name(resume.id, &resume.file)
        .chars()
        .filter(|c| *c != '"' && !c.is_control())
        .collect();

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}

fn display_file_name(id: Uuid, path: &str) -> String {
    let base = FsPath::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.strip_prefix(&format!("{id}_"))
        .map(str::to_string)
        .unwrap_or(base)
}
