use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::registry::register_job;
use crate::jobs::template::{job_template, JobTemplate};
use crate::models::Job;
use crate::state::AppState;

#[derive(Serialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct RegisterJobRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobSummary>>, AppError> {
    let jobs = state.records.list_jobs().await?;
    Ok(Json(
        jobs.into_iter()
            .map(|job| JobSummary {
                id: job.id,
                name: job.name,
                created_at: job.created_at,
            })
            .collect(),
    ))
}

/// POST /api/v1/jobs
pub async fn handle_register_job(
    State(state): State<AppState>,
    Json(req): Json<RegisterJobRequest>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let job = register_job(&state.records, &state.locks, &req.name, &req.description).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs/by-name/:name
pub async fn handle_get_job_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Job>, AppError> {
    state
        .records
        .job_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job '{name}' not found")))
}

/// GET /api/v1/jobs/template
pub async fn handle_job_template() -> Json<JobTemplate> {
    Json(job_template())
}
