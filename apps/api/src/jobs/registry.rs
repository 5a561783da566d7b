use tracing::info;

use crate::errors::AppError;
use crate::evaluation::locks::JobLocks;
use crate::models::Job;
use crate::store::Records;

/// Registers a new job. Names are unique; a second registration under the
/// same name is a conflict.
pub async fn register_job(
    records: &Records,
    locks: &JobLocks,
    name: &str,
    description: &str,
) -> Result<Job, AppError> {
    let (name, description) = validated(name, description)?;
    let _guard = locks.registration().await;

    if records.job_by_name(name).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "A job named '{name}' already exists"
        )));
    }
    insert_new(records, name, description).await
}

/// Returns the job registered under `name`, registering it first if needed.
/// An existing job keeps its original description.
pub async fn find_or_register(
    records: &Records,
    locks: &JobLocks,
    name: &str,
    description: &str,
) -> Result<Job, AppError> {
    let (name, description) = validated(name, description)?;
    let _guard = locks.registration().await;

    if let Some(job) = records.job_by_name(name).await? {
        return Ok(job);
    }
    insert_new(records, name, description).await
}

// Caller holds the registration lock.
async fn insert_new(records: &Records, name: &str, description: &str) -> Result<Job, AppError> {
    let job = Job::new(name, description);
    records.insert_job(&job).await?;
    info!(job_id = %job.id, name = %job.name, "job registered");
    Ok(job)
}

fn validated<'a>(name: &'a str, description: &'a str) -> Result<(&'a str, &'a str), AppError> {
    let name = name.trim();
    let description = description.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Job name is required".to_string()));
    }
    if description.is_empty() {
        return Err(AppError::Validation(
            "Job description is required".to_string(),
        ));
    }
    Ok((name, description))
}
