mod config;
mod db;
mod errors;
mod evaluation;
mod jobs;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::evaluation::locks::JobLocks;
use crate::evaluation::uploads::UploadStore;
use crate::evaluation::EvaluationPipeline;
use crate::llm_client::{CompletionClient, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{Records, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recruiter v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite record store
    let pool = create_pool(&config.database_url).await?;
    let records = Records::new(Arc::new(SqliteStore::new(pool).await?));

    // Initialize upload directory
    let uploads = UploadStore::new(config.upload_dir.clone());
    uploads.ensure_directory_exists().await?;
    info!("Upload directory: {}", config.upload_dir.display());

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
        config.completion_timeout,
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let locks = JobLocks::new();
    let pipeline = EvaluationPipeline::new(
        records.clone(),
        uploads.clone(),
        Arc::new(llm),
        locks.clone(),
        config.completion_timeout,
    );

    // Build app state
    let state = AppState {
        records,
        uploads,
        pipeline: Arc::new(pipeline),
        locks,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
