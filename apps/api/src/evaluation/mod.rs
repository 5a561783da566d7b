// Résumé evaluation: extraction, prompting, reply parsing, persistence and ranking.
// All completion calls go through llm_client::CompletionClient.
// PDF extraction is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod cleanup;
pub mod extractor;
pub mod handlers;
pub mod locks;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod ranking;
pub mod uploads;

pub use pipeline::{BatchReport, EvaluationPipeline, Upload};
