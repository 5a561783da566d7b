//! Schema-on-read record store.
//!
//! Four logical collections of flat JSON documents. Backends only need
//! insert, scan and delete-by-field; typed access lives in [`Records`].

mod records;
mod sqlite;

pub use records::Records;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Invalid field name '{0}'")]
    InvalidField(String),

    #[error("Documents must be JSON objects, got: {0}")]
    NotAnObject(String),
}

/// The four logical tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Jobs,
    Resumes,
    Analyses,
    Files,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Jobs,
        Collection::Resumes,
        Collection::Analyses,
        Collection::Files,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Collection::Jobs => "jobs",
            Collection::Resumes => "resumes",
            Collection::Analyses => "analysis",
            Collection::Files => "files",
        }
    }
}

/// Abstract store trait for different backends.
/// Reads return documents in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: Collection, doc: &Value) -> Result<(), StoreError>;
    async fn all(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError>;
    /// Returns the number of documents removed.
    async fn delete_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<u64, StoreError>;
    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Field names become JSON paths, so only plain identifiers are allowed.
pub(crate) fn validate_field(field: &str) -> Result<(), StoreError> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidField(field.to_string()))
    }
}
