use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::fields::lenient_text;

/// The uploaded PDF as saved on disk. Shares its `id` with the owning [`Resume`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: Uuid,
    pub job_id: Uuid,
    pub path: String,
}

/// Candidate-facing half of an evaluation: who the model thinks the candidate is,
/// its free-text opinion, and where the original PDF lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub job_id: Uuid,
    /// Candidate name as extracted by the model.
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub opinion: Option<String>,
    /// Denormalized from [`StoredFile::path`].
    pub file: String,
}
