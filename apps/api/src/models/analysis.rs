use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::fields::{lenient_list, lenient_score, lenient_text};

/// Scored evaluation of one résumé against one job. This is the ranking unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: Uuid,
    pub job_id: Uuid,
    pub resum_id: Uuid,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub languages: Vec<String>,
    /// Expected in 0..=100 but never clamped; `None` when the model gave nothing usable.
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: Option<i64>,
}
