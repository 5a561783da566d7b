use std::cmp::Reverse;

use serde::Serialize;
use serde_json::Value;

use crate::models::fields::display_cell;
use crate::models::Analysis;

/// One row of the ranked candidate table.
#[derive(Debug, Clone, Serialize)]
pub struct RankedAnalysis {
    /// 1-based position after sorting.
    pub ranking: usize,
    #[serde(flatten)]
    pub analysis: Analysis,
    pub education_display: String,
    pub skills_display: String,
    pub languages_display: String,
}

/// Sorts by score, highest first. Unknown scores sink to the bottom and ties
/// keep the order the analyses were stored in.
pub fn rank(mut analyses: Vec<Analysis>) -> Vec<RankedAnalysis> {
    analyses.sort_by_key(|a| Reverse(a.score));

    analyses
        .into_iter()
        .enumerate()
        .map(|(i, analysis)| RankedAnalysis {
            ranking: i + 1,
            education_display: display_cell(&Value::from(analysis.education.clone())),
            skills_display: display_cell(&Value::from(analysis.skills.clone())),
            languages_display: display_cell(&Value::from(analysis.languages.clone())),
            analysis,
        })
        .collect()
}
