use super::entities::RubricScores;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct SubmitEvaluationRequest {
    pub group_id: i64,
    pub items: RubricScores,
    pub comments: Option<String>,
}
