use super::entities::PosterEvaluation;
use crate::models::groups::entities::{Group, GroupMember};
use serde::Serialize;
use ts_rs::TS;

// 待评价的小组
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct PendingEvaluationItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub group: Group,
    pub members: Vec<GroupMember>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct PendingEvaluationsResponse {
    pub items: Vec<PendingEvaluationItem>,
}

// 我已评价的小组
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct MyEvaluationItem {
    pub group_id: i64,
    pub group_title: String,
    pub evaluation: PosterEvaluation,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct MyEvaluationsResponse {
    pub items: Vec<MyEvaluationItem>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct EvaluationResponse {
    pub evaluation: PosterEvaluation,
}
