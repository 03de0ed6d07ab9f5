use super::entities::{GradeSheet, REPORT_CHECKED_SCORE};
use serde::Serialize;
use ts_rs::TS;

// 评分表单当前状态
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct GradeFormResponse {
    pub group_id: i64,
    pub report_i: bool,
    pub report_ii: bool,
    pub paper: Option<f64>,
    pub grades: GradeSheet,
}

impl GradeFormResponse {
    pub fn from_sheet(group_id: i64, grades: GradeSheet) -> Self {
        Self {
            group_id,
            report_i: grades.report_i.is_some_and(|s| s >= REPORT_CHECKED_SCORE),
            report_ii: grades.report_ii.is_some_and(|s| s >= REPORT_CHECKED_SCORE),
            paper: grades.paper,
            grades,
        }
    }
}
