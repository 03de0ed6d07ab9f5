use serde::Deserialize;
use ts_rs::TS;

// 评分表单：两个报告为勾选项，论文为 0..=4 的分数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct GradeFormRequest {
    #[serde(default)]
    pub report_i: bool,
    #[serde(default)]
    pub report_ii: bool,
    /// 为空时记为 0
    pub paper: Option<f64>,
}
