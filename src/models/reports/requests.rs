use super::entities::ReportFormat;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "report.ts")]
pub struct ReportQuery {
    #[serde(default)]
    pub format: ReportFormat,
    /// 名单导出的成员列数，缺省时按实际最大成员数
    pub max: Option<usize>,
}
