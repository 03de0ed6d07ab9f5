use serde::Deserialize;
use ts_rs::TS;

// 批量导入查询参数
#[derive(Debug, Clone, Copy, Default, Deserialize, TS)]
#[ts(export, export_to = "import.ts")]
pub struct ImportQuery {
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub allow_reassignment: bool,
}
