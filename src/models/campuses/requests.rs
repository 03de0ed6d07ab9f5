use serde::Deserialize;
use ts_rs::TS;

// 创建 / 重命名校区
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "campus.ts")]
pub struct CampusRequest {
    pub name: String,
}
