use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生，rgm 为学号（外部唯一标识）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct Student {
    pub id: i64,
    pub rgm: String,
    pub name: String,
    pub campus_id: i64,
    pub campus_name: Option<String>,
    pub offering_id: i64,
    pub offering_code: Option<String>,
    /// 当前所在小组
    pub group_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
