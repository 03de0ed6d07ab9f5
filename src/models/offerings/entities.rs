use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 开课（班次），professor_id 为负责教师
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "offering.ts")]
pub struct Offering {
    pub id: i64,
    pub code: String,
    pub description: Option<String>,
    pub professor_id: Option<i64>,
    pub professor_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
