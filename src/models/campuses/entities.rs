use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 校区
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "campus.ts")]
pub struct Campus {
    pub id: i64,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
